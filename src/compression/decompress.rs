use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use log::{debug, error, info};

use crate::bitstream::bitreader::BitReader;
use crate::compression::compress::{check_distinct, create_output, remove_partial};
use crate::error::{HuffError, Result};
use crate::huffman_coding::code_lengths::CodeLengths;
use crate::huffman_coding::huffman::{HuffmanTree, Node};
use crate::tools::cli::{HuffOpts, Output};
use crate::{EOF_SYMBOL, HEADER_FIELD_BITS, SYMBOL_LIMIT};

const WRITE_CHUNK: usize = 16_000;

/// Read the code length header and rebuild the canonical tree it describes. Nothing has been
/// written anywhere when this fails.
pub fn read_header<R: Read>(br: &mut BitReader<R>) -> Result<HuffmanTree> {
    let mut lens = vec![0_u32; SYMBOL_LIMIT];
    for len in lens.iter_mut() {
        *len = br.read_bits(HEADER_FIELD_BITS)?;
    }
    let lengths = CodeLengths::new(lens)?;
    debug!(
        "Found a valid header, longest code is {} bits.",
        lengths.max_len()
    );
    lengths.to_tree()
}

/// Walk the tree one bit at a time, writing each literal we land on, until the end-of-stream
/// symbol. Running out of bits first is an error. Returns the number of bytes written.
pub fn decode_payload<R: Read, W: Write>(
    tree: &HuffmanTree,
    br: &mut BitReader<R>,
    output: &mut W,
) -> Result<u64> {
    let root = tree.root();
    let mut current = root;
    let mut buf: Vec<u8> = Vec::with_capacity(WRITE_CHUNK);
    let mut written = 0_u64;

    loop {
        let bit = br.read_bit()?.ok_or(HuffError::TruncatedStream)?;
        let next = match tree.node(current)? {
            Node::Internal(left, right) => {
                if bit == 0 {
                    left
                } else {
                    right
                }
            }
            Node::Leaf(_) => return Err(HuffError::InvalidTreeShape(current)),
        };

        match tree.node(next)? {
            Node::Leaf(sym) if sym == EOF_SYMBOL => break,
            Node::Leaf(sym) => {
                buf.push(sym as u8);
                if buf.len() == WRITE_CHUNK {
                    output.write_all(&buf)?;
                    written += buf.len() as u64;
                    buf.clear();
                }
                current = root;
            }
            Node::Internal(..) => current = next,
        }
    }
    output.write_all(&buf)?;
    written += buf.len() as u64;
    Ok(written)
}

/// Decompress everything in input to output, returning the sink after a final flush.
pub fn decompress<R: Read, W: Write>(input: R, mut output: W) -> Result<W> {
    let mut br = BitReader::new(input);
    let tree = read_header(&mut br)?;
    let written = decode_payload(&tree, &mut br, &mut output)?;
    output.flush()?;
    debug!("Decoded {} bytes.", written);
    Ok(output)
}

/// Decompress a byte slice into a new vec.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    decompress(data, Vec::new())
}

/// Decompress the input file named in opts to the output it names. The header is checked
/// before the output is created, so a bad header never leaves a file behind.
pub fn decompress_file(opts: &HuffOpts) -> Result<()> {
    let mut br = BitReader::new(BufReader::new(File::open(&opts.input)?));
    let tree = match read_header(&mut br) {
        Ok(tree) => tree,
        Err(e) => {
            error!(
                "{} is not a valid huffpack compressed file.",
                opts.input.display()
            );
            return Err(e);
        }
    };
    info!("Found a valid header in {}.", opts.input.display());

    let written = match &opts.output {
        Output::File(path) => {
            check_distinct(&opts.input, path)?;
            let mut f_out = BufWriter::new(create_output(path, opts.force_overwrite)?);
            let result = decode_payload(&tree, &mut br, &mut f_out)
                .and_then(|n| f_out.flush().map(|_| n).map_err(HuffError::from));
            match result {
                Ok(n) => n,
                Err(e) => {
                    drop(f_out);
                    remove_partial(path);
                    return Err(e);
                }
            }
        }
        Output::Stdout => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let n = decode_payload(&tree, &mut br, &mut out)?;
            out.flush()?;
            n
        }
        Output::Discard => decode_payload(&tree, &mut br, &mut io::sink())?,
    };
    info!("{}: {} bytes out.", opts.input.display(), written);
    Ok(())
}

/// Decode the whole file and throw the result away, reporting whether it is intact.
pub fn test_file(opts: &HuffOpts) -> Result<()> {
    let mut test_opts = opts.clone();
    test_opts.output = Output::Discard;
    decompress_file(&test_opts)?;
    info!("{}: ok", opts.input.display());
    Ok(())
}
