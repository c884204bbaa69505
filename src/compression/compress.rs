use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Cursor, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::{debug, info, warn};

use crate::bitstream::bitwriter::BitWriter;
use crate::error::{HuffError, Result};
use crate::huffman_coding::code_lengths::CodeLengths;
use crate::huffman_coding::huffman::HuffmanTree;
use crate::tools::cli::{HuffOpts, Output};
use crate::tools::freq_count::FrequencyTable;
use crate::{EOF_SYMBOL, HEADER_FIELD_BITS, SYMBOL_LIMIT};

const READ_CHUNK: usize = 16_000;

/*
    Compression needs two passes over the input. The first counts the symbols, the second
    writes their codes. Between the passes the frequency tree is reduced to its code lengths
    and rebuilt canonically, so that the codes we write are exactly the ones the decoder will
    rebuild from the header.
*/

/// Compress everything in input to output. The input is read twice, so it must be seekable.
/// Returns the output sink once the last byte has been padded and flushed.
pub fn compress<R: Read + Seek, W: Write>(input: &mut R, output: W) -> Result<W> {
    let start = input.stream_position()?;

    // Pass one: frequencies, the tree they imply, and its canonical twin.
    let freqs = FrequencyTable::from_reader(input)?;
    let tree = canonical_tree(&freqs)?;

    let mut bw = BitWriter::new(output);
    write_code_lengths(&mut bw, &tree.lengths)?;

    // Pass two: the payload, then the end-of-stream marker.
    input.seek(SeekFrom::Start(start))?;
    let mut buf = vec![0_u8; READ_CHUNK];
    loop {
        let size = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(size) => size,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &buf[..size] {
            write_symbol(&mut bw, &tree.tree, byte as usize)?;
        }
    }
    write_symbol(&mut bw, &tree.tree, EOF_SYMBOL as usize)?;

    debug!("Payload complete after {} bytes.", bw.bytes_written());
    bw.finish()
}

/// Compress a byte slice into a new vec.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    compress(&mut Cursor::new(data), Vec::new())
}

/// Compress the input file named in opts to the output it names.
pub fn compress_file(opts: &HuffOpts) -> Result<()> {
    let mut fin = BufReader::new(File::open(&opts.input)?);
    let in_size = fs::metadata(&opts.input)?.len();

    match &opts.output {
        Output::File(path) => {
            check_distinct(&opts.input, path)?;
            let f_out = create_output(path, opts.force_overwrite)?;
            match compress(&mut fin, BufWriter::new(f_out)) {
                Ok(_) => {
                    let out_size = fs::metadata(path)?.len();
                    info!(
                        "{}: {} bytes in, {} bytes out.",
                        opts.input.display(),
                        in_size,
                        out_size
                    );
                    Ok(())
                }
                Err(e) => {
                    remove_partial(path);
                    Err(e)
                }
            }
        }
        Output::Stdout => {
            let stdout = io::stdout();
            compress(&mut fin, BufWriter::new(stdout.lock()))?;
            info!("{}: {} bytes in.", opts.input.display(), in_size);
            Ok(())
        }
        Output::Discard => {
            compress(&mut fin, io::sink())?;
            Ok(())
        }
    }
}

/// The code lengths that go into the header and the tree rebuilt from them.
pub(crate) struct Canonical {
    pub lengths: CodeLengths,
    pub tree: HuffmanTree,
}

/// Frequencies -> frequency tree -> code lengths -> canonical tree.
pub(crate) fn canonical_tree(freqs: &FrequencyTable) -> Result<Canonical> {
    let freq_tree = HuffmanTree::from_frequencies(freqs)?;
    let lengths = CodeLengths::from_tree(&freq_tree, freqs.count())?;
    let tree = lengths.to_tree()?;
    info!(
        "Built code for {} symbols, longest code is {} bits.",
        lengths.as_slice().iter().filter(|&&l| l > 0).count(),
        lengths.max_len()
    );
    Ok(Canonical { lengths, tree })
}

/// Write one 8 bit field per symbol holding its code length.
pub(crate) fn write_code_lengths<W: Write>(bw: &mut BitWriter<W>, lengths: &CodeLengths) -> Result<()> {
    if lengths.len() != SYMBOL_LIMIT {
        return Err(HuffError::InvalidCanonicalLengths(format!(
            "header needs {} lengths, found {}",
            SYMBOL_LIMIT,
            lengths.len()
        )));
    }
    for (symbol, &length) in lengths.as_slice().iter().enumerate() {
        if length >= 1 << HEADER_FIELD_BITS {
            return Err(HuffError::CodeLengthOverflow { symbol, length });
        }
        bw.write_bits(length, HEADER_FIELD_BITS)?;
    }
    Ok(())
}

fn write_symbol<W: Write>(bw: &mut BitWriter<W>, tree: &HuffmanTree, symbol: usize) -> Result<()> {
    let code = tree.code(symbol).ok_or(HuffError::MissingCode(symbol))?;
    bw.write_code(code)
}

/// Refuse to write to the file we are reading from.
pub(crate) fn check_distinct(input: &Path, output: &Path) -> Result<()> {
    let same = match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if same {
        return Err(HuffError::from(io::Error::new(
            ErrorKind::InvalidInput,
            format!("{} is both the input and the output", output.display()),
        )));
    }
    Ok(())
}

/// Open an output file, refusing to clobber an existing one unless forced.
pub(crate) fn create_output(path: &Path, force: bool) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    options.open(path).map_err(|e| {
        if e.kind() == ErrorKind::AlreadyExists {
            HuffError::from(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("{} already exists, use --force to overwrite", path.display()),
            ))
        } else {
            HuffError::from(e)
        }
    })
}

/// Remove an output file left behind by a failed run.
pub(crate) fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("Could not remove partial output {}: {}", path.display(), e);
    }
}
