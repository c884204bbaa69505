use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, LevelFilter};

/// Suffix added to compressed files.
pub const SUFFIX: &str = "huf";

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Off,
            Verbosity::Errors => LevelFilter::Error,
            Verbosity::Warnings => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Where the result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    File(PathBuf),
    Stdout,
    /// Test mode decodes and throws the result away.
    Discard,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::File(path) => write!(f, "{}", path.display()),
            Output::Stdout => write!(f, "stdout"),
            Output::Discard => write!(f, "nowhere (test only)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HuffOpts {
    /// File to read for input
    pub input: PathBuf,
    /// Location where output is sent
    pub output: Output,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl HuffOpts {
    /// Options for the given mode and input, with the default output location.
    pub fn new(op_mode: Mode, input: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let output = default_output(op_mode, &input);
        Self {
            input,
            output,
            op_mode,
            force_overwrite: false,
            verbose: Verbosity::Errors,
        }
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "A canonical huffman file compressor",
    long_about = "
    Compresses a file with a single canonical huffman code. The compressed file starts with
    the code length of each of the 257 symbols (256 byte values plus an end-of-stream marker),
    followed by the coded bytes and the end-of-stream code."
)]
pub struct Args {
    /// File to process
    #[clap()]
    input: String,

    /// Output file. Defaults to INPUT.huf when compressing and INPUT without .huf when
    /// decompressing
    #[clap()]
    output: Option<String>,

    /// Compress the input file (the default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Decompress the input file
    #[clap(short = 'd', long = "decompress", conflicts_with_all = &["compress", "test"])]
    decompress: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test", conflicts_with = "compress")]
    test: bool,

    /// Force overwriting output file
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout", conflicts_with = "output")]
    stdout: bool,

    /// Suppress all log output
    #[clap(short = 'q', long = "quiet")]
    quiet: bool,

    /// Be verbose (a 2nd -v gives more, up to -vvvv)
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    verbose: u64,
}

impl From<Args> for HuffOpts {
    fn from(args: Args) -> Self {
        let op_mode = if args.decompress {
            Mode::Unzip
        } else if args.test {
            Mode::Test
        } else {
            Mode::Zip
        };
        let mut opts = HuffOpts::new(op_mode, args.input);
        if op_mode != Mode::Test {
            if args.stdout {
                opts.output = Output::Stdout;
            } else if let Some(output) = args.output {
                opts.output = Output::File(PathBuf::from(output));
            }
        }
        opts.force_overwrite = args.force;
        opts.verbose = if args.quiet {
            Verbosity::Quiet
        } else {
            match args.verbose {
                0 => Verbosity::Errors,
                1 => Verbosity::Warnings,
                2 => Verbosity::Info,
                3 => Verbosity::Debug,
                _ => Verbosity::Trace,
            }
        };
        opts
    }
}

/// Parse the command line, set the log level and report what we are about to do.
pub fn huffopts_init() -> HuffOpts {
    let opts = HuffOpts::from(Args::parse());
    log::set_max_level(opts.verbose.level_filter());

    info!("---- huffpack initialization ----");
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Reading input from {}", opts.input.display());
    info!("Sending output to {}", opts.output);
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    opts
}

/// Default output location: add the suffix when compressing, strip it when decompressing.
fn default_output(op_mode: Mode, input: &Path) -> Output {
    match op_mode {
        Mode::Zip => {
            let mut name = input.as_os_str().to_owned();
            name.push(".");
            name.push(SUFFIX);
            Output::File(PathBuf::from(name))
        }
        Mode::Unzip => {
            if input.extension().map_or(false, |ext| ext == SUFFIX) {
                Output::File(input.with_extension(""))
            } else {
                let mut name = input.as_os_str().to_owned();
                name.push(".out");
                Output::File(PathBuf::from(name))
            }
        }
        Mode::Test => Output::Discard,
    }
}
