//! Generate a shoco successor table from training text.
//!
//! ## Usage
//!
//! ```bash
//! # Train on files, one chunk per line, write Go source to stdout
//! tablegen words.txt names.txt
//!
//! # Train from stdin, score the catalog, write to a file
//! cat corpus.txt | tablegen --optimize-encoding -o shoco_table.go
//!
//! # Load settings from a JSON file, overriding one of them
//! tablegen --config tablegen.json --encoding-types 2 corpus.txt
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use shoco_tablegen::{
    ConfigOverrides, Corpus, Generator, GeneratorConfig, GoTableWriter, SplitMode, StripMode,
    TableWriter,
};

#[derive(Parser, Debug)]
#[command(name = "tablegen")]
#[command(version)]
#[command(about = "Generate a successor table for shoco", long_about = None)]
struct Args {
    /// Training data files. Reads stdin when none are given.
    files: Vec<PathBuf>,

    /// Output file for the table. Writes to stdout when absent.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Split the input into chunks at this separator (none, newline, whitespace)
    #[arg(long)]
    split: Option<SplitMode>,

    /// Trim these characters from each chunk (none, whitespace, punctuation)
    #[arg(long)]
    strip: Option<StripMode>,

    /// Bits used to represent a leading character
    #[arg(long)]
    max_leading_char_bits: Option<u8>,

    /// Bits used to represent a successor character
    #[arg(long)]
    max_successor_bits: Option<u8>,

    /// Number of packed-size classes (1-3)
    #[arg(long)]
    encoding_types: Option<usize>,

    /// Score the catalog against the training data instead of using defaults
    #[arg(long)]
    optimize_encoding: bool,

    /// Go package name of the generated file
    #[arg(long, default_value = "shoco")]
    package: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            split: self.split,
            strip: self.strip,
            max_leading_bits: self.max_leading_char_bits,
            max_successor_bits: self.max_successor_bits,
            encoding_types: self.encoding_types,
            optimize: self.optimize_encoding,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let generator = Generator::new(GeneratorConfig::load(
        args.config.as_deref(),
        &args.overrides(),
    )?)?;
    info!(config = ?generator.config(), "starting table generation");

    let corpus = if args.files.is_empty() {
        Corpus::from_reader(io::stdin().lock())?
    } else {
        Corpus::from_paths(&args.files)?
    };
    info!(
        streams = corpus.streams(),
        bytes = corpus.total_bytes(),
        "loaded corpus"
    );

    let table = generator.generate(&corpus)?;
    let writer = GoTableWriter::new(args.package.as_str());
    match &args.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            writer.write_table(&table, &mut out)?;
            out.flush()?;
            info!(path = %path.display(), "wrote table");
        }
        None => {
            let mut out = io::stdout().lock();
            writer.write_table(&table, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}
