//! Error types for table generation.

use std::path::PathBuf;

use thiserror::Error;

/// Error variants for table generation.
#[derive(Debug, Error)]
pub enum Error {
    /// An input stream could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Path of the stream that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A configured bit width is outside the supported range.
    #[error("{name} must be between {min} and {max}, got {bits}")]
    BitsOutOfRange {
        /// Name of the offending setting.
        name: &'static str,
        /// Requested width.
        bits: u8,
        /// Smallest accepted width.
        min: u8,
        /// Largest accepted width.
        max: u8,
    },

    /// More encoding classes were requested than the catalog provides.
    #[error("encoding types must be between 1 and {available}, got {requested}")]
    EncodingTypes {
        /// Requested class count.
        requested: usize,
        /// Classes available in the catalog.
        available: usize,
    },

    /// No encoding in a packed-size class fits the configured widths.
    #[error(
        "no {packed}-byte encoding fits within {max_leading_bits} leading bits \
         and {max_successor_bits} successor bits"
    )]
    NoEncodingFits {
        /// Packed byte count of the class.
        packed: u8,
        /// Configured leading-character width.
        max_leading_bits: u8,
        /// Configured successor width.
        max_successor_bits: u8,
    },

    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// An I/O error occurred while reading input or writing the table.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for table generation.
pub type Result<T> = std::result::Result<T, Error>;
