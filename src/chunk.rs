//! Corpus chunking.
//!
//! The training corpus is held as one buffer per input stream. Chunks are
//! borrowed slices produced lazily from those buffers: each stream is split
//! by a [`SplitMode`], every piece is trimmed by a [`StripMode`], and empty
//! pieces are dropped. Bigrams never cross a chunk boundary, so the split
//! policy decides which character pairs the tables can learn from.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Separator bytes for [`SplitMode::Whitespace`], including the two bytes of
/// the UTF-8 soft hyphen.
pub const WHITESPACE: &[u8] = b" \t\n\r\x0b\x0c\xc2\xad";

/// Bytes trimmed by [`StripMode::Whitespace`].
pub const ASCII_WHITESPACE: &[u8] = b" \t\n\r\x0b\x0c";

/// How each input stream is cut into chunks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// The whole stream is a single chunk.
    None,
    /// Split at `\n`, `\r` and `\r\n`.
    #[default]
    Newline,
    /// Split at any [`WHITESPACE`] byte.
    Whitespace,
}

/// Which bytes are trimmed from both ends of every chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripMode {
    /// Keep chunks as split.
    None,
    /// Trim [`ASCII_WHITESPACE`].
    #[default]
    Whitespace,
    /// Trim ASCII punctuation and [`WHITESPACE`].
    Punctuation,
}

impl SplitMode {
    /// Cut the next piece off `rest`, returning it together with whatever
    /// remains after the separator.
    fn next_piece<'a>(self, rest: &'a [u8]) -> (&'a [u8], Option<&'a [u8]>) {
        match self {
            SplitMode::None => (rest, None),
            SplitMode::Newline => match rest.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    let sep = if rest[i] == b'\r' && rest.get(i + 1) == Some(&b'\n') {
                        2
                    } else {
                        1
                    };
                    (&rest[..i], Some(&rest[i + sep..]))
                }
                None => (rest, None),
            },
            SplitMode::Whitespace => match rest.iter().position(|b| WHITESPACE.contains(b)) {
                Some(i) => (&rest[..i], Some(&rest[i + 1..])),
                None => (rest, None),
            },
        }
    }
}

impl StripMode {
    fn apply(self, chunk: &[u8]) -> &[u8] {
        match self {
            StripMode::None => chunk,
            StripMode::Whitespace => trim(chunk, |b| ASCII_WHITESPACE.contains(&b)),
            StripMode::Punctuation => {
                trim(chunk, |b| b.is_ascii_punctuation() || WHITESPACE.contains(&b))
            }
        }
    }
}

fn trim(bytes: &[u8], strip: impl Fn(u8) -> bool) -> &[u8] {
    let start = bytes.iter().position(|&b| !strip(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| !strip(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Error returned when parsing a mode name fails.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode `{0}`")]
pub struct ParseModeError(String);

impl FromStr for SplitMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(SplitMode::None),
            "newline" => Ok(SplitMode::Newline),
            "whitespace" => Ok(SplitMode::Whitespace),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

impl FromStr for StripMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(StripMode::None),
            "whitespace" => Ok(StripMode::Whitespace),
            "punctuation" => Ok(StripMode::Punctuation),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Training text, one buffer per input stream in input order.
#[derive(Clone, Debug, Default)]
pub struct Corpus {
    streams: Vec<Vec<u8>>,
}

impl Corpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a corpus holding a single stream.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let mut corpus = Self::new();
        corpus.push(bytes);
        corpus
    }

    /// Read a whole stream into a single-stream corpus.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(Self::from_bytes(buf))
    }

    /// Read every file, in order. Any missing or unreadable file fails the
    /// whole load.
    pub fn from_paths<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Result<Self> {
        let mut corpus = Self::new();
        for path in paths {
            let path = path.as_ref();
            let read = |path: &Path| -> std::io::Result<Vec<u8>> {
                let mut buf = Vec::new();
                File::open(path)?.read_to_end(&mut buf)?;
                Ok(buf)
            };
            let buf = read(path).map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })?;
            corpus.push(buf);
        }
        Ok(corpus)
    }

    /// Append another stream after the existing ones.
    pub fn push(&mut self, bytes: impl Into<Vec<u8>>) {
        self.streams.push(bytes.into());
    }

    /// Number of input streams.
    pub fn streams(&self) -> usize {
        self.streams.len()
    }

    /// Total number of bytes across all streams.
    pub fn total_bytes(&self) -> usize {
        self.streams.iter().map(Vec::len).sum()
    }

    /// Lazily iterate the non-empty chunks of the corpus.
    ///
    /// Calling this again restarts the sequence from the first stream.
    pub fn chunks(&self, split: SplitMode, strip: StripMode) -> Chunks<'_> {
        Chunks {
            streams: self.streams.iter(),
            rest: None,
            split,
            strip,
        }
    }
}

/// Iterator over the chunks of a [`Corpus`].
#[derive(Clone, Debug)]
pub struct Chunks<'a> {
    streams: std::slice::Iter<'a, Vec<u8>>,
    rest: Option<&'a [u8]>,
    split: SplitMode,
    strip: StripMode,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        loop {
            let rest = match self.rest.take() {
                Some(rest) => rest,
                None => self.streams.next()?.as_slice(),
            };
            let (piece, tail) = self.split.next_piece(rest);
            self.rest = tail;
            let chunk = self.strip.apply(piece);
            if !chunk.is_empty() {
                return Some(chunk);
            }
        }
    }
}
