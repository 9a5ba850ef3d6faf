//! # Successor tables for short-string compression
//!
//! *Learning shoco-style pack layouts from a training corpus.*
//!
//! ## Intuition First
//!
//! In English text, after a `t` you very often see an `h`, after `th` an
//! `e`. If both sides agree on a short list of "likely next characters" for
//! every common character, a run like `the` can be sent as three small list
//! positions instead of three full bytes. A *pack* is exactly that: a header
//! that tags its size, the identifier of the leading character, and the
//! positions of each following character in its predecessor's list.
//!
//! This crate builds those lists and chooses the bit layouts of the packs.
//! The compressor that uses them lives elsewhere.
//!
//! ## The Problem
//!
//! Entropy coders need a stream to amortize their model; a 20-byte string
//! has none. Short strings need a *static* model that is small enough to
//! embed in the program and still captures the character statistics of the
//! target text.
//!
//! ## Pipeline
//!
//! ```text
//! Corpus ──chunks──▶ BigramCounts ──▶ RankedChars ──▶ SuccessorTable
//!                                           │               │
//!                                           ▼               ▼
//!                      CATALOG ──▶ EncodingSelector ──▶ OutputTable ──▶ TableWriter
//! ```
//!
//! 1. [`chunk`]: split and trim the corpus into chunks.
//! 2. [`bigram`]: count leading characters and their successors.
//! 3. [`rank`]: keep the `2^lead_bits` most common leaders and the
//!    `2^successor_bits` most common successors of each.
//! 4. [`encoding`]: the fixed catalog of candidate layouts per packed size.
//! 5. [`select`]: pick one layout per size, either the defaults or the best
//!    scoring candidate on the corpus.
//! 6. [`table`]: resolve the layouts into packs and assemble the table.
//!
//! ## Pack Layout
//!
//! Fields are laid out from the top bit of a 32-bit word. The header is a
//! run of ones closed by a zero, so packs never collide with plain ASCII:
//!
//! ```text
//! 1 byte   10 llll ss
//! 2 bytes  110 llll sss sss sss
//! 4 bytes  1110 lllll ssss ssss ssss sss sss sss ss
//! ```
//!
//! ## Determinism
//!
//! Every ranking breaks ties by first occurrence in corpus order and the
//! optimizer breaks ties by catalog order, so the same corpus and settings
//! always produce the same table.
//!
//! ## References
//!
//! - Schramm, C. (2014). "shoco: a fast compressor for short strings."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bigram;
pub mod chunk;
pub mod config;
pub mod encoding;
pub mod error;
pub mod generator;
pub mod rank;
pub mod render;
pub mod select;
pub mod table;

pub use chunk::{Corpus, SplitMode, StripMode};
pub use config::{ConfigOverrides, GeneratorConfig};
pub use encoding::{Encoding, EncodingClass, CATALOG};
pub use error::{Error, Result};
pub use generator::Generator;
pub use render::{GoTableWriter, TableWriter};
pub use select::{DefaultEncodings, EncodingSelector, Optimizer, Selection};
pub use table::{OutputTable, Pack};
