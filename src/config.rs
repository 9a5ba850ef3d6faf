//! Generator configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunk::{SplitMode, StripMode};
use crate::encoding::CATALOG;
use crate::error::{Error, Result};
use crate::select::Selection;

/// Widest accepted identifier space. Identifiers are stored as `i8`.
pub const MAX_BITS: u8 = 7;

/// Settings given on top of a loaded configuration. `None` leaves the
/// loaded value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Replaces [`GeneratorConfig::split`].
    pub split: Option<SplitMode>,
    /// Replaces [`GeneratorConfig::strip`].
    pub strip: Option<StripMode>,
    /// Replaces [`GeneratorConfig::max_leading_bits`].
    pub max_leading_bits: Option<u8>,
    /// Replaces [`GeneratorConfig::max_successor_bits`].
    pub max_successor_bits: Option<u8>,
    /// Replaces [`GeneratorConfig::encoding_types`].
    pub encoding_types: Option<usize>,
    /// Turns optimization on; it is never turned off.
    pub optimize: bool,
}

/// Table generation settings.
///
/// Wider identifier spaces can track more characters and successors, which
/// may improve the compression ratio but makes the runtime tables larger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// How input streams are cut into chunks.
    #[serde(default)]
    pub split: SplitMode,

    /// What is trimmed from each chunk.
    #[serde(default)]
    pub strip: StripMode,

    /// Bits for a leading character's identifier.
    #[serde(default = "default_max_leading_bits")]
    pub max_leading_bits: u8,

    /// Bits for a successor's position.
    #[serde(default = "default_max_successor_bits")]
    pub max_successor_bits: u8,

    /// Number of packed-size classes to emit.
    #[serde(default = "default_encoding_types")]
    pub encoding_types: usize,

    /// Score the catalog against the corpus instead of using the defaults.
    #[serde(default)]
    pub optimize: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            split: SplitMode::default(),
            strip: StripMode::default(),
            max_leading_bits: default_max_leading_bits(),
            max_successor_bits: default_max_successor_bits(),
            encoding_types: default_encoding_types(),
            optimize: false,
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration from a JSON file. Missing fields take their
    /// defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Load `path` if given, otherwise start from the defaults, then apply
    /// `overrides`.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        Ok(base.merge(overrides))
    }

    /// Apply `overrides` field by field.
    pub fn merge(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(split) = overrides.split {
            self.split = split;
        }
        if let Some(strip) = overrides.strip {
            self.strip = strip;
        }
        if let Some(bits) = overrides.max_leading_bits {
            self.max_leading_bits = bits;
        }
        if let Some(bits) = overrides.max_successor_bits {
            self.max_successor_bits = bits;
        }
        if let Some(types) = overrides.encoding_types {
            self.encoding_types = types;
        }
        self.optimize |= overrides.optimize;
        self
    }

    /// Reject settings the generator cannot honor.
    pub fn validate(&self) -> Result<()> {
        check_bits("max_leading_bits", self.max_leading_bits)?;
        check_bits("max_successor_bits", self.max_successor_bits)?;
        if self.encoding_types == 0 || self.encoding_types > CATALOG.len() {
            return Err(Error::EncodingTypes {
                requested: self.encoding_types,
                available: CATALOG.len(),
            });
        }
        Ok(())
    }

    /// Selection strategy implied by `optimize`.
    pub fn selection(&self) -> Selection {
        Selection::from(self.optimize)
    }
}

fn check_bits(name: &'static str, bits: u8) -> Result<()> {
    if (1..=MAX_BITS).contains(&bits) {
        Ok(())
    } else {
        Err(Error::BitsOutOfRange {
            name,
            bits,
            min: 1,
            max: MAX_BITS,
        })
    }
}

fn default_max_leading_bits() -> u8 {
    5
}

fn default_max_successor_bits() -> u8 {
    4
}

fn default_encoding_types() -> usize {
    3
}
