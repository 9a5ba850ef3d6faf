//! Choosing one encoding per packed-size class.
//!
//! Two strategies implement [`EncodingSelector`]: [`DefaultEncodings`]
//! returns the hand-tuned layout of each class, and [`Optimizer`] scores
//! every eligible candidate against the training chunks. Both refuse to
//! return a layout whose fields are wider than the configured identifier
//! spaces.

use tracing::{debug, info};

use crate::encoding::{Encoding, EncodingClass, CATALOG};
use crate::error::{Error, Result};
use crate::rank::{InverseSuccessorMap, RankedChars};

/// Everything a selector may consult.
#[derive(Clone, Copy, Debug)]
pub struct SelectionContext<'a> {
    /// Training chunks in corpus order.
    pub chunks: &'a [&'a [u8]],
    /// Tracked leading characters.
    pub ranked: &'a RankedChars,
    /// Successor positions by identifier.
    pub successors: &'a InverseSuccessorMap,
    /// Configured leading-character width.
    pub max_leading_bits: u8,
    /// Configured successor width.
    pub max_successor_bits: u8,
    /// Number of catalog classes to fill, smallest packed size first.
    pub encoding_types: usize,
}

impl SelectionContext<'_> {
    fn classes(&self) -> &'static [EncodingClass] {
        &CATALOG[..self.encoding_types.min(CATALOG.len())]
    }

    fn no_fit(&self, class: &EncodingClass) -> Error {
        Error::NoEncodingFits {
            packed: class.packed,
            max_leading_bits: self.max_leading_bits,
            max_successor_bits: self.max_successor_bits,
        }
    }
}

/// One chosen encoding per enabled class, smallest packed size first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectedEncodings {
    encodings: Vec<Encoding>,
}

impl SelectedEncodings {
    /// The chosen encodings.
    pub fn as_slice(&self) -> &[Encoding] {
        &self.encodings
    }

    /// Number of classes filled.
    pub fn len(&self) -> usize {
        self.encodings.len()
    }

    /// True when no class is enabled.
    pub fn is_empty(&self) -> bool {
        self.encodings.is_empty()
    }
}

impl FromIterator<Encoding> for SelectedEncodings {
    fn from_iter<I: IntoIterator<Item = Encoding>>(iter: I) -> Self {
        Self {
            encodings: iter.into_iter().collect(),
        }
    }
}

/// A strategy for picking one encoding per enabled class.
pub trait EncodingSelector {
    /// Pick the encodings.
    ///
    /// # Errors
    /// Returns `Error::NoEncodingFits` if a class has nothing within the
    /// configured widths.
    fn select(&self, ctx: &SelectionContext<'_>) -> Result<SelectedEncodings>;
}

/// The hand-tuned layout of every class, independent of the corpus.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultEncodings;

impl EncodingSelector for DefaultEncodings {
    fn select(&self, ctx: &SelectionContext<'_>) -> Result<SelectedEncodings> {
        ctx.classes()
            .iter()
            .map(|class| {
                if class
                    .default
                    .fits(ctx.max_leading_bits, ctx.max_successor_bits)
                {
                    Ok(class.default)
                } else {
                    Err(ctx.no_fit(class))
                }
            })
            .collect()
    }
}

/// Scores candidates by how often, and how cheaply, they pack the corpus.
///
/// At every position of every chunk, each eligible candidate that can pack
/// the run starting there earns `packed / unpacked`. The best score wins;
/// earlier catalog entries win ties.
#[derive(Clone, Copy, Debug, Default)]
pub struct Optimizer;

impl Optimizer {
    /// Scores of every candidate of `class` that fits the configured widths,
    /// in catalog order.
    pub fn scores(&self, class: &EncodingClass, ctx: &SelectionContext<'_>) -> Vec<(Encoding, f64)> {
        let mut scored: Vec<(Encoding, f64)> = class
            .candidates
            .iter()
            .filter(|enc| enc.fits(ctx.max_leading_bits, ctx.max_successor_bits))
            .map(|&enc| (enc, 0.0))
            .collect();

        for chunk in ctx.chunks {
            for start in 0..chunk.len() {
                let run = &chunk[start..];
                for (enc, score) in scored.iter_mut() {
                    if enc.can_encode(run, ctx.ranked, ctx.successors) {
                        *score += class.packed as f64 / enc.unpacked() as f64;
                    }
                }
            }
        }
        scored
    }

    fn best(&self, class: &EncodingClass, ctx: &SelectionContext<'_>) -> Result<Encoding> {
        let scored = self.scores(class, ctx);
        let mut best: Option<(Encoding, f64)> = None;
        for &(enc, score) in &scored {
            debug!(packed = class.packed, bits = ?enc.bits(), score, "scored encoding");
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((enc, score));
            }
        }
        let (enc, score) = best.ok_or_else(|| ctx.no_fit(class))?;
        info!(
            packed = class.packed,
            bits = ?enc.bits(),
            score,
            candidates = scored.len(),
            "selected encoding"
        );
        Ok(enc)
    }
}

impl EncodingSelector for Optimizer {
    fn select(&self, ctx: &SelectionContext<'_>) -> Result<SelectedEncodings> {
        ctx.classes()
            .iter()
            .map(|class| self.best(class, ctx))
            .collect()
    }
}

/// Which selection strategy to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    /// Use [`DefaultEncodings`].
    #[default]
    Default,
    /// Use [`Optimizer`].
    Optimize,
}

impl Selection {
    /// The strategy object for this choice.
    pub fn selector(self) -> Box<dyn EncodingSelector> {
        match self {
            Selection::Default => Box::new(DefaultEncodings),
            Selection::Optimize => Box::new(Optimizer),
        }
    }
}

impl From<bool> for Selection {
    fn from(optimize: bool) -> Self {
        if optimize {
            Selection::Optimize
        } else {
            Selection::Default
        }
    }
}
