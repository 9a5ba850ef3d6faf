//! The end-to-end pipeline.

use tracing::info;

use crate::bigram::BigramCounts;
use crate::chunk::Corpus;
use crate::config::GeneratorConfig;
use crate::encoding::CATALOG_VERSION;
use crate::error::Result;
use crate::rank::{InverseSuccessorMap, RankedChars, SuccessorTable};
use crate::select::SelectionContext;
use crate::table::OutputTable;

/// Runs chunking, analysis, selection and assembly for one configuration.
#[derive(Clone, Debug)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a generator after validating `config`.
    ///
    /// # Errors
    /// Returns an error if a bit width or the encoding type count is out of
    /// range.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build the table for `corpus`.
    ///
    /// An empty corpus yields a table with no tracked characters.
    ///
    /// # Errors
    /// Returns `Error::NoEncodingFits` if a packed-size class has no layout
    /// within the configured widths.
    pub fn generate(&self, corpus: &Corpus) -> Result<OutputTable> {
        let cfg = &self.config;
        let chunks: Vec<&[u8]> = corpus.chunks(cfg.split, cfg.strip).collect();

        let counts = BigramCounts::scan(chunks.iter().copied());
        let ranked = RankedChars::from_counts(&counts, cfg.max_leading_bits);
        let successors = SuccessorTable::build(&counts, &ranked, cfg.max_successor_bits);
        let successor_ids = InverseSuccessorMap::build(&ranked, &successors, cfg.max_leading_bits);

        let ctx = SelectionContext {
            chunks: &chunks,
            ranked: &ranked,
            successors: &successor_ids,
            max_leading_bits: cfg.max_leading_bits,
            max_successor_bits: cfg.max_successor_bits,
            encoding_types: cfg.encoding_types,
        };
        let selection = cfg.selection();
        let selected = selection.selector().select(&ctx)?;
        info!(
            ?selection,
            catalog_version = CATALOG_VERSION,
            packs = selected.len(),
            "selected encodings"
        );

        Ok(OutputTable::assemble(
            &ranked,
            ranked.inverse(),
            &successors,
            &successor_ids,
            &selected,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{SplitMode, StripMode};
    use crate::error::Error;
    use crate::rank::ABSENT;

    fn config(split: SplitMode, strip: StripMode, lead: u8, succ: u8) -> GeneratorConfig {
        GeneratorConfig {
            split,
            strip,
            max_leading_bits: lead,
            max_successor_bits: succ,
            ..Default::default()
        }
    }

    #[test]
    fn test_trivial_corpus_scenario() {
        let mut cfg = config(SplitMode::None, StripMode::None, 1, 1);
        cfg.encoding_types = 1;
        cfg.optimize = true;
        let table = Generator::new(cfg)
            .unwrap()
            .generate(&Corpus::from_bytes(&b"aab"[..]))
            .unwrap();
        assert_eq!(table.chrs_by_chr_id, b"a");
        assert_eq!(table.successors(0), b"ab");
        assert_eq!(table.chr_ids_by_chr[b'a' as usize], 0);
        assert_eq!(table.chr_ids_by_chr[b'b' as usize], ABSENT);
        // Only (2, 1, 1, 1, 1, 1, 1) fits one-bit fields.
        assert_eq!(table.packs.len(), 1);
        assert_eq!(table.packs[0].bytes_unpacked, 6);
    }

    #[test]
    fn test_empty_corpus_is_not_an_error() {
        let generator = Generator::new(GeneratorConfig::default()).unwrap();
        let table = generator.generate(&Corpus::new()).unwrap();
        assert!(table.chrs_by_chr_id.is_empty());
        assert!(table.chr_ids_by_chr.iter().all(|&id| id == ABSENT));
        assert!(table.successor_ids_by_chr_id_and_chr_id.is_empty());
        assert_eq!(table.packs.len(), 3);
    }

    #[test]
    fn test_invalid_config_is_rejected_up_front() {
        let cfg = GeneratorConfig {
            encoding_types: 0,
            ..Default::default()
        };
        assert!(matches!(
            Generator::new(cfg),
            Err(Error::EncodingTypes { .. })
        ));
    }

    #[test]
    fn test_runs_are_deterministic() {
        let corpus = Corpus::from_bytes(
            &b"the quick brown fox\njumps over the lazy dog\nthe end\n"[..],
        );
        let cfg = GeneratorConfig {
            optimize: true,
            ..Default::default()
        };
        let generator = Generator::new(cfg).unwrap();
        assert_eq!(
            generator.generate(&corpus).unwrap(),
            generator.generate(&corpus).unwrap()
        );
    }

    #[test]
    fn test_default_selection_matches_builtin_layouts() {
        let generator = Generator::new(GeneratorConfig::default()).unwrap();
        let table = generator
            .generate(&Corpus::from_bytes(&b"hello world"[..]))
            .unwrap();
        let unpacked: Vec<u32> = table.packs.iter().map(|p| p.bytes_unpacked).collect();
        let packed: Vec<u32> = table.packs.iter().map(|p| p.bytes_packed).collect();
        assert_eq!(unpacked, vec![2, 4, 8]);
        assert_eq!(packed, vec![1, 2, 4]);
    }
}
