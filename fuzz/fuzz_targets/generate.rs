#![no_main]
use libfuzzer_sys::fuzz_target;
use shoco_tablegen::{Corpus, Generator, GeneratorConfig, SplitMode, StripMode};

fuzz_target!(|data: (Vec<u8>, u8, u8, u8, bool)| {
    let (text, lead, succ, modes, optimize) = data;
    let config = GeneratorConfig {
        split: [SplitMode::None, SplitMode::Newline, SplitMode::Whitespace][modes as usize % 3],
        strip: [StripMode::None, StripMode::Whitespace, StripMode::Punctuation]
            [(modes as usize / 3) % 3],
        max_leading_bits: lead % 8,
        max_successor_bits: succ % 8,
        encoding_types: 3,
        optimize,
    };

    let Ok(generator) = Generator::new(config) else {
        return;
    };
    let Ok(table) = generator.generate(&Corpus::from_bytes(text)) else {
        return;
    };

    let lead = generator.config().max_leading_bits;
    assert!(table.chrs_by_chr_id.len() <= 1 << lead);
    for (id, &c) in table.chrs_by_chr_id.iter().enumerate() {
        assert_eq!(table.chr_ids_by_chr[c as usize], id as i8);
    }
    let tracked = table.chr_ids_by_chr.iter().filter(|&&id| id >= 0).count();
    assert_eq!(tracked, table.chrs_by_chr_id.len());
    for pack in &table.packs {
        let fields: u32 = pack.masks.iter().map(|&m| (m as u32).count_ones()).sum();
        assert_eq!(pack.header_mask.leading_ones() + fields, pack.bytes_packed * 8);
    }
});
