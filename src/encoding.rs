//! Pack layouts and the candidate catalog.
//!
//! An [`Encoding`] is a list of bit widths: a header that tags the pack,
//! the width of the leading character's identifier, then one width per
//! successor. Fields are laid out from the most significant bit of a
//! 32-bit word, so a 1-byte pack occupies the top byte:
//!
//! ```text
//! (2, 4, 2)       header  lead    succ
//!                 10      xxxx    yy       | unused low 24 bits
//!                 31..30  29..26  25..24
//! ```
//!
//! The header is a run of ones terminated by a zero (`10`, `110`, `1110`),
//! so a decoder can tell pack sizes apart from the first byte and from
//! plain ASCII, which always has a clear top bit.

use crate::rank::{InverseSuccessorMap, RankedChars};

/// Longest run of characters a single pack can cover.
pub const MAX_CONSECUTIVES: usize = 8;

/// Bumped whenever [`CATALOG`] changes.
pub const CATALOG_VERSION: u32 = 1;

/// A bit-width layout: `[header, lead, successors...]`.
///
/// Two encodings are equal when their width sequences are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Encoding {
    bits: &'static [u8],
}

impl Encoding {
    /// Wrap a width sequence. It needs at least a header and a lead.
    pub const fn new(bits: &'static [u8]) -> Self {
        assert!(bits.len() >= 2, "an encoding needs a header and a lead");
        Self { bits }
    }

    /// All widths, header first.
    pub fn bits(&self) -> &'static [u8] {
        self.bits
    }

    /// Header width.
    pub fn header_bits(&self) -> u8 {
        self.bits[0]
    }

    /// Width of the leading character's identifier.
    pub fn lead_bits(&self) -> u8 {
        self.bits[1]
    }

    /// Widths of the successor positions.
    pub fn successor_bits(&self) -> &'static [u8] {
        &self.bits[2..]
    }

    /// Lead and successor widths, one per packed character.
    pub fn consecutive(&self) -> &'static [u8] {
        &self.bits[1..]
    }

    /// Sum of all widths.
    pub fn total_bits(&self) -> u32 {
        self.bits.iter().map(|&b| b as u32).sum()
    }

    /// Bytes the pack occupies once encoded.
    pub fn packed_bytes(&self) -> u8 {
        (self.total_bits() / 8) as u8
    }

    /// Characters the pack stands for.
    pub fn unpacked(&self) -> usize {
        self.bits.iter().filter(|&&b| b != 0).count() - 1
    }

    /// Bit offset of every field, header first, counted from bit 0 of a
    /// 32-bit word.
    pub fn offsets(&self) -> Vec<u32> {
        let mut used = 0u32;
        self.bits
            .iter()
            .map(|&b| {
                used += b as u32;
                32 - used
            })
            .collect()
    }

    /// Value mask of every field, header first.
    pub fn masks(&self) -> Vec<u32> {
        self.bits.iter().map(|&b| (1u32 << b) - 1).collect()
    }

    /// The header pattern within the first byte.
    pub fn header_code(&self) -> u8 {
        let h = self.header_bits() as u32;
        (((1u32 << h) - 2) << (8 - h)) as u8
    }

    /// The header mask within the first byte.
    pub fn header_mask(&self) -> u8 {
        let h = self.header_bits() as u32;
        (((1u32 << h) - 1) << (8 - h)) as u8
    }

    /// The header pattern in place within the 32-bit word.
    pub fn word(&self) -> u32 {
        let h = self.header_bits() as u32;
        ((1u32 << h) - 2) << (32 - h)
    }

    /// Whether no field is wider than the configured identifier spaces.
    pub fn fits(&self, max_leading_bits: u8, max_successor_bits: u8) -> bool {
        self.lead_bits() <= max_leading_bits
            && self
                .successor_bits()
                .iter()
                .all(|&b| b <= max_successor_bits)
    }

    /// Whether this layout can pack the run starting at `run[0]`.
    ///
    /// The lead's identifier must fit the lead width. Each following byte
    /// must be tracked, must appear among the successors of the byte
    /// *immediately before it*, and its position there must fit that
    /// field's width.
    pub fn can_encode(
        &self,
        run: &[u8],
        ranked: &RankedChars,
        successors: &InverseSuccessorMap,
    ) -> bool {
        let widths = &self.consecutive()[..self.unpacked()];
        if run.len() < widths.len() {
            return false;
        }
        let Some(mut prev) = ranked.id_of(run[0]) else {
            return false;
        };
        if !fits_in(prev, widths[0]) {
            return false;
        }
        for (&bits, &c) in widths[1..].iter().zip(&run[1..]) {
            let Some(id) = ranked.id_of(c) else {
                return false;
            };
            match successors.position(prev, id) {
                Some(pos) if fits_in(pos, bits) => prev = id,
                _ => return false,
            }
        }
        true
    }
}

#[inline]
fn fits_in(value: u8, bits: u8) -> bool {
    (value as u32) < (1u32 << bits)
}

/// Candidate layouts sharing one packed size.
#[derive(Clone, Copy, Debug)]
pub struct EncodingClass {
    /// Packed size in bytes.
    pub packed: u8,
    /// Candidates in preference order; earlier entries win ties.
    pub candidates: &'static [Encoding],
    /// Layout used when the corpus is not consulted.
    pub default: Encoding,
}

/// The fixed candidate catalog, one class per packed size.
pub static CATALOG: &[EncodingClass] = &[
    EncodingClass {
        packed: 1,
        candidates: &[
            Encoding::new(&[2, 4, 2]),
            Encoding::new(&[2, 3, 3]),
            Encoding::new(&[2, 4, 1, 1]),
            Encoding::new(&[2, 3, 2, 1]),
            Encoding::new(&[2, 2, 2, 2]),
            Encoding::new(&[2, 3, 1, 1, 1]),
            Encoding::new(&[2, 2, 2, 1, 1]),
            Encoding::new(&[2, 2, 1, 1, 1, 1]),
            Encoding::new(&[2, 1, 1, 1, 1, 1, 1]),
        ],
        default: Encoding::new(&[2, 4, 2]),
    },
    EncodingClass {
        packed: 2,
        candidates: &[
            Encoding::new(&[3, 5, 4, 2, 2]),
            Encoding::new(&[3, 5, 3, 3, 2]),
            Encoding::new(&[3, 4, 4, 3, 2]),
            Encoding::new(&[3, 4, 3, 3, 3]),
            Encoding::new(&[3, 5, 3, 2, 2, 1]),
            Encoding::new(&[3, 5, 2, 2, 2, 2]),
            Encoding::new(&[3, 4, 4, 2, 2, 1]),
            Encoding::new(&[3, 4, 3, 2, 2, 2]),
            Encoding::new(&[3, 4, 3, 3, 2, 1]),
            Encoding::new(&[3, 4, 2, 2, 2, 2]),
            Encoding::new(&[3, 3, 3, 3, 2, 2]),
            Encoding::new(&[3, 4, 3, 2, 2, 1, 1]),
            Encoding::new(&[3, 4, 2, 2, 2, 2, 1]),
            Encoding::new(&[3, 3, 3, 2, 2, 2, 1]),
            Encoding::new(&[3, 3, 2, 2, 2, 2, 2]),
            Encoding::new(&[3, 2, 2, 2, 2, 2, 2]),
            Encoding::new(&[3, 3, 3, 2, 2, 1, 1, 1]),
            Encoding::new(&[3, 3, 2, 2, 2, 2, 1, 1]),
            Encoding::new(&[3, 2, 2, 2, 2, 2, 2, 1]),
        ],
        default: Encoding::new(&[3, 4, 3, 3, 3]),
    },
    EncodingClass {
        packed: 4,
        candidates: &[
            Encoding::new(&[4, 5, 4, 4, 4, 3, 3, 3, 2]),
            Encoding::new(&[4, 5, 5, 4, 4, 3, 3, 2, 2]),
            Encoding::new(&[4, 4, 4, 4, 4, 4, 3, 3, 2]),
            Encoding::new(&[4, 4, 4, 4, 4, 3, 3, 3, 3]),
        ],
        default: Encoding::new(&[4, 5, 4, 4, 4, 3, 3, 3, 2]),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigram::BigramCounts;
    use crate::rank::SuccessorTable;

    #[test]
    fn test_catalog_widths_close_over_packed_size() {
        for class in CATALOG {
            for enc in class.candidates.iter().chain([&class.default]) {
                assert_eq!(enc.total_bits(), class.packed as u32 * 8, "{enc:?}");
                assert_eq!(enc.packed_bytes(), class.packed);
                assert!(enc.unpacked() <= MAX_CONSECUTIVES);
            }
            assert!(class.candidates.contains(&class.default));
        }
    }

    #[test]
    fn test_derived_fields_of_two_byte_default() {
        let enc = Encoding::new(&[3, 4, 3, 3, 3]);
        assert_eq!(enc.packed_bytes(), 2);
        assert_eq!(enc.unpacked(), 4);
        assert_eq!(enc.offsets(), vec![29, 25, 22, 19, 16]);
        assert_eq!(enc.masks(), vec![7, 15, 7, 7, 7]);
        assert_eq!(enc.header_code(), 0xc0);
        assert_eq!(enc.header_mask(), 0xe0);
        assert_eq!(enc.word(), 0xc000_0000);
    }

    #[test]
    fn test_header_codes_per_class() {
        let headers: Vec<(u8, u8)> = CATALOG
            .iter()
            .map(|c| (c.default.header_code(), c.default.header_mask()))
            .collect();
        assert_eq!(headers, vec![(0x80, 0xc0), (0xc0, 0xe0), (0xe0, 0xf0)]);
    }

    #[test]
    fn test_header_mask_recovers_header_bits() {
        for class in CATALOG {
            for enc in class.candidates {
                let h = enc.header_bits();
                assert_eq!(enc.header_mask().leading_ones(), h as u32);
                assert_eq!(enc.header_code(), enc.header_mask() & !(1u8 << (8 - h)));
            }
        }
    }

    #[test]
    fn test_fits_checks_lead_and_successors() {
        let enc = Encoding::new(&[3, 5, 4, 2, 2]);
        assert!(enc.fits(5, 4));
        assert!(!enc.fits(4, 4));
        assert!(!enc.fits(5, 3));
    }

    fn tables(text: &[u8], lead_bits: u8, succ_bits: u8) -> (RankedChars, InverseSuccessorMap) {
        let counts = BigramCounts::scan([text]);
        let ranked = RankedChars::from_counts(&counts, lead_bits);
        let successors = SuccessorTable::build(&counts, &ranked, succ_bits);
        let inverse = InverseSuccessorMap::build(&ranked, &successors, lead_bits);
        (ranked, inverse)
    }

    #[test]
    fn test_can_encode_follows_the_chain() {
        // 'a' leads most, then 'b', then 'c'. 'a' is only ever followed by
        // 'b', and 'b' only by 'c'.
        let (ranked, inverse) = tables(b"abcabcabab", 2, 1);
        let enc = Encoding::new(&[2, 2, 1, 1]);
        assert!(enc.can_encode(b"abc", &ranked, &inverse));
        // "abb": 'b' never follows 'b', so the chain breaks at the second
        // successor even though 'b' is a successor of the lead.
        assert!(!enc.can_encode(b"abb", &ranked, &inverse));
        assert!(!enc.can_encode(b"ab", &ranked, &inverse));
    }

    #[test]
    fn test_can_encode_rejects_untracked_and_wide_ids() {
        let (ranked, inverse) = tables(b"aabbaacd", 2, 2);
        let narrow = Encoding::new(&[2, 1, 1, 1, 1, 1, 1]);
        assert!(!narrow.can_encode(b"zzzzzz", &ranked, &inverse));
        // 'c' ranks third, so its id (2) does not fit in one lead bit.
        let lead_one_bit = Encoding::new(&[7, 1]);
        assert_eq!(ranked.id_of(b'c'), Some(2));
        assert!(!lead_one_bit.can_encode(b"c", &ranked, &inverse));
        assert!(lead_one_bit.can_encode(b"a", &ranked, &inverse));
    }
}
