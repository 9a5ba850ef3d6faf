//! Character ranking and successor tables.
//!
//! The most frequent leading characters get dense identifiers `0..K`.
//! Each tracked leader then gets a fixed-width list of its most frequent
//! successors, and both mappings are inverted into `i8` lookup tables
//! where [`ABSENT`] marks untracked entries.

use tracing::info;

use crate::bigram::BigramCounts;

/// Sentinel for "not tracked" in every inverse table.
pub const ABSENT: i8 = -1;

/// Filler byte for unused successor slots.
pub const NULL_CHR: u8 = 0;

/// Tracked leading characters, most frequent first. A character's position
/// is its identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedChars {
    chars: Vec<u8>,
    ids: [Option<u8>; 256],
}

impl Default for RankedChars {
    fn default() -> Self {
        Self::from_chars(Vec::new())
    }
}

impl RankedChars {
    /// Keep the `2^max_leading_bits` most frequent leaders.
    pub fn from_counts(counts: &BigramCounts, max_leading_bits: u8) -> Self {
        let capacity = 1usize << max_leading_bits;
        let ranked = Self::from_chars(counts.leads().most_common(capacity));
        info!(
            tracked = ranked.len(),
            capacity, "ranked leading characters"
        );
        ranked
    }

    /// Build from an already ordered list of distinct characters.
    ///
    /// # Panics
    /// Panics if the list holds more than 256 entries or repeats a character.
    pub(crate) fn from_chars(chars: Vec<u8>) -> Self {
        let mut ids = [None; 256];
        for (id, &c) in chars.iter().enumerate() {
            assert!(ids[c as usize].is_none(), "duplicate ranked character {c:#04x}");
            ids[c as usize] = Some(id as u8);
        }
        Self { chars, ids }
    }

    /// Number of tracked characters (K).
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// True when no character is tracked.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Tracked characters in identifier order.
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// Identifier of `c`, if tracked.
    #[inline]
    pub fn id_of(&self, c: u8) -> Option<u8> {
        self.ids[c as usize]
    }

    /// The 256-entry map from raw code to identifier.
    pub fn inverse(&self) -> [i8; 256] {
        let mut inverse = [ABSENT; 256];
        for (id, &c) in self.chars.iter().enumerate() {
            inverse[c as usize] = id as i8;
        }
        inverse
    }
}

/// Most frequent successors of each tracked leader, one fixed-width row per
/// leader identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuccessorTable {
    width: usize,
    slots: Vec<u8>,
    lens: Vec<usize>,
}

impl SuccessorTable {
    /// Keep the `2^max_successor_bits` most frequent successors of every
    /// ranked leader, padding short rows with [`NULL_CHR`].
    pub fn build(counts: &BigramCounts, ranked: &RankedChars, max_successor_bits: u8) -> Self {
        let width = 1usize << max_successor_bits;
        let mut slots = vec![NULL_CHR; ranked.len() * width];
        let mut lens = Vec::with_capacity(ranked.len());
        for (row, &lead) in slots.chunks_mut(width).zip(ranked.chars()) {
            let top = counts.successors_of(lead).most_common(width);
            row[..top.len()].copy_from_slice(&top);
            lens.push(top.len());
        }
        info!(
            leaders = ranked.len(),
            width, "built successor table"
        );
        Self { width, slots, lens }
    }

    /// Slots per row (L).
    pub fn width(&self) -> usize {
        self.width
    }

    /// The padded row of the leader with identifier `lead_id`.
    pub fn row(&self, lead_id: usize) -> &[u8] {
        &self.slots[lead_id * self.width..(lead_id + 1) * self.width]
    }

    /// Only the real successors of `lead_id`, without padding.
    pub fn successors(&self, lead_id: usize) -> &[u8] {
        &self.row(lead_id)[..self.lens[lead_id]]
    }

    /// All rows back to back.
    pub fn as_flat(&self) -> &[u8] {
        &self.slots
    }
}

/// For each leader, the position of every tracked character in that
/// leader's successor list.
///
/// Rows are `2^max_leading_bits` wide and indexed by the candidate's
/// identifier, not its raw code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InverseSuccessorMap {
    width: usize,
    slots: Vec<i8>,
}

impl InverseSuccessorMap {
    /// Invert `successors` over the identifier space of `ranked`.
    pub fn build(ranked: &RankedChars, successors: &SuccessorTable, max_leading_bits: u8) -> Self {
        let width = 1usize << max_leading_bits;
        let mut slots = vec![ABSENT; ranked.len() * width];
        for (lead_id, row) in slots.chunks_mut(width).enumerate() {
            // First occurrence wins; rows hold distinct bytes anyway.
            for (pos, &c) in successors.successors(lead_id).iter().enumerate().rev() {
                if let Some(id) = ranked.id_of(c) {
                    row[id as usize] = pos as i8;
                }
            }
        }
        Self { width, slots }
    }

    /// Entries per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Position of tracked character `cand_id` among the successors of
    /// `lead_id`.
    #[inline]
    pub fn position(&self, lead_id: u8, cand_id: u8) -> Option<u8> {
        let pos = self.slots[lead_id as usize * self.width + cand_id as usize];
        (pos >= 0).then_some(pos as u8)
    }

    /// The row of `lead_id`.
    pub fn row(&self, lead_id: usize) -> &[i8] {
        &self.slots[lead_id * self.width..(lead_id + 1) * self.width]
    }

    /// All rows back to back.
    pub fn as_flat(&self) -> &[i8] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts_of(chunks: &[&[u8]]) -> BigramCounts {
        BigramCounts::scan(chunks.iter().copied())
    }

    #[test]
    fn test_trivial_corpus() {
        let counts = counts_of(&[&b"aab"[..]]);
        let ranked = RankedChars::from_counts(&counts, 1);
        assert_eq!(ranked.chars(), b"a");

        let successors = SuccessorTable::build(&counts, &ranked, 1);
        assert_eq!(successors.row(0), b"ab");

        let inverse = InverseSuccessorMap::build(&ranked, &successors, 1);
        // Only 'a' is tracked; 'b' has no identifier.
        assert_eq!(inverse.row(0), &[0, ABSENT]);
    }

    #[test]
    fn test_capacity_bounds_ranking() {
        let counts = counts_of(&[&b"abcdefabcabaa"[..]]);
        let ranked = RankedChars::from_counts(&counts, 1);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked.chars(), b"ab");
        assert_eq!(ranked.id_of(b'c'), None);
    }

    #[test]
    fn test_ranking_from_counts_never_repeats() {
        let corpus: Vec<u8> = (0..=255u8).chain((0..=255u8).rev()).collect();
        let counts = counts_of(&[&corpus[..]]);
        let ranked = RankedChars::from_counts(&counts, 7);
        assert_eq!(ranked.len(), 128);
        let mut seen = [false; 256];
        for &c in ranked.chars() {
            assert!(!seen[c as usize]);
            seen[c as usize] = true;
        }
    }

    #[test]
    fn test_inverse_map_matches_positions() {
        let ranked = RankedChars::from_chars(b"etao".to_vec());
        let inverse = ranked.inverse();
        for code in 0..=255u8 {
            let expected = ranked
                .chars()
                .iter()
                .position(|&c| c == code)
                .map_or(ABSENT, |i| i as i8);
            assert_eq!(inverse[code as usize], expected);
        }
    }

    #[test]
    fn test_short_rows_are_padded() {
        let counts = counts_of(&[&b"xyxz"[..]]);
        let ranked = RankedChars::from_counts(&counts, 2);
        let successors = SuccessorTable::build(&counts, &ranked, 2);
        assert_eq!(ranked.chars(), b"xy");
        assert_eq!(successors.row(0), &[b'y', b'z', NULL_CHR, NULL_CHR]);
        assert_eq!(successors.successors(0), b"yz");
        assert_eq!(successors.row(1), &[b'x', NULL_CHR, NULL_CHR, NULL_CHR]);
        assert_eq!(successors.as_flat().len(), 8);
    }

    #[test]
    fn test_nul_successor_is_not_confused_with_padding() {
        let counts = counts_of(&[&b"a\0ab"[..]]);
        let ranked = RankedChars::from_counts(&counts, 2);
        assert_eq!(ranked.chars(), b"a\0");
        let successors = SuccessorTable::build(&counts, &ranked, 2);
        let inverse = InverseSuccessorMap::build(&ranked, &successors, 2);
        // 'a' is followed by NUL then 'b'; the NUL padding after them is not
        // a successor.
        assert_eq!(inverse.position(0, 1), Some(0));
        assert_eq!(inverse.position(1, 0), Some(0));
        assert_eq!(inverse.position(1, 1), None);
        assert_eq!(inverse.row(0), &[ABSENT, 0, ABSENT, ABSENT]);
    }

    #[test]
    fn test_empty_counts_give_empty_tables() {
        let counts = BigramCounts::default();
        let ranked = RankedChars::from_counts(&counts, 5);
        let successors = SuccessorTable::build(&counts, &ranked, 4);
        let inverse = InverseSuccessorMap::build(&ranked, &successors, 5);
        assert!(ranked.is_empty());
        assert!(ranked.inverse().iter().all(|&id| id == ABSENT));
        assert!(successors.as_flat().is_empty());
        assert!(inverse.as_flat().is_empty());
    }
}
