//! Bigram frequency analysis.
//!
//! Every adjacent byte pair `(a, b)` inside a chunk counts once towards
//! `a` as a leading character and once towards `b` as a successor of `a`.

use tracing::info;

/// Occurrence counts over the byte alphabet, remembering the order in which
/// each byte was first counted.
///
/// The first-seen order is the tie-break for [`Tally::most_common`]: among
/// equal counts, the byte counted earlier ranks higher.
#[derive(Clone, Debug)]
pub struct Tally {
    counts: [u64; 256],
    order: Vec<u8>,
}

impl Default for Tally {
    fn default() -> Self {
        Self {
            counts: [0; 256],
            order: Vec::new(),
        }
    }
}

impl Tally {
    /// Count one occurrence of `byte`.
    pub fn add(&mut self, byte: u8) {
        let slot = &mut self.counts[byte as usize];
        if *slot == 0 {
            self.order.push(byte);
        }
        *slot += 1;
    }

    /// Occurrences of `byte`.
    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Number of distinct bytes counted.
    pub fn distinct(&self) -> usize {
        self.order.len()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// The `k` most frequent bytes, ordered by `(-count, first_seen)`.
    ///
    /// This is a bounded selection: bytes past the first `k` are dropped.
    pub fn most_common(&self, k: usize) -> Vec<u8> {
        let mut ranked: Vec<(usize, u8)> = self.order.iter().copied().enumerate().collect();
        ranked.sort_by_key(|&(seen, byte)| (std::cmp::Reverse(self.count(byte)), seen));
        ranked.into_iter().take(k).map(|(_, byte)| byte).collect()
    }
}

/// Leading-character and successor frequencies of a corpus.
#[derive(Clone, Debug)]
pub struct BigramCounts {
    leads: Tally,
    successors: Vec<Tally>,
}

impl Default for BigramCounts {
    fn default() -> Self {
        Self {
            leads: Tally::default(),
            successors: vec![Tally::default(); 256],
        }
    }
}

impl BigramCounts {
    /// Count the bigrams of every chunk. No bigram spans two chunks.
    pub fn scan<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut counts = Self::default();
        let mut nchunks = 0usize;
        for chunk in chunks {
            nchunks += 1;
            for pair in chunk.windows(2) {
                counts.add(pair[0], pair[1]);
            }
        }
        info!(
            chunks = nchunks,
            bigrams = counts.leads.total(),
            leaders = counts.leads.distinct(),
            "counted bigrams"
        );
        counts
    }

    /// Count a single bigram.
    pub fn add(&mut self, lead: u8, successor: u8) {
        self.leads.add(lead);
        self.successors[lead as usize].add(successor);
    }

    /// How often each byte leads a bigram.
    pub fn leads(&self) -> &Tally {
        &self.leads
    }

    /// How often each byte follows `lead`.
    pub fn successors_of(&self, lead: u8) -> &Tally {
        &self.successors[lead as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_counts_pairs_within_chunks() {
        let chunks: [&[u8]; 2] = [b"abc", b"cd"];
        let counts = BigramCounts::scan(chunks);
        assert_eq!(counts.leads().count(b'a'), 1);
        assert_eq!(counts.leads().count(b'b'), 1);
        assert_eq!(counts.leads().count(b'c'), 1);
        assert_eq!(counts.leads().count(b'd'), 0);
        // "c" ends the first chunk, so only the "cd" chunk contributes.
        assert_eq!(counts.successors_of(b'c').count(b'd'), 1);
        assert_eq!(counts.successors_of(b'b').count(b'c'), 1);
        assert_eq!(counts.leads().total(), 3);
    }

    #[test]
    fn test_empty_and_single_byte_chunks_count_nothing() {
        let chunks: [&[u8]; 2] = [b"", b"x"];
        let counts = BigramCounts::scan(chunks);
        assert_eq!(counts.leads().distinct(), 0);
        assert!(counts.leads().most_common(4).is_empty());
    }

    #[test]
    fn test_most_common_breaks_ties_by_first_seen() {
        let mut tally = Tally::default();
        for &b in b"zyxyzq" {
            tally.add(b);
        }
        // z=2, y=2, x=1, q=1; z was seen before y, x before q.
        assert_eq!(tally.most_common(10), b"zyxq".to_vec());
        assert_eq!(tally.most_common(3), b"zyx".to_vec());
    }

    #[test]
    fn test_most_common_prefers_count_over_order() {
        let mut tally = Tally::default();
        for &b in b"abbb" {
            tally.add(b);
        }
        assert_eq!(tally.most_common(2), b"ba".to_vec());
    }
}
