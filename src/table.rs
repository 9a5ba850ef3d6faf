//! The finished output table.
//!
//! [`OutputTable::assemble`] is a pure transformation of the pipeline's
//! intermediate values into fixed-shape arrays a runtime compressor can
//! embed directly. Writing it out is left to a [`crate::render::TableWriter`].

use crate::encoding::Encoding;
use crate::rank::{InverseSuccessorMap, RankedChars, SuccessorTable, NULL_CHR};
use crate::select::SelectedEncodings;

/// A fully resolved encoding.
///
/// `offsets` and `masks` hold one entry for the lead followed by one per
/// successor, zero-padded to the table's pack width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pack {
    /// Header pattern in place within the 32-bit word.
    pub word: u32,
    /// Bytes the pack occupies.
    pub bytes_packed: u32,
    /// Characters the pack stands for.
    pub bytes_unpacked: u32,
    /// Bit offset of each field within the 32-bit word.
    pub offsets: Vec<u32>,
    /// Value mask of each field.
    pub masks: Vec<i16>,
    /// Header mask within the first byte.
    pub header_mask: u8,
    /// Header pattern within the first byte.
    pub header: u8,
}

impl Pack {
    /// Resolve `encoding`, padding the field arrays to `width` entries.
    pub fn from_encoding(encoding: &Encoding, width: usize) -> Self {
        let fields = encoding.unpacked();
        let mut offsets = vec![0u32; width];
        let mut masks = vec![0i16; width];
        offsets[..fields].copy_from_slice(&encoding.offsets()[1..=fields]);
        for (slot, &mask) in masks.iter_mut().zip(&encoding.masks()[1..=fields]) {
            *slot = mask as i16;
        }
        Self {
            word: encoding.word(),
            bytes_packed: encoding.packed_bytes() as u32,
            bytes_unpacked: fields as u32,
            offsets,
            masks,
            header_mask: encoding.header_mask(),
            header: encoding.header_code(),
        }
    }

    /// Header width, recovered from the mask.
    pub fn header_bits(&self) -> u32 {
        self.header_mask.leading_ones()
    }
}

/// Everything the runtime compressor needs, in fixed shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputTable {
    /// Tracked leading characters in identifier order.
    pub chrs_by_chr_id: Vec<u8>,
    /// Identifier of every raw code, or `-1`.
    pub chr_ids_by_chr: [i8; 256],
    /// Flattened inverse successor rows, `successor_id_width` per leader.
    pub successor_ids_by_chr_id_and_chr_id: Vec<i8>,
    /// Entries per inverse successor row.
    pub successor_id_width: usize,
    /// Flattened successor rows, `successor_width` per leader.
    pub chrs_by_chr_id_and_successor_id: Vec<u8>,
    /// Slots per successor row.
    pub successor_width: usize,
    /// Smallest tracked raw code.
    pub min_chr: u8,
    /// One past the largest tracked raw code.
    pub max_chr: u16,
    /// Field entries per pack.
    pub pack_width: usize,
    /// Selected packs, smallest packed size first.
    pub packs: Vec<Pack>,
}

impl OutputTable {
    /// Assemble the table from the pipeline's intermediate values.
    pub fn assemble(
        ranked: &RankedChars,
        chr_ids: [i8; 256],
        successors: &SuccessorTable,
        successor_ids: &InverseSuccessorMap,
        selected: &SelectedEncodings,
    ) -> Self {
        let pack_width = selected
            .as_slice()
            .iter()
            .map(Encoding::unpacked)
            .max()
            .unwrap_or(0);
        let packs = selected
            .as_slice()
            .iter()
            .map(|enc| Pack::from_encoding(enc, pack_width))
            .collect();
        let (min_chr, max_chr) = match (ranked.chars().iter().min(), ranked.chars().iter().max()) {
            (Some(&lo), Some(&hi)) => (lo, hi as u16 + 1),
            _ => (0, 0),
        };
        Self {
            chrs_by_chr_id: ranked.chars().to_vec(),
            chr_ids_by_chr: chr_ids,
            successor_ids_by_chr_id_and_chr_id: successor_ids.as_flat().to_vec(),
            successor_id_width: successor_ids.width(),
            chrs_by_chr_id_and_successor_id: successors.as_flat().to_vec(),
            successor_width: successors.width(),
            min_chr,
            max_chr,
            pack_width,
            packs,
        }
    }

    /// Most successors any pack carries.
    pub fn max_successor_n(&self) -> usize {
        self.pack_width.saturating_sub(1)
    }

    /// Inverse successor row of leader `chr_id`.
    pub fn successor_ids(&self, chr_id: usize) -> &[i8] {
        let w = self.successor_id_width;
        &self.successor_ids_by_chr_id_and_chr_id[chr_id * w..(chr_id + 1) * w]
    }

    /// Successor row of leader `chr_id`.
    pub fn successors(&self, chr_id: usize) -> &[u8] {
        let w = self.successor_width;
        &self.chrs_by_chr_id_and_successor_id[chr_id * w..(chr_id + 1) * w]
    }

    /// Successor rows indexed by raw code over `min_chr..max_chr`; codes
    /// that are not tracked get a row of [`NULL_CHR`].
    pub fn successors_by_chr(&self) -> Vec<Vec<u8>> {
        (self.min_chr as u16..self.max_chr)
            .map(|code| match self.chr_ids_by_chr[code as usize] {
                id if id >= 0 => self.successors(id as usize).to_vec(),
                _ => vec![NULL_CHR; self.successor_width],
            })
            .collect()
    }
}
