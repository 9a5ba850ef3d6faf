//! Writing an [`OutputTable`] out.
//!
//! The table itself is format-agnostic; a [`TableWriter`] turns it into the
//! artifact a runtime compressor builds against. [`GoTableWriter`] emits a
//! Go source file.
//!
//! Successor rows are written as `[]byte`. A tracked successor may be any
//! byte, and codes above `0x7f` do not fit an `int8` literal, so the Go
//! side indexes and compares them as bytes. Identifier tables stay `int8`
//! because `-1` marks an untracked character.

use std::io::Write;

use crate::encoding::CATALOG_VERSION;
use crate::error::Result;
use crate::table::{OutputTable, Pack};

/// Serializes a finished table.
pub trait TableWriter {
    /// Write `table` to `out`.
    fn write_table(&self, table: &OutputTable, out: &mut dyn Write) -> Result<()>;
}

/// Emits the table as a Go source file.
#[derive(Clone, Debug)]
pub struct GoTableWriter {
    package: String,
}

impl Default for GoTableWriter {
    fn default() -> Self {
        Self::new("shoco")
    }
}

impl GoTableWriter {
    /// A writer for the given Go package name.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }

    /// Render into a string.
    pub fn render(&self, table: &OutputTable) -> Result<String> {
        let mut buf = Vec::new();
        self.write_table(table, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl TableWriter for GoTableWriter {
    fn write_table(&self, table: &OutputTable, out: &mut dyn Write) -> Result<()> {
        writeln!(
            out,
            "// Code generated by tablegen (catalog v{CATALOG_VERSION}). DO NOT EDIT."
        )?;
        writeln!(out)?;
        writeln!(out, "package {}", self.package)?;
        writeln!(out)?;
        writeln!(out, "const MIN_CHR = {}", table.min_chr)?;
        writeln!(out, "const MAX_CHR = {}", table.max_chr)?;
        writeln!(out)?;

        writeln!(out, "var chrs_by_chr_id = []byte{{")?;
        write_row(out, &chr_line(&table.chrs_by_chr_id))?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "var chr_ids_by_chr = []int8{{")?;
        write_row(out, &int_line(&table.chr_ids_by_chr))?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "var successor_ids_by_chr_id_and_chr_id = [][]int8{{")?;
        for id in 0..table.chrs_by_chr_id.len() {
            writeln!(out, "  []int8{{{}}},", int_line(table.successor_ids(id)))?;
        }
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "var chrs_by_chr_and_successor_id = [][]byte{{")?;
        for row in table.successors_by_chr() {
            writeln!(out, "  []byte{{{}}},", chr_line(&row))?;
        }
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "type Pack struct {{")?;
        writeln!(out, "    word           uint32")?;
        writeln!(out, "    bytes_packed   uint32")?;
        writeln!(out, "    bytes_unpacked uint32")?;
        writeln!(out, "    offsets        []uint32 // {}", table.pack_width)?;
        writeln!(out, "    masks          []int16  // {}", table.pack_width)?;
        writeln!(out, "    header_mask    byte")?;
        writeln!(out, "    header         byte")?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "const PACK_COUNT = {}", table.packs.len())?;
        writeln!(out, "const MAX_SUCCESSOR_N = {}", table.max_successor_n())?;
        writeln!(out)?;

        writeln!(out, "var packs = []Pack{{")?;
        for pack in &table.packs {
            writeln!(out, "  {},", pack_line(pack))?;
        }
        writeln!(out, "}}")?;
        Ok(())
    }
}

fn write_row(out: &mut dyn Write, line: &str) -> std::io::Result<()> {
    if line.is_empty() {
        Ok(())
    } else {
        writeln!(out, "  {line},")
    }
}

fn pack_line(pack: &Pack) -> String {
    format!(
        "Pack{{ {:#x}, {}, {}, []uint32{{ {} }}, []int16{{ {} }}, {:#x}, {:#x} }}",
        pack.word,
        pack.bytes_packed,
        pack.bytes_unpacked,
        int_line(&pack.offsets),
        int_line(&pack.masks),
        pack.header_mask,
        pack.header,
    )
}

fn int_line<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn chr_line(chrs: &[u8]) -> String {
    chrs.iter()
        .map(|&c| go_byte_literal(c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn go_byte_literal(c: u8) -> String {
    match c {
        b'\'' => r"'\''".to_string(),
        b'\\' => r"'\\'".to_string(),
        0x20..=0x7e => format!("'{}'", c as char),
        _ => format!(r"'\x{c:02x}'"),
    }
}
