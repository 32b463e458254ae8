//! Flat lookup tables for hardware consumers.
//!
//! Both tables have 1024 rows. Each row is a [`Masked`] word whose cleared
//! mask bits are don't-care, and each output bit is handed out as its own
//! [`BitPlane`] so an external minimiser can synthesise one function per bit.
//! The minimiser itself lives outside this crate, behind [`PlaneSink`].

use std::fmt;
use std::io::Write;
use std::ops::Deref;

use serde::Serialize;
use tenbit_core::{LineCodeError, Result};
use tenbit_dsa::{strict_disparity_error, Codeword, Disparity, Masked, Symbol};

use crate::codec::{encode_address, Codec};

pub const TABLE_DEPTH: usize = 1024;

/// Encode rows: `rd_out` in bit 10, codeword in bits 0..=9.
pub const ENCODE_WIDTH: usize = 11;
/// Decode rows: `rd_swap`, `rderr1`, `rderr0`, `err1`, `err0`, `k`, then 8 data bits.
pub const DECODE_WIDTH: usize = 14;

const DEC_K: usize = 8;
const DEC_ERR0: usize = 9;
const DEC_ERR1: usize = 10;
const DEC_RDERR0: usize = 11;
const DEC_RDERR1: usize = 12;
const DEC_RD_SWAP: usize = 13;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Off,
    On,
    DontCare,
}

impl Cell {
    pub fn as_char(self) -> char {
        match self {
            Cell::Off => '0',
            Cell::On => '1',
            Cell::DontCare => '-',
        }
    }
}

impl From<Option<bool>> for Cell {
    fn from(bit: Option<bool>) -> Self {
        match bit {
            Some(true) => Cell::On,
            Some(false) => Cell::Off,
            None => Cell::DontCare,
        }
    }
}

/// One output bit of a table across all addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitPlane {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl BitPlane {
    /// Address width of the table this plane came from.
    pub fn inputs(&self) -> u32 {
        self.cells.len().trailing_zeros()
    }

    pub fn on_set(&self) -> Vec<usize> {
        self.indices(Cell::On)
    }

    pub fn dont_care_set(&self) -> Vec<usize> {
        self.indices(Cell::DontCare)
    }

    fn indices(&self, wanted: Cell) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == wanted)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn render(&self) -> String {
        self.cells.iter().map(|c| c.as_char()).collect()
    }
}

/// A fixed-width table addressed `0..1024`.
#[derive(Clone, Debug)]
pub struct LookupTable {
    width: usize,
    rows: Vec<Masked<u16>>,
    names: Vec<String>,
}

impl LookupTable {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// # Panics
    /// If `address` is not below [`TABLE_DEPTH`].
    pub fn row(&self, address: usize) -> Masked<u16> {
        self.rows[address]
    }

    /// Plane names, indexed by output bit.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Row as `0`/`1`/`-` digits, most significant output bit first.
    ///
    /// # Panics
    /// If `address` is not below [`TABLE_DEPTH`].
    pub fn render_row(&self, address: usize) -> String {
        let row = self.rows[address];
        (0..self.width).rev().map(|bit| Cell::from(row.bit(bit)).as_char()).collect()
    }

    /// # Panics
    /// If `bit` is not below [`width`](Self::width).
    pub fn plane(&self, bit: usize) -> BitPlane {
        BitPlane {
            name: self.names[bit].clone(),
            cells: self.rows.iter().map(|row| Cell::from(row.bit(bit))).collect(),
        }
    }

    pub fn planes(&self) -> Vec<BitPlane> {
        (0..self.width).map(|bit| self.plane(bit)).collect()
    }
}

/// A row that disagrees with the codec it was built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableMismatch {
    pub table: &'static str,
    pub address: usize,
    pub detail: String,
}

impl fmt::Display for TableMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{:#05x}]: {}", self.table, self.address, self.detail)
    }
}

/// `rd_in, k, value -> rd_out, codeword`, addressed `rd_in << 9 | k << 8 | value`.
#[derive(Clone, Debug)]
pub struct EncodeTable(LookupTable);

impl Deref for EncodeTable {
    type Target = LookupTable;

    fn deref(&self) -> &LookupTable {
        &self.0
    }
}

fn split_encode_address(address: usize) -> (Disparity, Symbol) {
    let rd_in = Disparity::from_bit((address >> 9) & 1 == 1);
    let symbol = Symbol::new((address & 0xff) as u8, (address >> 8) & 1 == 1);
    (rd_in, symbol)
}

impl EncodeTable {
    pub fn build(codec: &Codec) -> Self {
        let mut rows = vec![Masked::dont_care(); TABLE_DEPTH];
        for p in codec.table().productions() {
            rows[encode_address(p.symbol, p.rd_in)] = Masked::dont_care()
                .with_field(0, Codeword::BITS, p.word.bits())
                .with_bit(10, Some(p.rd_out.is_positive()));
        }

        let names = (0..Codeword::BITS)
            .map(|i| format!("enc_lut_data_{}", i))
            .chain(["enc_lut_rd".to_string()])
            .collect();

        tracing::debug!(rows = TABLE_DEPTH, width = ENCODE_WIDTH, "encode table built");
        Self(LookupTable {
            width: ENCODE_WIDTH,
            rows,
            names,
        })
    }

    /// Re-derives every row from the codec.
    pub fn check(&self, codec: &Codec) -> Vec<TableMismatch> {
        let mut mismatches = Vec::new();
        let mut report = |address: usize, detail: String| {
            mismatches.push(TableMismatch {
                table: "encode",
                address,
                detail,
            })
        };

        for (address, row) in self.rows.iter().enumerate() {
            let (rd_in, symbol) = split_encode_address(address);
            let expected = codec.encode_symbol(symbol, rd_in).ok();

            match (row.field(0, ENCODE_WIDTH), expected) {
                (None, None) if row.mask == 0 => {}
                (None, _) => report(address, format!("{} rd={} row is not fully specified", symbol, rd_in)),
                (Some(_), None) => report(address, format!("{} is unsupported but has a row", symbol)),
                (Some(bits), Some(enc)) => {
                    let word = bits & Codeword::MASK;
                    let rd_out = Disparity::from_bit(bits >> 10 == 1);
                    if word != enc.codeword.bits() || rd_out != enc.disparity {
                        report(
                            address,
                            format!(
                                "{} rd={}: table {} rd={}, codec {} rd={}",
                                symbol,
                                rd_in,
                                Codeword::from_bits_truncate(word),
                                rd_out,
                                enc.codeword,
                                enc.disparity
                            ),
                        );
                    }
                }
            }
        }
        mismatches
    }
}

/// `codeword -> rd_swap, rderr1, rderr0, err1, err0, k, value`.
#[derive(Clone, Debug)]
pub struct DecodeTable(LookupTable);

impl Deref for DecodeTable {
    type Target = LookupTable;

    fn deref(&self) -> &LookupTable {
        &self.0
    }
}

impl DecodeTable {
    pub fn build(codec: &Codec) -> Self {
        let rows = Codeword::all()
            .map(|word| {
                let neg = codec.decode(word, Disparity::Negative).ok();
                let pos = codec.decode(word, Disparity::Positive).ok();

                // Prefix errors are reported whether or not the word decodes.
                let row = Masked::dont_care()
                    .with_bit(DEC_RDERR0, Some(strict_disparity_error(Disparity::Negative, word)))
                    .with_bit(DEC_RDERR1, Some(strict_disparity_error(Disparity::Positive, word)))
                    .with_bit(DEC_ERR0, Some(neg.is_none()))
                    .with_bit(DEC_ERR1, Some(pos.is_none()));

                match pos.or(neg) {
                    Some(dec) => row
                        .with_field(0, 8, dec.symbol.value as u16)
                        .with_bit(DEC_K, Some(dec.symbol.control))
                        .with_bit(DEC_RD_SWAP, Some(dec.disparity_changed)),
                    None => row,
                }
            })
            .collect();

        let names = (0..8)
            .map(|i| format!("dec_lut_data_{}", i))
            .chain(
                ["dec_lut_k", "dec_lut_err0", "dec_lut_err1", "dec_lut_rderr0", "dec_lut_rderr1", "dec_lut_rd_swap"]
                    .map(String::from),
            )
            .collect();

        tracing::debug!(rows = TABLE_DEPTH, width = DECODE_WIDTH, "decode table built");
        Self(LookupTable {
            width: DECODE_WIDTH,
            rows,
            names,
        })
    }

    /// Re-derives every row from the codec.
    pub fn check(&self, codec: &Codec) -> Vec<TableMismatch> {
        let mut mismatches = Vec::new();
        let mut report = |address: usize, detail: String| {
            mismatches.push(TableMismatch {
                table: "decode",
                address,
                detail,
            })
        };

        for (address, row) in self.rows.iter().enumerate() {
            let word = Codeword::from_bits_truncate(address as u16);

            for (rd, rderr_bit) in [(Disparity::Negative, DEC_RDERR0), (Disparity::Positive, DEC_RDERR1)] {
                if row.bit(rderr_bit) != Some(strict_disparity_error(rd, word)) {
                    report(address, format!("{} rd={}: disparity error bit disagrees", word, rd));
                }
            }

            for (rd, err_bit) in [(Disparity::Negative, DEC_ERR0), (Disparity::Positive, DEC_ERR1)] {
                let decoded = codec.decode(word, rd).ok();
                match (row.bit(err_bit), decoded) {
                    (Some(true), None) => {}
                    (Some(true), Some(dec)) => {
                        report(address, format!("{} rd={}: flagged invalid but decodes to {}", word, rd, dec.symbol))
                    }
                    (Some(false), Some(dec)) => {
                        let symbol = row
                            .field(0, 8)
                            .zip(row.bit(DEC_K))
                            .map(|(value, k)| Symbol::new(value as u8, k));
                        let rd_out = row
                            .bit(DEC_RD_SWAP)
                            .map(|swap| if swap { rd.flip() } else { rd });
                        if symbol != Some(dec.symbol) || rd_out != Some(dec.disparity) {
                            report(
                                address,
                                format!("{} rd={}: table disagrees with codec {} rd={}", word, rd, dec.symbol, dec.disparity),
                            );
                        }
                    }
                    (Some(false), None) => report(address, format!("{} rd={}: flagged valid but does not decode", word, rd)),
                    (None, _) => report(address, format!("{} rd={}: error bit unspecified", word, rd)),
                }
            }
        }
        mismatches
    }
}

/// Consumer of exported bit planes.
pub trait PlaneSink {
    fn plane(&mut self, plane: &BitPlane) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// `name:` header followed by the plane in fixed-width chunks of `0`/`1`/`-`.
pub struct TextSink<W: Write> {
    out: W,
    chunk: usize,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W, chunk: usize) -> Self {
        Self { out, chunk: chunk.max(1) }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PlaneSink for TextSink<W> {
    fn plane(&mut self, plane: &BitPlane) -> Result<()> {
        writeln!(self.out, "{}:", plane.name)?;
        for chunk in plane.cells.chunks(self.chunk) {
            let line: String = chunk.iter().map(|c| c.as_char()).collect();
            writeln!(self.out, "    {}", line)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// On-set and don't-care set per plane, the input format of most minimisers.
pub struct MintermSink<W: Write> {
    out: W,
}

impl<W: Write> MintermSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn join(indices: &[usize]) -> String {
    indices.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(",")
}

impl<W: Write> PlaneSink for MintermSink<W> {
    fn plane(&mut self, plane: &BitPlane) -> Result<()> {
        writeln!(
            self.out,
            "{} inputs={} on=[{}] dc=[{}]",
            plane.name,
            plane.inputs(),
            join(&plane.on_set()),
            join(&plane.dont_care_set())
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct PlaneRecord<'a> {
    name: &'a str,
    inputs: u32,
    on: Vec<usize>,
    dc: Vec<usize>,
    lut: String,
}

/// One JSON object per line.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PlaneSink for JsonSink<W> {
    fn plane(&mut self, plane: &BitPlane) -> Result<()> {
        let record = PlaneRecord {
            name: &plane.name,
            inputs: plane.inputs(),
            on: plane.on_set(),
            dc: plane.dont_care_set(),
            lut: plane.render(),
        };
        serde_json::to_writer(&mut self.out, &record).map_err(|e| LineCodeError::Io(e.into()))?;
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Sends every encode plane, then every decode plane, to `sink`.
/// Returns the number of planes written.
pub fn export(codec: &Codec, sink: &mut dyn PlaneSink) -> Result<usize> {
    let encode = EncodeTable::build(codec);
    let decode = DecodeTable::build(codec);

    let mut written = 0;
    for plane in encode.planes().iter().chain(decode.planes().iter()) {
        sink.plane(plane)?;
        written += 1;
    }
    sink.finish()?;

    tracing::info!(planes = written, "lookup tables exported");
    Ok(written)
}
