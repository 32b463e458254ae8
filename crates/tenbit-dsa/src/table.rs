use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use crate::disparity::{evolve, Disparity};
use crate::standard::STANDARD_ROWS;
use crate::symbol::{Codeword, Symbol};

/// One line of a code-group table, codewords in transmission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Row {
    pub symbol: Symbol,
    /// Word sent when the entering disparity is negative.
    pub minus: u16,
    /// Word sent when the entering disparity is positive.
    pub plus: u16,
}

impl Row {
    pub const fn new(symbol: Symbol, minus: u16, plus: u16) -> Self {
        Self { symbol, minus, plus }
    }
}

/// The codeword used for one entering disparity and where it leaves the link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encoding {
    pub word: Codeword,
    pub rd_in: Disparity,
    pub rd_out: Disparity,
}

impl Encoding {
    #[inline]
    pub fn rd_changes(&self) -> bool {
        self.rd_in != self.rd_out
    }
}

/// A symbol and its two encodings, indexed by entering disparity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub symbol: Symbol,
    enc: [Encoding; 2],
}

impl Entry {
    #[inline]
    pub fn encoding(&self, rd_in: Disparity) -> &Encoding {
        &self.enc[rd_in.index()]
    }

    pub fn encodings(&self) -> &[Encoding; 2] {
        &self.enc
    }
}

/// A single (entering disparity, symbol) -> (exit disparity, word) fact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Production {
    pub rd_in: Disparity,
    pub symbol: Symbol,
    pub rd_out: Disparity,
    pub word: Codeword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The word cannot follow the declared entering disparity.
    DisparityViolation {
        symbol: Symbol,
        disparity: Disparity,
        codeword: Codeword,
    },
    /// A row carries more than ten bits.
    CodewordOutOfRange { symbol: Symbol, bits: u16 },
    DuplicateSymbol(Symbol),
    /// Two symbols produce the same word from the same entering disparity.
    AmbiguousCodeword {
        codeword: Codeword,
        disparity: Disparity,
        first: Symbol,
        second: Symbol,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::DisparityViolation { symbol, disparity, codeword } => write!(
                f,
                "{} encodes to {} which cannot follow rd={}",
                symbol, codeword, disparity
            ),
            TableError::CodewordOutOfRange { symbol, bits } => {
                write!(f, "{} has a codeword wider than 10 bits: {:#x}", symbol, bits)
            }
            TableError::DuplicateSymbol(symbol) => write!(f, "{} is listed twice", symbol),
            TableError::AmbiguousCodeword { codeword, disparity, first, second } => write!(
                f,
                "{} at rd={} is produced by both {} and {}",
                codeword, disparity, first, second
            ),
        }
    }
}

/// The fixed mapping from (value, control flag) to one codeword per entering disparity.
///
/// Every encoding is checked against the running disparity rule while the
/// table is built; a table that exists is self-consistent.
#[derive(Clone, Debug)]
pub struct CanonicalTable {
    entries: Vec<Entry>,
    index: BTreeMap<Symbol, usize>,
}

impl CanonicalTable {
    /// The IEEE 802.3 clause 36 assignment: 256 data and 12 control symbols.
    pub fn standard() -> Result<Self, TableError> {
        Self::from_rows(STANDARD_ROWS)
    }

    pub fn from_rows<I>(rows: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut entries = Vec::new();
        let mut index = BTreeMap::new();

        for row in rows {
            let symbol = row.symbol;
            let mut enc = [Encoding {
                word: Codeword::default(),
                rd_in: Disparity::Negative,
                rd_out: Disparity::Negative,
            }; 2];

            for (rd_in, written) in Disparity::BOTH.into_iter().zip([row.minus, row.plus]) {
                if written > Codeword::MASK {
                    return Err(TableError::CodewordOutOfRange { symbol, bits: written });
                }
                let word = Codeword::from_transmission(written);
                let rd_out = evolve(rd_in, word).ok_or(TableError::DisparityViolation {
                    symbol,
                    disparity: rd_in,
                    codeword: word,
                })?;
                enc[rd_in.index()] = Encoding { word, rd_in, rd_out };
            }

            if index.insert(symbol, entries.len()).is_some() {
                return Err(TableError::DuplicateSymbol(symbol));
            }
            entries.push(Entry { symbol, enc });
        }

        tracing::debug!(entries = entries.len(), "canonical 8b/10b table built");
        Ok(Self { entries, index })
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Entry> {
        self.index.get(&symbol).map(|&i| &self.entries[i])
    }

    /// Entries in row order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Both encodings of every entry, negative entering disparity first.
    pub fn productions(&self) -> impl Iterator<Item = Production> + '_ {
        self.entries.iter().flat_map(|entry| {
            entry.encodings().iter().map(move |enc| Production {
                rd_in: enc.rd_in,
                symbol: entry.symbol,
                rd_out: enc.rd_out,
                word: enc.word,
            })
        })
    }

    /// Control entries only, in row order.
    pub fn controls(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.iter().filter(|e| e.symbol.control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::CONTROL_SYMBOLS;

    #[test]
    fn standard_table_is_complete() {
        let table = CanonicalTable::standard().expect("standard table");
        assert_eq!(table.len(), 268);
        for value in 0..=255u8 {
            assert!(table.get(Symbol::data(value)).is_some(), "missing D {:#x}", value);
        }
        let controls: Vec<u8> = table.controls().map(|e| e.symbol.value).collect();
        assert_eq!(controls, CONTROL_SYMBOLS);
    }

    #[test]
    fn d0_0_stays_negative() {
        let table = CanonicalTable::standard().expect("standard table");
        let entry = table.get(Symbol::data(0)).unwrap();
        let minus = entry.encoding(Disparity::Negative);
        assert_eq!(minus.word.bits(), 0x0B9);
        assert_eq!(minus.rd_out, Disparity::Negative);
        assert!(!minus.rd_changes());
        let plus = entry.encoding(Disparity::Positive);
        assert_eq!(plus.word.bits(), 0x346);
        assert_eq!(plus.rd_out, Disparity::Positive);
    }

    #[test]
    fn unbalanced_row_is_rejected() {
        let rows = [Row::new(Symbol::data(0), 0b111111_0100, 0b011000_1011)];
        let err = CanonicalTable::from_rows(rows).unwrap_err();
        assert!(matches!(err, TableError::DisparityViolation { disparity: Disparity::Negative, .. }));
    }

    #[test]
    fn duplicate_row_is_rejected() {
        let row = STANDARD_ROWS[0];
        let err = CanonicalTable::from_rows([row, row]).unwrap_err();
        assert_eq!(err, TableError::DuplicateSymbol(Symbol::data(0)));
    }
}
