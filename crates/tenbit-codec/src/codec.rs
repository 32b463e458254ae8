use std::sync::OnceLock;

use tenbit_core::{LineCodeError, Result};
use tenbit_dsa::{CanonicalTable, Codeword, Detector, Disparity, Symbol, TableError};

/// Result of encoding one symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encoded {
    pub codeword: Codeword,
    /// Disparity after the word has been sent.
    pub disparity: Disparity,
}

/// Result of decoding one word under an asserted entering disparity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub symbol: Symbol,
    /// The entering disparity the word was decoded under.
    pub prior: Disparity,
    /// Disparity after the word.
    pub disparity: Disparity,
    pub disparity_changed: bool,
    /// The word is legal but broke the prefix bound on the way in.
    pub disparity_error: bool,
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    symbol: Symbol,
    rd_out: Disparity,
}

/// Forward and reverse maps derived once from a [`CanonicalTable`].
///
/// Both maps are flat arrays. The encoder is addressed like the exported
/// encode table, `rd << 9 | k << 8 | value`; the decoder by word, with one
/// slot per entering disparity. A word that two symbols claim under the same
/// entering disparity is rejected at construction, so each slot has at most
/// one interpretation.
#[derive(Clone, Debug)]
pub struct Codec {
    table: CanonicalTable,
    encoder: Vec<Option<Encoded>>,
    decoder: Vec<[Option<Slot>; 2]>,
    detector: Detector,
}

/// Address of a symbol in the encoder map and in the exported encode table.
#[inline(always)]
pub fn encode_address(symbol: Symbol, disparity: Disparity) -> usize {
    (disparity.index() << 9) | ((symbol.control as usize) << 8) | symbol.value as usize
}

impl Codec {
    pub fn new(table: CanonicalTable) -> std::result::Result<Self, TableError> {
        let mut encoder: Vec<Option<Encoded>> = vec![None; 1024];
        let mut decoder: Vec<[Option<Slot>; 2]> = vec![[None; 2]; Codeword::SPACE];

        for p in table.productions() {
            encoder[encode_address(p.symbol, p.rd_in)] = Some(Encoded {
                codeword: p.word,
                disparity: p.rd_out,
            });

            let slot = &mut decoder[p.word.bits() as usize][p.rd_in.index()];
            if let Some(existing) = slot {
                return Err(TableError::AmbiguousCodeword {
                    codeword: p.word,
                    disparity: p.rd_in,
                    first: existing.symbol,
                    second: p.symbol,
                });
            }
            *slot = Some(Slot {
                symbol: p.symbol,
                rd_out: p.rd_out,
            });
        }

        let valid = decoder.iter().filter(|s| s.iter().any(Option::is_some)).count();
        tracing::debug!(symbols = table.len(), valid_codewords = valid, "codec maps derived");

        Ok(Self {
            table,
            encoder,
            decoder,
            detector: Detector::Strict,
        })
    }

    /// The process-wide codec over the standard table, built on first use.
    ///
    /// # Panics
    /// If the built-in table fails its own disparity check. That is a defect
    /// in the table, never in the caller's input.
    pub fn standard() -> &'static Codec {
        static STANDARD: OnceLock<Codec> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let table = CanonicalTable::standard()
                .unwrap_or_else(|e| panic!("standard 8b/10b table is malformed: {}", e));
            Codec::new(table).unwrap_or_else(|e| panic!("standard 8b/10b table is ambiguous: {}", e))
        })
    }

    /// Selects the prefix-bound profile used to annotate decodes.
    pub fn with_detector(mut self, detector: Detector) -> Self {
        self.detector = detector;
        self
    }

    pub fn detector(&self) -> Detector {
        self.detector
    }

    pub fn table(&self) -> &CanonicalTable {
        &self.table
    }

    pub fn encode(&self, value: u8, is_control: bool, disparity: Disparity) -> Result<Encoded> {
        self.encode_symbol(Symbol::new(value, is_control), disparity)
    }

    #[inline]
    pub fn encode_symbol(&self, symbol: Symbol, disparity: Disparity) -> Result<Encoded> {
        self.encoder[encode_address(symbol, disparity)].ok_or(LineCodeError::UnsupportedSymbol(symbol))
    }

    /// Decodes `codeword` as if it was entered with `disparity`.
    ///
    /// Only the interpretation declared for that entering disparity is
    /// considered. The prefix detector runs on both outcomes: a successful
    /// decode carries it as `disparity_error`, a failed one inside
    /// [`LineCodeError::InvalidCodeword`].
    pub fn decode(&self, codeword: Codeword, disparity: Disparity) -> Result<Decoded> {
        let disparity_error = self.detector.flags(disparity, codeword);
        match self.decoder[codeword.bits() as usize][disparity.index()] {
            Some(slot) => Ok(Decoded {
                symbol: slot.symbol,
                prior: disparity,
                disparity: slot.rd_out,
                disparity_changed: slot.rd_out != disparity,
                disparity_error,
            }),
            None => Err(LineCodeError::InvalidCodeword {
                codeword,
                disparity,
                disparity_error,
            }),
        }
    }

    /// Decodes under `expected`, or independently under both disparities when
    /// it is `None`. Meant for diagnostics; a live link always knows its state.
    pub fn decode_each(&self, codeword: Codeword, expected: Option<Disparity>) -> Vec<(Disparity, Result<Decoded>)> {
        let candidates = match expected {
            Some(d) => vec![d],
            None => Disparity::BOTH.to_vec(),
        };
        candidates
            .into_iter()
            .map(|d| (d, self.decode(codeword, d)))
            .collect()
    }

    pub fn is_valid(&self, codeword: Codeword, disparity: Disparity) -> bool {
        self.decoder[codeword.bits() as usize][disparity.index()].is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_k28_5_from_both_states() {
        let codec = Codec::standard();
        let neg = codec.encode(0xBC, true, Disparity::Negative).unwrap();
        assert_eq!(neg.codeword.to_string(), "0101111100");
        assert_eq!(neg.disparity, Disparity::Positive);
        let pos = codec.encode(0xBC, true, Disparity::Positive).unwrap();
        assert_eq!(pos.codeword.to_string(), "1010000011");
        assert_eq!(pos.disparity, Disparity::Negative);
    }

    #[test]
    fn decode_respects_asserted_disparity() {
        let codec = Codec::standard();
        let word = Codeword::new(0x17C).unwrap();
        let ok = codec.decode(word, Disparity::Negative).unwrap();
        assert_eq!(ok.symbol, Symbol::k(0xBC));
        assert!(ok.disparity_changed);
        assert!(!ok.disparity_error);

        let err = codec.decode(word, Disparity::Positive).unwrap_err();
        assert!(matches!(err, LineCodeError::InvalidCodeword { disparity_error: true, .. }));
    }

    #[test]
    fn decode_each_tries_both() {
        let codec = Codec::standard();
        let results = codec.decode_each(Codeword::new(0x17C).unwrap(), None);
        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
    }
}
