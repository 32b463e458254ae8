//! Disparity threaded across successive words.
//!
//! The codec itself is stateless. Whoever drives a link owns one disparity
//! value per direction; these wrappers hold it. Keep one instance per stream.

use tenbit_core::{LineCodeError, Result};
use tenbit_dsa::{Codeword, Disparity, Symbol, COMMA_NEGATIVE, COMMA_POSITIVE};

use crate::codec::{Codec, Decoded};

const COMMA_BITS: usize = 7;

pub struct StreamEncoder<'a> {
    codec: &'a Codec,
    disparity: Disparity,
}

impl<'a> StreamEncoder<'a> {
    pub fn new(codec: &'a Codec, initial: Disparity) -> Self {
        Self {
            codec,
            disparity: initial,
        }
    }

    pub fn disparity(&self) -> Disparity {
        self.disparity
    }

    /// Encodes one symbol. On error the disparity is left untouched.
    pub fn push(&mut self, symbol: Symbol) -> Result<Codeword> {
        let enc = self.codec.encode_symbol(symbol, self.disparity)?;
        self.disparity = enc.disparity;
        Ok(enc.codeword)
    }

    pub fn encode_all(&mut self, symbols: &[Symbol]) -> Result<Vec<Codeword>> {
        symbols.iter().map(|&s| self.push(s)).collect()
    }
}

/// Flattens words into line order, `a` of the first word first.
pub fn serialize(words: &[Codeword]) -> Vec<bool> {
    words.iter().flat_map(|w| w.line_bits()).collect()
}

/// Offset of the first comma in a serial bit stream, i.e. where a word boundary lies.
pub fn find_comma(bits: &[bool]) -> Option<usize> {
    bits.windows(COMMA_BITS).position(|window| {
        let pattern = window
            .iter()
            .enumerate()
            .fold(0u16, |acc, (i, &b)| acc | ((b as u16) << i));
        COMMA_POSITIVE.matches(pattern) || COMMA_NEGATIVE.matches(pattern)
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    Symbol(Decoded),
    /// The word is not valid for the tracked disparity.
    Fault {
        codeword: Codeword,
        disparity: Disparity,
        disparity_error: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub words: u64,
    pub symbols: u64,
    pub decode_errors: u64,
    pub disparity_errors: u64,
}

pub struct StreamDecoder<'a> {
    codec: &'a Codec,
    disparity: Disparity,
    stats: StreamStats,
}

impl<'a> StreamDecoder<'a> {
    pub fn new(codec: &'a Codec, initial: Disparity) -> Self {
        Self {
            codec,
            disparity: initial,
            stats: StreamStats::default(),
        }
    }

    pub fn disparity(&self) -> Disparity {
        self.disparity
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Decodes one word. Faults are counted, never returned as errors.
    ///
    /// After an invalid word the decoder adopts the disparity the word would
    /// have left behind from the other state, if it is valid there at all.
    pub fn push(&mut self, codeword: Codeword) -> StreamEvent {
        self.stats.words += 1;
        let prior = self.disparity;

        match self.codec.decode(codeword, prior) {
            Ok(dec) => {
                self.stats.symbols += 1;
                if dec.disparity_error {
                    self.stats.disparity_errors += 1;
                    tracing::warn!(%codeword, rd = %prior, "disparity error");
                }
                self.disparity = dec.disparity;
                StreamEvent::Symbol(dec)
            }
            Err(err) => {
                let disparity_error = matches!(err, LineCodeError::InvalidCodeword { disparity_error: true, .. });
                self.stats.decode_errors += 1;
                if disparity_error {
                    self.stats.disparity_errors += 1;
                }
                if let Ok(resync) = self.codec.decode(codeword, prior.flip()) {
                    self.disparity = resync.disparity;
                }
                tracing::warn!(%codeword, rd = %prior, resync = %self.disparity, "decode error");
                StreamEvent::Fault {
                    codeword,
                    disparity: prior,
                    disparity_error,
                }
            }
        }
    }

    pub fn decode_all(&mut self, words: &[Codeword]) -> Vec<StreamEvent> {
        words.iter().map(|&w| self.push(w)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_marks_word_boundary() {
        let codec = Codec::standard();
        let mut enc = StreamEncoder::new(codec, Disparity::Negative);
        let words = enc
            .encode_all(&[Symbol::from_xy(21, 5, false), Symbol::k(0xBC), Symbol::data(0)])
            .unwrap();

        let mut bits = vec![false, true, false];
        bits.extend(serialize(&words));
        assert_eq!(find_comma(&bits), Some(13));
    }

    #[test]
    fn fault_resyncs_disparity() {
        let codec = Codec::standard();
        let mut dec = StreamDecoder::new(codec, Disparity::Positive);
        // K28.5 as sent from negative disparity; invalid from positive.
        let event = dec.push(Codeword::new(0x17C).unwrap());
        assert!(matches!(event, StreamEvent::Fault { disparity_error: true, .. }));
        assert_eq!(dec.disparity(), Disparity::Positive);
        assert_eq!(dec.stats().decode_errors, 1);
    }
}
