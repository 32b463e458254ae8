//! One-line renderings of encode and decode results.
//!
//! Runtime faults become text here rather than errors, so a bad symbol or
//! word on the command line reports `Decode error` and the tool carries on.

use tenbit_core::LineCodeError;
use tenbit_dsa::{Codeword, Disparity, Symbol};

use crate::codec::Codec;

/// `K28.5 (0xbc)`.
pub fn describe(symbol: Symbol) -> String {
    format!("{} ({:#x})", symbol, symbol.value)
}

/// `Enc K28.5 (0xbc), rd=0 -> 0101111100, rd=1`
pub fn encode_line(codec: &Codec, symbol: Symbol, disparity: Disparity) -> String {
    let head = format!("Enc {}, rd={} ->", describe(symbol), disparity);
    match codec.encode_symbol(symbol, disparity) {
        Ok(enc) => format!("{} {}, rd={}", head, enc.codeword, enc.disparity),
        Err(_) => format!("{} Decode error", head),
    }
}

/// One line per attempted entering disparity:
/// `Dec 0101111100, rd=0 -> K28.5 (0xbc), rd=1` or
/// `Dec 0000000000, rd=0 -> Decode error, Disparity error`.
pub fn decode_lines(codec: &Codec, codeword: Codeword, expected: Option<Disparity>) -> Vec<String> {
    codec
        .decode_each(codeword, expected)
        .into_iter()
        .map(|(rd, result)| {
            let (body, disparity_error) = match result {
                Ok(dec) => (format!("{}, rd={}", describe(dec.symbol), dec.disparity), dec.disparity_error),
                Err(LineCodeError::InvalidCodeword { disparity_error, .. }) => ("Decode error".to_string(), disparity_error),
                Err(e) => (e.to_string(), false),
            };
            let suffix = if disparity_error { ", Disparity error" } else { "" };
            format!("Dec {}, rd={} -> {}{}", codeword, rd, body, suffix)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_symbol_renders_decode_error() {
        let line = encode_line(Codec::standard(), Symbol::k(0x00), Disparity::Negative);
        assert_eq!(line, "Enc K0.0 (0x0), rd=0 -> Decode error");
    }

    #[test]
    fn all_zero_word_renders_both_errors() {
        let lines = decode_lines(Codec::standard(), Codeword::default(), None);
        assert_eq!(
            lines,
            vec![
                "Dec 0000000000, rd=0 -> Decode error, Disparity error",
                "Dec 0000000000, rd=1 -> Decode error, Disparity error",
            ]
        );
    }
}
