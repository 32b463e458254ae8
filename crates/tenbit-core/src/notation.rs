//! Text forms accepted at the command-line boundary.
//!
//! Symbols: `D<x>.<y>` / `K<x>.<y>`, or a raw byte as `0x` + 2 hex digits,
//! 2 bare hex digits, `0b` + 8 bits, 8 bare bits, or decimal.
//! Codewords: `0x` + 3 hex digits, 3 bare hex digits, `0b` + 10 bits,
//! 10 bare bits, or decimal.

use tenbit_dsa::{Codeword, Disparity, Symbol};

use crate::error::{LineCodeError, Result};

fn parse_radix(digits: &str, radix: u32, source: &str) -> Result<u32> {
    u32::from_str_radix(digits, radix)
        .map_err(|e| LineCodeError::Parse(format!("{:?}: {}", source, e)))
}

/// Parses the `<x>.<y>` tail of a `D`/`K` name.
fn parse_xy(tail: &str) -> Option<(u8, u8)> {
    let (x, y) = tail.split_once('.')?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(x) || !all_digits(y) {
        return None;
    }
    // Parts wider than their field are masked, same as the hardware would.
    let x = x.parse::<u32>().ok()?;
    let y = y.parse::<u32>().ok()?;
    Some(((x & 0x1f) as u8, (y & 0x7) as u8))
}

/// Parses a symbol. `control` applies to raw byte forms only; the `D`/`K`
/// prefix decides for named forms.
pub fn parse_symbol(text: &str, control: bool) -> Result<Symbol> {
    let lower = text.trim().to_ascii_lowercase();

    if let Some(kind @ ('d' | 'k')) = lower.chars().next() {
        if let Some((x, y)) = parse_xy(&lower[1..]) {
            return Ok(Symbol::from_xy(x, y, kind == 'k'));
        }
    }

    let value = match lower.len() {
        10 if lower.starts_with("0b") => parse_radix(&lower[2..], 2, text)?,
        4 if lower.starts_with("0x") => parse_radix(&lower[2..], 16, text)?,
        2 => parse_radix(&lower, 16, text)?,
        8 => parse_radix(&lower, 2, text)?,
        _ => parse_radix(&lower, 10, text)?,
    };
    let value = u8::try_from(value)
        .map_err(|_| LineCodeError::Parse(format!("{:?}: symbol value exceeds 8 bits", text)))?;
    Ok(Symbol::new(value, control))
}

pub fn parse_codeword(text: &str) -> Result<Codeword> {
    let lower = text.trim().to_ascii_lowercase();
    let bits = match lower.len() {
        12 if lower.starts_with("0b") => parse_radix(&lower[2..], 2, text)?,
        5 if lower.starts_with("0x") => parse_radix(&lower[2..], 16, text)?,
        3 => parse_radix(&lower, 16, text)?,
        10 => parse_radix(&lower, 2, text)?,
        _ => parse_radix(&lower, 10, text)?,
    };
    u16::try_from(bits)
        .ok()
        .and_then(Codeword::new)
        .ok_or_else(|| LineCodeError::Parse(format!("{:?}: codeword exceeds 10 bits", text)))
}

pub fn parse_disparity(text: &str) -> Result<Disparity> {
    match text.trim().to_ascii_lowercase().as_str() {
        "0" | "-" | "neg" | "negative" => Ok(Disparity::Negative),
        "1" | "+" | "pos" | "positive" => Ok(Disparity::Positive),
        other => Err(LineCodeError::Parse(format!("{:?}: expected 0 or 1", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_symbols() {
        assert_eq!(parse_symbol("K28.5", false).unwrap(), Symbol::k(0xBC));
        assert_eq!(parse_symbol("d21.5", true).unwrap(), Symbol::data(0xB5));
        assert_eq!(parse_symbol("D40.9", false).unwrap(), Symbol::from_xy(8, 1, false));
    }

    #[test]
    fn raw_symbols() {
        assert_eq!(parse_symbol("0xbc", true).unwrap(), Symbol::k(0xBC));
        assert_eq!(parse_symbol("bc", false).unwrap(), Symbol::data(0xBC));
        assert_eq!(parse_symbol("0b10111100", false).unwrap(), Symbol::data(0xBC));
        assert_eq!(parse_symbol("10111100", false).unwrap(), Symbol::data(0xBC));
        assert_eq!(parse_symbol("188", false).unwrap(), Symbol::data(0xBC));
        assert!(parse_symbol("256", false).is_err());
        assert!(parse_symbol("zz", false).is_err());
    }

    #[test]
    fn codewords() {
        assert_eq!(parse_codeword("0x17c").unwrap().bits(), 0x17C);
        assert_eq!(parse_codeword("17c").unwrap().bits(), 0x17C);
        assert_eq!(parse_codeword("0b0101111100").unwrap().bits(), 0x17C);
        assert_eq!(parse_codeword("0101111100").unwrap().bits(), 0x17C);
        assert!(parse_codeword("0x400").is_err());
        assert!(parse_codeword("1024").is_err());
    }

    #[test]
    fn disparities() {
        assert_eq!(parse_disparity("1").unwrap(), Disparity::Positive);
        assert_eq!(parse_disparity("-").unwrap(), Disparity::Negative);
        assert!(parse_disparity("2").is_err());
    }
}
