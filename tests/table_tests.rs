//! # Table Layer Tests: CanonicalTable and RunningDisparity
//!
//! Construction-time checks of the code table and the disparity primitives
//! it is validated with.

use std::time::Instant;

use tenbit_dsa::standard::STANDARD_ROWS;
use tenbit_dsa::{
    evolve, loose_disparity_error, strict_disparity_error, CanonicalTable, Codeword, Disparity, PrefixBounds, Row,
    Symbol, TableError, CONTROL_SYMBOLS,
};

/// The standard table carries 256 data and 12 control entries.
#[test]
fn test_standard_table_shape() {
    let t = Instant::now();

    let table = CanonicalTable::standard().unwrap();
    assert_eq!(table.len(), 268);
    assert_eq!(table.productions().count(), 536);

    let controls: Vec<u8> = table.controls().map(|e| e.symbol.value).collect();
    assert_eq!(controls, CONTROL_SYMBOLS.to_vec());
    assert!((0..=u8::MAX).all(|v| table.get(Symbol::data(v)).is_some()));
    assert!(table.get(Symbol::k(0x00)).is_none());

    let overhead = t.elapsed();
    println!("test_standard_table_shape: Testing Overhead = {:?}", overhead);
}

/// Exit disparity follows the word's weight.
#[test]
fn test_evolve_known_words() {
    let t = Instant::now();

    let word = |bits| Codeword::new(bits).unwrap();
    // D0.0
    assert_eq!(evolve(Disparity::Negative, word(0x0B9)), Some(Disparity::Negative));
    assert_eq!(evolve(Disparity::Positive, word(0x346)), Some(Disparity::Positive));
    // D3.0
    assert_eq!(evolve(Disparity::Negative, word(0x363)), Some(Disparity::Positive));
    assert_eq!(evolve(Disparity::Positive, word(0x0A3)), Some(Disparity::Negative));
    // Six ones cannot follow a positive state.
    assert_eq!(evolve(Disparity::Positive, word(0x363)), None);
    assert_eq!(evolve(Disparity::Negative, Codeword::default()), None);

    let overhead = t.elapsed();
    println!("test_evolve_known_words: Testing Overhead = {:?}", overhead);
}

/// Both profiles flag a run of zeros from either state; the loose one
/// tolerates a longer excursion at `c`.
#[test]
fn test_prefix_profiles() {
    let t = Instant::now();

    for rd in Disparity::BOTH {
        assert!(strict_disparity_error(rd, Codeword::default()));
        assert!(loose_disparity_error(rd, Codeword::default()));
    }

    // a b c set: the prefix sum reaches 4 at bit c from a positive state,
    // and again at e.
    let word = Codeword::new(0b0101010_111).unwrap();
    assert_eq!(PrefixBounds::STRICT.first_violation(Disparity::Positive, word), Some(2));
    assert_eq!(PrefixBounds::LOOSE.first_violation(Disparity::Positive, word), Some(4));
    assert_eq!(PrefixBounds::STRICT.limits()[2], 2);
    assert_eq!(PrefixBounds::LOOSE.limits()[2], 4);

    let overhead = t.elapsed();
    println!("test_prefix_profiles: Testing Overhead = {:?}", overhead);
}

/// A row whose word cannot follow its entering state is refused.
#[test]
fn test_unbalanced_row_rejected() {
    let t = Instant::now();

    let row = Row::new(Symbol::data(0), 0b111111_1000, 0b011000_1011);
    let err = CanonicalTable::from_rows([row]).unwrap_err();
    assert!(matches!(
        err,
        TableError::DisparityViolation { disparity: Disparity::Negative, .. }
    ));

    let wide = Row::new(Symbol::data(0), 0x400, 0b011000_1011);
    assert!(matches!(
        CanonicalTable::from_rows([wide]).unwrap_err(),
        TableError::CodewordOutOfRange { bits: 0x400, .. }
    ));

    let overhead = t.elapsed();
    println!("test_unbalanced_row_rejected: Testing Overhead = {:?}", overhead);
}

/// Listing a symbol twice is a table fault.
#[test]
fn test_duplicate_symbol_rejected() {
    let t = Instant::now();

    let rows = [STANDARD_ROWS[0], STANDARD_ROWS[0]];
    assert_eq!(
        CanonicalTable::from_rows(rows).unwrap_err(),
        TableError::DuplicateSymbol(Symbol::data(0))
    );

    let overhead = t.elapsed();
    println!("test_duplicate_symbol_rejected: Testing Overhead = {:?}", overhead);
}

/// Only K28.1, K28.5 and K28.7 carry a comma.
#[test]
fn test_comma_carriers() {
    let t = Instant::now();

    let table = CanonicalTable::standard().unwrap();
    let carriers: Vec<Symbol> = table
        .entries()
        .iter()
        .filter(|e| e.encodings().iter().any(|enc| enc.word.has_comma()))
        .map(|e| e.symbol)
        .collect();
    assert_eq!(carriers, vec![Symbol::k(0x3C), Symbol::k(0xBC), Symbol::k(0xFC)]);

    let overhead = t.elapsed();
    println!("test_comma_carriers: Testing Overhead = {:?}", overhead);
}
