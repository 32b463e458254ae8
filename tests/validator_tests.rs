//! # Validator Layer Tests: Global Consistency
//!
//! Runs the producer analysis over the standard table and over a table with
//! a deliberately shared codeword.

use std::time::Instant;

use tenbit_codec::{AnomalyKind, Codec, Validator};
use tenbit_core::FailPolicy;
use tenbit_dsa::standard::STANDARD_ROWS;
use tenbit_dsa::{CanonicalTable, Codeword, Disparity, Symbol, TableError};

/// D1.0 sent from negative disparity borrows D0.0's word. Both are balanced,
/// so the table still passes its own disparity check.
fn corrupted_table() -> CanonicalTable {
    let mut rows = STANDARD_ROWS;
    rows[1].minus = rows[0].minus;
    CanonicalTable::from_rows(rows).unwrap()
}

/// The standard table has no anomalies at all.
#[test]
fn test_standard_table_is_clean() {
    let t = Instant::now();

    let codec = Codec::standard();
    let validator = Validator::for_codec(codec);
    assert!(validator.check().is_empty());

    let producers = validator.producers();
    assert_eq!(producers.len(), Codeword::SPACE);
    assert_eq!(producers.iter().filter(|p| !p.is_empty()).count(), 464);
    assert!(producers.iter().all(|p| p.len() <= 2));

    let overhead = t.elapsed();
    println!("test_standard_table_is_clean: Testing Overhead = {:?}", overhead);
}

/// Two symbols sharing a word surface as a different-decode anomaly.
#[test]
fn test_shared_codeword_reported() {
    let t = Instant::now();

    let table = corrupted_table();
    let anomalies = Validator::new(&table).check();
    assert_eq!(anomalies.len(), 1);

    let anomaly = &anomalies[0];
    assert_eq!(anomaly.kind, AnomalyKind::DifferentDecode);
    assert_eq!(anomaly.codeword, Codeword::new(0x0B9).unwrap());
    let symbols: Vec<Symbol> = anomaly.producers.iter().map(|p| p.symbol).collect();
    assert_eq!(symbols, vec![Symbol::data(0x00), Symbol::data(0x01)]);
    assert!(anomaly.kind.fails(FailPolicy::DifferentDecode));
    assert!(anomaly.to_string().starts_with("different decode 0010111001"));

    let overhead = t.elapsed();
    println!("test_shared_codeword_reported: Testing Overhead = {:?}", overhead);
}

/// The codec refuses the same table outright.
#[test]
fn test_codec_rejects_ambiguous_table() {
    let t = Instant::now();

    let err = Codec::new(corrupted_table()).unwrap_err();
    assert_eq!(
        err,
        TableError::AmbiguousCodeword {
            codeword: Codeword::new(0x0B9).unwrap(),
            disparity: Disparity::Negative,
            first: Symbol::data(0x00),
            second: Symbol::data(0x01),
        }
    );

    let overhead = t.elapsed();
    println!("test_codec_rejects_ambiguous_table: Testing Overhead = {:?}", overhead);
}

/// Three symbols sent from negative disparity all borrow D0.0's word.
#[test]
fn test_three_producers_reported() {
    let t = Instant::now();

    let mut rows = STANDARD_ROWS;
    rows[1].minus = rows[0].minus;
    rows[2].minus = rows[0].minus;
    let table = CanonicalTable::from_rows(rows).unwrap();

    let anomalies = Validator::new(&table).check();
    assert_eq!(anomalies.len(), 1);
    let anomaly = &anomalies[0];
    assert_eq!(anomaly.kind, AnomalyKind::TooManyProducers);
    assert_eq!(anomaly.codeword, Codeword::new(0x0B9).unwrap());
    assert_eq!(anomaly.producers.len(), 3);
    assert!(anomaly.kind.is_correctness_failure());
    assert!(anomaly.to_string().starts_with("too many producers 0010111001"));

    let overhead = t.elapsed();
    println!("test_three_producers_reported: Testing Overhead = {:?}", overhead);
}

/// Bookkeeping findings only fail a check under the strictest policy.
#[test]
fn test_fail_policy() {
    let t = Instant::now();

    for kind in [AnomalyKind::NotAlwaysSwap, AnomalyKind::AlwaysChanges] {
        assert!(!kind.fails(FailPolicy::DifferentDecode));
        assert!(kind.fails(FailPolicy::Any));
    }
    assert!(AnomalyKind::TooManyProducers.fails(FailPolicy::DifferentDecode));

    let overhead = t.elapsed();
    println!("test_fail_policy: Testing Overhead = {:?}", overhead);
}
