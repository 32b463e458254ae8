//! # Export Layer Tests: Lookup Tables and Plane Sinks
//!
//! The exported encode and decode tables must agree with the codec row for
//! row, and every sink must emit all 25 planes.

use std::time::Instant;

use tenbit_codec::export::{export, DECODE_WIDTH, ENCODE_WIDTH, TABLE_DEPTH};
use tenbit_codec::{Cell, Codec, DecodeTable, EncodeTable, JsonSink, MintermSink, TextSink};

/// Both tables re-derive cleanly from the codec they were built from.
#[test]
fn test_tables_match_codec() {
    let t = Instant::now();

    let codec = Codec::standard();
    let encode = EncodeTable::build(codec);
    let decode = DecodeTable::build(codec);
    assert_eq!(encode.len(), TABLE_DEPTH);
    assert_eq!(decode.len(), TABLE_DEPTH);
    assert!(encode.check(codec).is_empty());
    assert!(decode.check(codec).is_empty());

    let overhead = t.elapsed();
    println!("test_tables_match_codec: Testing Overhead = {:?}", overhead);
}

/// Plane names and order follow the output bit layout.
#[test]
fn test_plane_names() {
    let t = Instant::now();

    let codec = Codec::standard();
    let encode = EncodeTable::build(codec);
    let decode = DecodeTable::build(codec);
    assert_eq!(encode.names().len(), ENCODE_WIDTH);
    assert_eq!(decode.names().len(), DECODE_WIDTH);
    assert_eq!(encode.names()[0], "enc_lut_data_0");
    assert_eq!(encode.names()[10], "enc_lut_rd");
    assert_eq!(decode.names()[8], "dec_lut_k");
    assert_eq!(decode.names()[13], "dec_lut_rd_swap");

    let overhead = t.elapsed();
    println!("test_plane_names: Testing Overhead = {:?}", overhead);
}

/// Unsupported encode addresses are entirely don't-care; supported ones
/// are fully specified.
#[test]
fn test_encode_dont_care_rows() {
    let t = Instant::now();

    let codec = Codec::standard();
    let encode = EncodeTable::build(codec);
    let rd_plane = encode.plane(10);
    // 256 data + 12 control symbols from each state.
    let specified = rd_plane.cells.iter().filter(|&&c| c != Cell::DontCare).count();
    assert_eq!(specified, 536);
    assert_eq!(rd_plane.dont_care_set().len(), TABLE_DEPTH - 536);

    let overhead = t.elapsed();
    println!("test_encode_dont_care_rows: Testing Overhead = {:?}", overhead);
}

/// An invalid word marks both error bits; a word valid from one state
/// marks only the other.
#[test]
fn test_decode_error_bits() {
    let t = Instant::now();

    let codec = Codec::standard();
    let decode = DecodeTable::build(codec);
    assert_eq!(decode.render_row(0), "-1111---------");

    // K28.5 from negative disparity: 0101111100, flips the state.
    let row = decode.render_row(0x17C);
    assert_eq!(row, "11010110111100");

    let overhead = t.elapsed();
    println!("test_decode_error_bits: Testing Overhead = {:?}", overhead);
}

/// Every sink receives 25 planes.
#[test]
fn test_sinks_receive_every_plane() {
    let t = Instant::now();

    let codec = Codec::standard();

    let mut text = TextSink::new(Vec::new(), 64);
    assert_eq!(export(codec, &mut text).unwrap(), 25);
    let text = String::from_utf8(text.into_inner()).unwrap();
    assert_eq!(text.lines().filter(|l| l.ends_with(':')).count(), 25);
    // 1024 cells in rows of 64.
    assert_eq!(text.lines().filter(|l| l.starts_with("    ")).count(), 25 * 16);

    let mut minterms = MintermSink::new(Vec::new());
    export(codec, &mut minterms).unwrap();
    let minterms = String::from_utf8(minterms.into_inner()).unwrap();
    assert_eq!(minterms.lines().count(), 25);
    assert!(minterms.starts_with("enc_lut_data_0 inputs=10 on=["));

    let mut json = JsonSink::new(Vec::new());
    export(codec, &mut json).unwrap();
    let json = String::from_utf8(json.into_inner()).unwrap();
    let records: Vec<serde_json::Value> = json.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(records.len(), 25);
    assert_eq!(records[24]["name"], "dec_lut_rd_swap");
    assert_eq!(records[24]["inputs"], 10);
    assert_eq!(records[24]["lut"].as_str().unwrap().len(), TABLE_DEPTH);

    let overhead = t.elapsed();
    println!("test_sinks_receive_every_plane: Testing Overhead = {:?}", overhead);
}
