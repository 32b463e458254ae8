use tenbit_dsa::{Codeword, Disparity, Symbol, CONTROL_SYMBOLS};

use crate::codec::Codec;
use crate::dump::{decode_lines, encode_line};

/// K28.x and K23/27/29/30.7 words in stored order, alternating rd=0 / rd=1.
/// Used to cross-check comma and alignment detection against the published tables.
pub const REFERENCE_CODEWORDS: [u16; 24] = [
    0b0010111100, 0b1101000011, 0b1001111100, 0b0110000011,
    0b1010111100, 0b0101000011, 0b1100111100, 0b0011000011,
    0b0100111100, 0b1011000011, 0b0101111100, 0b1010000011,
    0b0110111100, 0b1001000011, 0b0001111100, 0b1110000011,
    0b0001010111, 0b1110101000, 0b0001011011, 0b1110100100,
    0b0001011101, 0b1110100010, 0b0001011110, 0b1110100001,
];

/// Encode and decode traces for the control alphabet.
///
/// Three blocks: every control symbol encoded from both states, every
/// control production decoded back under its own entering state, then the
/// reference words decoded with the disparity their position implies.
pub fn control_trace(codec: &Codec) -> Vec<String> {
    let mut lines = Vec::new();

    for &value in &CONTROL_SYMBOLS {
        for rd in Disparity::BOTH {
            lines.push(encode_line(codec, Symbol::k(value), rd));
        }
    }

    for entry in codec.table().controls() {
        for enc in entry.encodings() {
            lines.extend(decode_lines(codec, enc.word, Some(enc.rd_in)));
        }
    }

    for (i, &bits) in REFERENCE_CODEWORDS.iter().enumerate() {
        let rd = Disparity::from_bit(i & 1 == 1);
        lines.extend(decode_lines(codec, Codeword::from_bits_truncate(bits), Some(rd)));
    }

    lines
}
