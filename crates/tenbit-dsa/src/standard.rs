//! IEEE 802.3 clause 36 code-group assignment (tables 36-1a through 36-2).
//!
//! Codewords are written in transmission order `abcdei_fghj`, first column for
//! an entering negative disparity, second for positive. [`Codeword::from_transmission`]
//! turns them into the stored form where `a` is bit 0.
//!
//! [`Codeword::from_transmission`]: crate::symbol::Codeword::from_transmission

use crate::symbol::Symbol;
use crate::table::Row;

macro_rules! d {
    ($value:expr, $minus:expr, $plus:expr) => {
        Row::new(Symbol::data($value), $minus, $plus)
    };
}

macro_rules! k {
    ($value:expr, $minus:expr, $plus:expr) => {
        Row::new(Symbol::k($value), $minus, $plus)
    };
}

/// All 256 data symbols followed by the 12 control symbols.
pub const STANDARD_ROWS: [Row; 268] = [
    d!(0x00, 0b100111_0100, 0b011000_1011), // D0.0
    d!(0x01, 0b011101_0100, 0b100010_1011), // D1.0
    d!(0x02, 0b101101_0100, 0b010010_1011), // D2.0
    d!(0x03, 0b110001_1011, 0b110001_0100), // D3.0
    d!(0x04, 0b110101_0100, 0b001010_1011), // D4.0
    d!(0x05, 0b101001_1011, 0b101001_0100), // D5.0
    d!(0x06, 0b011001_1011, 0b011001_0100), // D6.0
    d!(0x07, 0b111000_1011, 0b000111_0100), // D7.0
    d!(0x08, 0b111001_0100, 0b000110_1011), // D8.0
    d!(0x09, 0b100101_1011, 0b100101_0100), // D9.0
    d!(0x0A, 0b010101_1011, 0b010101_0100), // D10.0
    d!(0x0B, 0b110100_1011, 0b110100_0100), // D11.0
    d!(0x0C, 0b001101_1011, 0b001101_0100), // D12.0
    d!(0x0D, 0b101100_1011, 0b101100_0100), // D13.0
    d!(0x0E, 0b011100_1011, 0b011100_0100), // D14.0
    d!(0x0F, 0b010111_0100, 0b101000_1011), // D15.0
    d!(0x10, 0b011011_0100, 0b100100_1011), // D16.0
    d!(0x11, 0b100011_1011, 0b100011_0100), // D17.0
    d!(0x12, 0b010011_1011, 0b010011_0100), // D18.0
    d!(0x13, 0b110010_1011, 0b110010_0100), // D19.0
    d!(0x14, 0b001011_1011, 0b001011_0100), // D20.0
    d!(0x15, 0b101010_1011, 0b101010_0100), // D21.0
    d!(0x16, 0b011010_1011, 0b011010_0100), // D22.0
    d!(0x17, 0b111010_0100, 0b000101_1011), // D23.0
    d!(0x18, 0b110011_0100, 0b001100_1011), // D24.0
    d!(0x19, 0b100110_1011, 0b100110_0100), // D25.0
    d!(0x1A, 0b010110_1011, 0b010110_0100), // D26.0
    d!(0x1B, 0b110110_0100, 0b001001_1011), // D27.0
    d!(0x1C, 0b001110_1011, 0b001110_0100), // D28.0
    d!(0x1D, 0b101110_0100, 0b010001_1011), // D29.0
    d!(0x1E, 0b011110_0100, 0b100001_1011), // D30.0
    d!(0x1F, 0b101011_0100, 0b010100_1011), // D31.0
    d!(0x20, 0b100111_1001, 0b011000_1001), // D0.1
    d!(0x21, 0b011101_1001, 0b100010_1001), // D1.1
    d!(0x22, 0b101101_1001, 0b010010_1001), // D2.1
    d!(0x23, 0b110001_1001, 0b110001_1001), // D3.1
    d!(0x24, 0b110101_1001, 0b001010_1001), // D4.1
    d!(0x25, 0b101001_1001, 0b101001_1001), // D5.1
    d!(0x26, 0b011001_1001, 0b011001_1001), // D6.1
    d!(0x27, 0b111000_1001, 0b000111_1001), // D7.1
    d!(0x28, 0b111001_1001, 0b000110_1001), // D8.1
    d!(0x29, 0b100101_1001, 0b100101_1001), // D9.1
    d!(0x2A, 0b010101_1001, 0b010101_1001), // D10.1
    d!(0x2B, 0b110100_1001, 0b110100_1001), // D11.1
    d!(0x2C, 0b001101_1001, 0b001101_1001), // D12.1
    d!(0x2D, 0b101100_1001, 0b101100_1001), // D13.1
    d!(0x2E, 0b011100_1001, 0b011100_1001), // D14.1
    d!(0x2F, 0b010111_1001, 0b101000_1001), // D15.1
    d!(0x30, 0b011011_1001, 0b100100_1001), // D16.1
    d!(0x31, 0b100011_1001, 0b100011_1001), // D17.1
    d!(0x32, 0b010011_1001, 0b010011_1001), // D18.1
    d!(0x33, 0b110010_1001, 0b110010_1001), // D19.1
    d!(0x34, 0b001011_1001, 0b001011_1001), // D20.1
    d!(0x35, 0b101010_1001, 0b101010_1001), // D21.1
    d!(0x36, 0b011010_1001, 0b011010_1001), // D22.1
    d!(0x37, 0b111010_1001, 0b000101_1001), // D23.1
    d!(0x38, 0b110011_1001, 0b001100_1001), // D24.1
    d!(0x39, 0b100110_1001, 0b100110_1001), // D25.1
    d!(0x3A, 0b010110_1001, 0b010110_1001), // D26.1
    d!(0x3B, 0b110110_1001, 0b001001_1001), // D27.1
    d!(0x3C, 0b001110_1001, 0b001110_1001), // D28.1
    d!(0x3D, 0b101110_1001, 0b010001_1001), // D29.1
    d!(0x3E, 0b011110_1001, 0b100001_1001), // D30.1
    d!(0x3F, 0b101011_1001, 0b010100_1001), // D31.1
    d!(0x40, 0b100111_0101, 0b011000_0101), // D0.2
    d!(0x41, 0b011101_0101, 0b100010_0101), // D1.2
    d!(0x42, 0b101101_0101, 0b010010_0101), // D2.2
    d!(0x43, 0b110001_0101, 0b110001_0101), // D3.2
    d!(0x44, 0b110101_0101, 0b001010_0101), // D4.2
    d!(0x45, 0b101001_0101, 0b101001_0101), // D5.2
    d!(0x46, 0b011001_0101, 0b011001_0101), // D6.2
    d!(0x47, 0b111000_0101, 0b000111_0101), // D7.2
    d!(0x48, 0b111001_0101, 0b000110_0101), // D8.2
    d!(0x49, 0b100101_0101, 0b100101_0101), // D9.2
    d!(0x4A, 0b010101_0101, 0b010101_0101), // D10.2
    d!(0x4B, 0b110100_0101, 0b110100_0101), // D11.2
    d!(0x4C, 0b001101_0101, 0b001101_0101), // D12.2
    d!(0x4D, 0b101100_0101, 0b101100_0101), // D13.2
    d!(0x4E, 0b011100_0101, 0b011100_0101), // D14.2
    d!(0x4F, 0b010111_0101, 0b101000_0101), // D15.2
    d!(0x50, 0b011011_0101, 0b100100_0101), // D16.2
    d!(0x51, 0b100011_0101, 0b100011_0101), // D17.2
    d!(0x52, 0b010011_0101, 0b010011_0101), // D18.2
    d!(0x53, 0b110010_0101, 0b110010_0101), // D19.2
    d!(0x54, 0b001011_0101, 0b001011_0101), // D20.2
    d!(0x55, 0b101010_0101, 0b101010_0101), // D21.2
    d!(0x56, 0b011010_0101, 0b011010_0101), // D22.2
    d!(0x57, 0b111010_0101, 0b000101_0101), // D23.2
    d!(0x58, 0b110011_0101, 0b001100_0101), // D24.2
    d!(0x59, 0b100110_0101, 0b100110_0101), // D25.2
    d!(0x5A, 0b010110_0101, 0b010110_0101), // D26.2
    d!(0x5B, 0b110110_0101, 0b001001_0101), // D27.2
    d!(0x5C, 0b001110_0101, 0b001110_0101), // D28.2
    d!(0x5D, 0b101110_0101, 0b010001_0101), // D29.2
    d!(0x5E, 0b011110_0101, 0b100001_0101), // D30.2
    d!(0x5F, 0b101011_0101, 0b010100_0101), // D31.2
    d!(0x60, 0b100111_0011, 0b011000_1100), // D0.3
    d!(0x61, 0b011101_0011, 0b100010_1100), // D1.3
    d!(0x62, 0b101101_0011, 0b010010_1100), // D2.3
    d!(0x63, 0b110001_1100, 0b110001_0011), // D3.3
    d!(0x64, 0b110101_0011, 0b001010_1100), // D4.3
    d!(0x65, 0b101001_1100, 0b101001_0011), // D5.3
    d!(0x66, 0b011001_1100, 0b011001_0011), // D6.3
    d!(0x67, 0b111000_1100, 0b000111_0011), // D7.3
    d!(0x68, 0b111001_0011, 0b000110_1100), // D8.3
    d!(0x69, 0b100101_1100, 0b100101_0011), // D9.3
    d!(0x6A, 0b010101_1100, 0b010101_0011), // D10.3
    d!(0x6B, 0b110100_1100, 0b110100_0011), // D11.3
    d!(0x6C, 0b001101_1100, 0b001101_0011), // D12.3
    d!(0x6D, 0b101100_1100, 0b101100_0011), // D13.3
    d!(0x6E, 0b011100_1100, 0b011100_0011), // D14.3
    d!(0x6F, 0b010111_0011, 0b101000_1100), // D15.3
    d!(0x70, 0b011011_0011, 0b100100_1100), // D16.3
    d!(0x71, 0b100011_1100, 0b100011_0011), // D17.3
    d!(0x72, 0b010011_1100, 0b010011_0011), // D18.3
    d!(0x73, 0b110010_1100, 0b110010_0011), // D19.3
    d!(0x74, 0b001011_1100, 0b001011_0011), // D20.3
    d!(0x75, 0b101010_1100, 0b101010_0011), // D21.3
    d!(0x76, 0b011010_1100, 0b011010_0011), // D22.3
    d!(0x77, 0b111010_0011, 0b000101_1100), // D23.3
    d!(0x78, 0b110011_0011, 0b001100_1100), // D24.3
    d!(0x79, 0b100110_1100, 0b100110_0011), // D25.3
    d!(0x7A, 0b010110_1100, 0b010110_0011), // D26.3
    d!(0x7B, 0b110110_0011, 0b001001_1100), // D27.3
    d!(0x7C, 0b001110_1100, 0b001110_0011), // D28.3
    d!(0x7D, 0b101110_0011, 0b010001_1100), // D29.3
    d!(0x7E, 0b011110_0011, 0b100001_1100), // D30.3
    d!(0x7F, 0b101011_0011, 0b010100_1100), // D31.3
    d!(0x80, 0b100111_0010, 0b011000_1101), // D0.4
    d!(0x81, 0b011101_0010, 0b100010_1101), // D1.4
    d!(0x82, 0b101101_0010, 0b010010_1101), // D2.4
    d!(0x83, 0b110001_1101, 0b110001_0010), // D3.4
    d!(0x84, 0b110101_0010, 0b001010_1101), // D4.4
    d!(0x85, 0b101001_1101, 0b101001_0010), // D5.4
    d!(0x86, 0b011001_1101, 0b011001_0010), // D6.4
    d!(0x87, 0b111000_1101, 0b000111_0010), // D7.4
    d!(0x88, 0b111001_0010, 0b000110_1101), // D8.4
    d!(0x89, 0b100101_1101, 0b100101_0010), // D9.4
    d!(0x8A, 0b010101_1101, 0b010101_0010), // D10.4
    d!(0x8B, 0b110100_1101, 0b110100_0010), // D11.4
    d!(0x8C, 0b001101_1101, 0b001101_0010), // D12.4
    d!(0x8D, 0b101100_1101, 0b101100_0010), // D13.4
    d!(0x8E, 0b011100_1101, 0b011100_0010), // D14.4
    d!(0x8F, 0b010111_0010, 0b101000_1101), // D15.4
    d!(0x90, 0b011011_0010, 0b100100_1101), // D16.4
    d!(0x91, 0b100011_1101, 0b100011_0010), // D17.4
    d!(0x92, 0b010011_1101, 0b010011_0010), // D18.4
    d!(0x93, 0b110010_1101, 0b110010_0010), // D19.4
    d!(0x94, 0b001011_1101, 0b001011_0010), // D20.4
    d!(0x95, 0b101010_1101, 0b101010_0010), // D21.4
    d!(0x96, 0b011010_1101, 0b011010_0010), // D22.4
    d!(0x97, 0b111010_0010, 0b000101_1101), // D23.4
    d!(0x98, 0b110011_0010, 0b001100_1101), // D24.4
    d!(0x99, 0b100110_1101, 0b100110_0010), // D25.4
    d!(0x9A, 0b010110_1101, 0b010110_0010), // D26.4
    d!(0x9B, 0b110110_0010, 0b001001_1101), // D27.4
    d!(0x9C, 0b001110_1101, 0b001110_0010), // D28.4
    d!(0x9D, 0b101110_0010, 0b010001_1101), // D29.4
    d!(0x9E, 0b011110_0010, 0b100001_1101), // D30.4
    d!(0x9F, 0b101011_0010, 0b010100_1101), // D31.4
    d!(0xA0, 0b100111_1010, 0b011000_1010), // D0.5
    d!(0xA1, 0b011101_1010, 0b100010_1010), // D1.5
    d!(0xA2, 0b101101_1010, 0b010010_1010), // D2.5
    d!(0xA3, 0b110001_1010, 0b110001_1010), // D3.5
    d!(0xA4, 0b110101_1010, 0b001010_1010), // D4.5
    d!(0xA5, 0b101001_1010, 0b101001_1010), // D5.5
    d!(0xA6, 0b011001_1010, 0b011001_1010), // D6.5
    d!(0xA7, 0b111000_1010, 0b000111_1010), // D7.5
    d!(0xA8, 0b111001_1010, 0b000110_1010), // D8.5
    d!(0xA9, 0b100101_1010, 0b100101_1010), // D9.5
    d!(0xAA, 0b010101_1010, 0b010101_1010), // D10.5
    d!(0xAB, 0b110100_1010, 0b110100_1010), // D11.5
    d!(0xAC, 0b001101_1010, 0b001101_1010), // D12.5
    d!(0xAD, 0b101100_1010, 0b101100_1010), // D13.5
    d!(0xAE, 0b011100_1010, 0b011100_1010), // D14.5
    d!(0xAF, 0b010111_1010, 0b101000_1010), // D15.5
    d!(0xB0, 0b011011_1010, 0b100100_1010), // D16.5
    d!(0xB1, 0b100011_1010, 0b100011_1010), // D17.5
    d!(0xB2, 0b010011_1010, 0b010011_1010), // D18.5
    d!(0xB3, 0b110010_1010, 0b110010_1010), // D19.5
    d!(0xB4, 0b001011_1010, 0b001011_1010), // D20.5
    d!(0xB5, 0b101010_1010, 0b101010_1010), // D21.5
    d!(0xB6, 0b011010_1010, 0b011010_1010), // D22.5
    d!(0xB7, 0b111010_1010, 0b000101_1010), // D23.5
    d!(0xB8, 0b110011_1010, 0b001100_1010), // D24.5
    d!(0xB9, 0b100110_1010, 0b100110_1010), // D25.5
    d!(0xBA, 0b010110_1010, 0b010110_1010), // D26.5
    d!(0xBB, 0b110110_1010, 0b001001_1010), // D27.5
    d!(0xBC, 0b001110_1010, 0b001110_1010), // D28.5
    d!(0xBD, 0b101110_1010, 0b010001_1010), // D29.5
    d!(0xBE, 0b011110_1010, 0b100001_1010), // D30.5
    d!(0xBF, 0b101011_1010, 0b010100_1010), // D31.5
    d!(0xC0, 0b100111_0110, 0b011000_0110), // D0.6
    d!(0xC1, 0b011101_0110, 0b100010_0110), // D1.6
    d!(0xC2, 0b101101_0110, 0b010010_0110), // D2.6
    d!(0xC3, 0b110001_0110, 0b110001_0110), // D3.6
    d!(0xC4, 0b110101_0110, 0b001010_0110), // D4.6
    d!(0xC5, 0b101001_0110, 0b101001_0110), // D5.6
    d!(0xC6, 0b011001_0110, 0b011001_0110), // D6.6
    d!(0xC7, 0b111000_0110, 0b000111_0110), // D7.6
    d!(0xC8, 0b111001_0110, 0b000110_0110), // D8.6
    d!(0xC9, 0b100101_0110, 0b100101_0110), // D9.6
    d!(0xCA, 0b010101_0110, 0b010101_0110), // D10.6
    d!(0xCB, 0b110100_0110, 0b110100_0110), // D11.6
    d!(0xCC, 0b001101_0110, 0b001101_0110), // D12.6
    d!(0xCD, 0b101100_0110, 0b101100_0110), // D13.6
    d!(0xCE, 0b011100_0110, 0b011100_0110), // D14.6
    d!(0xCF, 0b010111_0110, 0b101000_0110), // D15.6
    d!(0xD0, 0b011011_0110, 0b100100_0110), // D16.6
    d!(0xD1, 0b100011_0110, 0b100011_0110), // D17.6
    d!(0xD2, 0b010011_0110, 0b010011_0110), // D18.6
    d!(0xD3, 0b110010_0110, 0b110010_0110), // D19.6
    d!(0xD4, 0b001011_0110, 0b001011_0110), // D20.6
    d!(0xD5, 0b101010_0110, 0b101010_0110), // D21.6
    d!(0xD6, 0b011010_0110, 0b011010_0110), // D22.6
    d!(0xD7, 0b111010_0110, 0b000101_0110), // D23.6
    d!(0xD8, 0b110011_0110, 0b001100_0110), // D24.6
    d!(0xD9, 0b100110_0110, 0b100110_0110), // D25.6
    d!(0xDA, 0b010110_0110, 0b010110_0110), // D26.6
    d!(0xDB, 0b110110_0110, 0b001001_0110), // D27.6
    d!(0xDC, 0b001110_0110, 0b001110_0110), // D28.6
    d!(0xDD, 0b101110_0110, 0b010001_0110), // D29.6
    d!(0xDE, 0b011110_0110, 0b100001_0110), // D30.6
    d!(0xDF, 0b101011_0110, 0b010100_0110), // D31.6
    d!(0xE0, 0b100111_0001, 0b011000_1110), // D0.7
    d!(0xE1, 0b011101_0001, 0b100010_1110), // D1.7
    d!(0xE2, 0b101101_0001, 0b010010_1110), // D2.7
    d!(0xE3, 0b110001_1110, 0b110001_0001), // D3.7
    d!(0xE4, 0b110101_0001, 0b001010_1110), // D4.7
    d!(0xE5, 0b101001_1110, 0b101001_0001), // D5.7
    d!(0xE6, 0b011001_1110, 0b011001_0001), // D6.7
    d!(0xE7, 0b111000_1110, 0b000111_0001), // D7.7
    d!(0xE8, 0b111001_0001, 0b000110_1110), // D8.7
    d!(0xE9, 0b100101_1110, 0b100101_0001), // D9.7
    d!(0xEA, 0b010101_1110, 0b010101_0001), // D10.7
    d!(0xEB, 0b110100_1110, 0b110100_1000), // D11.7
    d!(0xEC, 0b001101_1110, 0b001101_0001), // D12.7
    d!(0xED, 0b101100_1110, 0b101100_1000), // D13.7
    d!(0xEE, 0b011100_1110, 0b011100_1000), // D14.7
    d!(0xEF, 0b010111_0001, 0b101000_1110), // D15.7
    d!(0xF0, 0b011011_0001, 0b100100_1110), // D16.7
    d!(0xF1, 0b100011_0111, 0b100011_0001), // D17.7
    d!(0xF2, 0b010011_0111, 0b010011_0001), // D18.7
    d!(0xF3, 0b110010_1110, 0b110010_0001), // D19.7
    d!(0xF4, 0b001011_0111, 0b001011_0001), // D20.7
    d!(0xF5, 0b101010_1110, 0b101010_0001), // D21.7
    d!(0xF6, 0b011010_1110, 0b011010_0001), // D22.7
    d!(0xF7, 0b111010_0001, 0b000101_1110), // D23.7
    d!(0xF8, 0b110011_0001, 0b001100_1110), // D24.7
    d!(0xF9, 0b100110_1110, 0b100110_0001), // D25.7
    d!(0xFA, 0b010110_1110, 0b010110_0001), // D26.7
    d!(0xFB, 0b110110_0001, 0b001001_1110), // D27.7
    d!(0xFC, 0b001110_1110, 0b001110_0001), // D28.7
    d!(0xFD, 0b101110_0001, 0b010001_1110), // D29.7
    d!(0xFE, 0b011110_0001, 0b100001_1110), // D30.7
    d!(0xFF, 0b101011_0001, 0b010100_1110), // D31.7
    k!(0x1C, 0b001111_0100, 0b110000_1011), // K28.0
    k!(0x3C, 0b001111_1001, 0b110000_0110), // K28.1
    k!(0x5C, 0b001111_0101, 0b110000_1010), // K28.2
    k!(0x7C, 0b001111_0011, 0b110000_1100), // K28.3
    k!(0x9C, 0b001111_0010, 0b110000_1101), // K28.4
    k!(0xBC, 0b001111_1010, 0b110000_0101), // K28.5
    k!(0xDC, 0b001111_0110, 0b110000_1001), // K28.6
    k!(0xFC, 0b001111_1000, 0b110000_0111), // K28.7
    k!(0xF7, 0b111010_1000, 0b000101_0111), // K23.7
    k!(0xFB, 0b110110_1000, 0b001001_0111), // K27.7
    k!(0xFD, 0b101110_1000, 0b010001_0111), // K29.7
    k!(0xFE, 0b011110_1000, 0b100001_0111), // K30.7
];
