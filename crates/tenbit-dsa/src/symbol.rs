use core::fmt;

use crate::masked::Masked;

/// The 12 standard control values: K28.0 through K28.7, K23.7, K27.7, K29.7, K30.7.
pub const CONTROL_SYMBOLS: [u8; 12] = [
    0x1C, 0x3C, 0x5C, 0x7C, 0x9C, 0xBC, 0xDC, 0xFC, 0xF7, 0xFB, 0xFD, 0xFE,
];

/// An 8-bit value plus the control flag that selects the K-character alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol {
    pub value: u8,
    pub control: bool,
}

static_assertions::assert_eq_size!(Symbol, [u8; 2]);

impl Symbol {
    pub const fn new(value: u8, control: bool) -> Self {
        Self { value, control }
    }

    /// A data character, `D<x>.<y>`.
    pub const fn data(value: u8) -> Self {
        Self::new(value, false)
    }

    /// A control character, `K<x>.<y>`.
    pub const fn k(value: u8) -> Self {
        Self::new(value, true)
    }

    /// Builds the symbol written `D<x>.<y>` or `K<x>.<y>`. Out-of-range parts are masked.
    pub const fn from_xy(x: u8, y: u8, control: bool) -> Self {
        Self::new(((y & 0x7) << 5) | (x & 0x1f), control)
    }

    /// The 5-bit `EDCBA` part.
    pub const fn x(self) -> u8 {
        self.value & 0x1f
    }

    /// The 3-bit `HGF` part.
    pub const fn y(self) -> u8 {
        self.value >> 5
    }

    /// True for data symbols and for the 12 standard control values.
    pub fn is_standard(self) -> bool {
        !self.control || CONTROL_SYMBOLS.contains(&self.value)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.control { 'K' } else { 'D' };
        write!(f, "{}{}.{}", prefix, self.x(), self.y())
    }
}

/// A 10-bit transmission word. Bit 0 is `a`, the first bit on the wire; bit 9 is `j`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Codeword(u16);

static_assertions::assert_eq_size!(Codeword, u16);

/// Positive comma `0011111` over bits `abcdeif`.
pub const COMMA_POSITIVE: Masked<u16> = Masked::from_parts(0b111_1100, 0b111_1111);
/// Negative comma `1100000` over bits `abcdeif`.
pub const COMMA_NEGATIVE: Masked<u16> = Masked::from_parts(0b000_0011, 0b111_1111);

impl Codeword {
    pub const BITS: usize = 10;
    /// Number of distinct 10-bit patterns.
    pub const SPACE: usize = 1 << Self::BITS;
    pub const MASK: u16 = (1 << Self::BITS) - 1;

    pub const fn new(bits: u16) -> Option<Self> {
        if bits > Self::MASK {
            None
        } else {
            Some(Self(bits))
        }
    }

    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & Self::MASK)
    }

    /// Converts a word written as `abcdeifghj` (most significant digit first,
    /// the way the standard prints it) into stored bit order.
    pub const fn from_transmission(written: u16) -> Self {
        let mut stored = 0;
        let mut i = 0;
        while i < Self::BITS {
            if (written >> (Self::BITS - 1 - i)) & 1 == 1 {
                stored |= 1 << i;
            }
            i += 1;
        }
        Self(stored)
    }

    #[inline(always)]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline(always)]
    pub const fn bit(self, index: usize) -> bool {
        (self.0 >> index) & 1 == 1
    }

    pub const fn ones(self) -> u32 {
        self.0.count_ones()
    }

    /// Every 10-bit pattern in ascending order.
    pub fn all() -> impl Iterator<Item = Codeword> {
        (0..Self::SPACE as u16).map(Codeword)
    }

    /// Bits in the order they leave the serializer, `a` first.
    pub fn line_bits(self) -> [bool; Self::BITS] {
        core::array::from_fn(|i| self.bit(i))
    }

    /// Whether the word carries a comma at the aligned position.
    pub fn has_comma(self) -> bool {
        COMMA_POSITIVE.matches(self.0) || COMMA_NEGATIVE.matches(self.0)
    }
}

impl fmt::Display for Codeword {
    /// Ten binary digits, `j` first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..Self::BITS).rev() {
            f.write_str(if self.bit(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}
