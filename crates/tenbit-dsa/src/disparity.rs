use core::fmt;

use crate::symbol::Codeword;

/// Sign of the cumulative ones-minus-zeros count since link reset.
///
/// Conventionally written as `0` (negative) and `1` (positive), which is also
/// the bit the hardware lookup tables carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Disparity {
    #[default]
    Negative,
    Positive,
}

impl Disparity {
    /// Both states, negative first. Matches the column order of the standard tables.
    pub const BOTH: [Disparity; 2] = [Disparity::Negative, Disparity::Positive];

    #[inline(always)]
    pub const fn from_bit(positive: bool) -> Self {
        if positive {
            Disparity::Positive
        } else {
            Disparity::Negative
        }
    }

    #[inline(always)]
    pub const fn is_positive(self) -> bool {
        matches!(self, Disparity::Positive)
    }

    /// `0` for negative, `1` for positive.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub const fn flip(self) -> Self {
        Self::from_bit(!self.is_positive())
    }

    /// Starting value of the running sum for a word entered in this state.
    const fn seed(self) -> i32 {
        if self.is_positive() {
            1
        } else {
            -1
        }
    }
}

impl fmt::Display for Disparity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[inline(always)]
fn step(sum: i32, codeword: Codeword, bit: usize) -> i32 {
    if codeword.bit(bit) {
        sum + 1
    } else {
        sum - 1
    }
}

/// Computes the disparity after transmitting `codeword` in state `initial`.
///
/// Returns `None` when the word can never legally follow `initial`: the
/// running sum must land on exactly +1 or -1 after all ten bits.
pub fn evolve(initial: Disparity, codeword: Codeword) -> Option<Disparity> {
    let sum = (0..Codeword::BITS).fold(initial.seed(), |sum, bit| step(sum, codeword, bit));
    match sum {
        1 => Some(Disparity::Positive),
        -1 => Some(Disparity::Negative),
        _ => None,
    }
}

/// Per-bit magnitude limits for the running sum while a word is being received.
///
/// Walking the word from bit `a`, the prefix sum may never exceed the limit of
/// the current position. A violation means the bit pattern could not have been
/// produced from the asserted entering disparity, even if it is a valid
/// codeword for the other one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrefixBounds {
    limits: [i32; Codeword::BITS],
}

impl PrefixBounds {
    pub const STRICT: PrefixBounds = PrefixBounds {
        limits: [2, 3, 2, 3, 2, 1, 2, 1, 2, 1],
    };

    pub const LOOSE: PrefixBounds = PrefixBounds {
        limits: [2, 3, 4, 3, 2, 1, 2, 3, 2, 1],
    };

    pub const fn new(limits: [i32; Codeword::BITS]) -> Self {
        Self { limits }
    }

    pub const fn limits(&self) -> &[i32; Codeword::BITS] {
        &self.limits
    }

    /// Position of the first bit whose prefix sum breaks the bound, if any.
    pub fn first_violation(&self, initial: Disparity, codeword: Codeword) -> Option<usize> {
        let mut sum = initial.seed();
        for (bit, &limit) in self.limits.iter().enumerate() {
            sum = step(sum, codeword, bit);
            if sum.abs() > limit {
                return Some(bit);
            }
        }
        None
    }

    #[inline]
    pub fn violated(&self, initial: Disparity, codeword: Codeword) -> bool {
        self.first_violation(initial, codeword).is_some()
    }
}

/// Mid-word disparity check with the conformance-strict bounds.
pub fn strict_disparity_error(initial: Disparity, codeword: Codeword) -> bool {
    PrefixBounds::STRICT.violated(initial, codeword)
}

/// Mid-word disparity check with the relaxed bounds some receivers implement.
pub fn loose_disparity_error(initial: Disparity, codeword: Codeword) -> bool {
    PrefixBounds::LOOSE.violated(initial, codeword)
}

/// Selects which prefix-bound profile flags disparity errors.
///
/// Neither profile is authoritative; receivers differ in how strictly they
/// conform, so both stay available.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Detector {
    #[default]
    Strict,
    Loose,
}

impl Detector {
    pub const fn bounds(self) -> PrefixBounds {
        match self {
            Detector::Strict => PrefixBounds::STRICT,
            Detector::Loose => PrefixBounds::LOOSE,
        }
    }

    #[inline]
    pub fn flags(self, initial: Disparity, codeword: Codeword) -> bool {
        self.bounds().violated(initial, codeword)
    }
}

#[cfg(kani)]
mod proofs {
    use super::*;

    #[kani::proof]
    fn prove_evolve_matches_popcount() {
        let raw: u16 = kani::any();
        kani::assume(raw < 1024);
        let word = Codeword::from_bits_truncate(raw);
        let ones = raw.count_ones() as i32;

        // A balanced word keeps the state, a +/-2 word flips it, anything else is illegal.
        for initial in Disparity::BOTH {
            let expected = match (initial, ones) {
                (d, 5) => Some(d),
                (Disparity::Negative, 6) => Some(Disparity::Positive),
                (Disparity::Positive, 4) => Some(Disparity::Negative),
                _ => None,
            };
            assert_eq!(evolve(initial, word), expected);
        }
    }
}
