use num_traits::PrimInt;

/// A value together with the set of bits that are meaningful.
///
/// Cleared mask bits are don't-care. A bare value converts with every mask
/// bit set, so callers resolve "value or (value, mask)" once at the API
/// boundary instead of probing at use sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Masked<T> {
    pub value: T,
    pub mask: T,
}

impl<T> Masked<T> {
    /// Stores both parts verbatim. `value` must not set bits outside `mask`.
    pub const fn from_parts(value: T, mask: T) -> Self {
        Self { value, mask }
    }
}

impl<T: PrimInt> Masked<T> {
    pub fn new(value: T, mask: T) -> Self {
        Self {
            value: value & mask,
            mask,
        }
    }

    pub fn exact(value: T) -> Self {
        Self::new(value, !T::zero())
    }

    /// Nothing is specified.
    pub fn dont_care() -> Self {
        Self {
            value: T::zero(),
            mask: T::zero(),
        }
    }

    #[inline]
    pub fn matches(&self, candidate: T) -> bool {
        candidate & self.mask == self.value
    }

    /// Number of bits in `T`.
    #[inline]
    pub fn width() -> usize {
        T::zero().count_zeros() as usize
    }

    /// `None` when the bit is don't-care, which includes any index past the width of `T`.
    #[inline]
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= Self::width() {
            return None;
        }
        let probe = T::one() << index;
        if self.mask & probe == T::zero() {
            None
        } else {
            Some(self.value & probe != T::zero())
        }
    }

    /// Sets one bit, or marks it don't-care with `None`.
    ///
    /// # Panics
    /// If `index` is not below the width of `T`.
    pub fn with_bit(self, index: usize, bit: Option<bool>) -> Self {
        assert!(index < Self::width(), "bit {} out of range for a {}-bit value", index, Self::width());
        let probe = T::one() << index;
        match bit {
            None => Self {
                value: self.value & !probe,
                mask: self.mask & !probe,
            },
            Some(set) => Self {
                value: if set { self.value | probe } else { self.value & !probe },
                mask: self.mask | probe,
            },
        }
    }

    /// Specifies `width` bits starting at `offset` from the low bits of `field`.
    pub fn with_field(self, offset: usize, width: usize, field: T) -> Self {
        (0..width).fold(self, |acc, i| {
            acc.with_bit(offset + i, Some((field >> i) & T::one() == T::one()))
        })
    }

    /// True when none of the low `width` bits is don't-care.
    pub fn is_specified(&self, width: usize) -> bool {
        (0..width).all(|i| self.bit(i).is_some())
    }

    /// The low `width` bits as an integer, if all of them are specified.
    pub fn field(&self, offset: usize, width: usize) -> Option<T> {
        (0..width).try_fold(T::zero(), |acc, i| {
            self.bit(offset + i)
                .map(|b| if b { acc | (T::one() << i) } else { acc })
        })
    }
}

impl<T: PrimInt> From<T> for Masked<T> {
    fn from(value: T) -> Self {
        Self::exact(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_value_is_fully_masked() {
        let m: Masked<u8> = 0x5A.into();
        assert_eq!(m.mask, 0xFF);
        assert!(m.matches(0x5A));
        assert!(!m.matches(0x5B));
    }

    #[test]
    fn dont_care_bits_are_ignored() {
        let m = Masked::new(0b1010u16, 0b1110);
        assert!(m.matches(0b1010));
        assert!(m.matches(0b1011));
        assert_eq!(m.bit(0), None);
        assert_eq!(m.bit(1), Some(true));
        assert_eq!(m.bit(2), Some(false));
    }

    #[test]
    fn fields_round_trip_through_bits() {
        let m = Masked::<u16>::dont_care()
            .with_field(0, 8, 0xBC)
            .with_bit(8, Some(true))
            .with_bit(13, None);
        assert_eq!(m.field(0, 8), Some(0xBC));
        assert_eq!(m.bit(8), Some(true));
        assert_eq!(m.field(8, 2), None);
        assert!(m.is_specified(9));
        assert!(!m.is_specified(10));
    }

    #[test]
    fn bits_past_the_width_are_unspecified() {
        let m = Masked::exact(0xFFFFu16);
        assert_eq!(Masked::<u16>::width(), 16);
        assert_eq!(m.bit(15), Some(true));
        assert_eq!(m.bit(16), None);
        assert_eq!(m.field(12, 8), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn setting_a_bit_past_the_width_panics() {
        let _ = Masked::<u8>::dont_care().with_bit(8, Some(true));
    }
}
