use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, BitAnd, BitOr, BitXor, Neg, Not, Shl, Shr, Sub},
};

use crate::UInt128;

/// A signed 128-bit integer in two's complement, stored as two words.
///
/// `high` carries the sign; the represented value is
/// `high * 2^64 + low` with `high` interpreted as signed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Int128 {
    /// The most significant 64 bits, including the sign bit.
    pub high: i64,
    /// The least significant 64 bits.
    pub low: u64,
}

impl Int128 {
    /// The value `0`.
    pub const ZERO: Self = Self::from_parts(0, 0);

    /// The smallest representable value, `-2^127`.
    pub const MIN: Self = Self::from_parts(i64::MIN, 0);

    /// The largest representable value, `2^127 - 1`.
    pub const MAX: Self = Self::from_parts(i64::MAX, u64::MAX);

    /// The number of bits in the type.
    pub const BITS: u32 = 128;

    /// Creates a value from its high and low words.
    #[inline]
    pub const fn from_parts(high: i64, low: u64) -> Self {
        Self { high, low }
    }

    /// Sign-extends an [`i64`] into a wide value.
    #[inline]
    pub const fn from_i64(value: i64) -> Self {
        Self::from_parts(value >> 63, value as u64)
    }

    /// Whether the value is less than zero.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.high < 0
    }

    /// Reinterprets the two's complement bits as an unsigned value.
    #[inline]
    pub const fn to_bits(self) -> UInt128 {
        UInt128::from_parts(self.high as u64, self.low)
    }

    /// Reinterprets unsigned bits as a two's complement value.
    #[inline]
    pub const fn from_bits(bits: UInt128) -> Self {
        Self::from_parts(bits.high as i64, bits.low)
    }
}

impl Add for Int128 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_bits(self.to_bits() + rhs.to_bits())
    }
}

impl Sub for Int128 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_bits(self.to_bits() - rhs.to_bits())
    }
}

impl Neg for Int128 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::from_bits(self.to_bits().wrapping_neg())
    }
}

impl Shl<u32> for Int128 {
    type Output = Self;

    #[inline]
    fn shl(self, shift: u32) -> Self {
        Self::from_bits(self.to_bits() << shift)
    }
}

// Arithmetic shift: vacated high bits are filled with the sign.
impl Shr<u32> for Int128 {
    type Output = Self;

    fn shr(self, shift: u32) -> Self {
        match shift {
            0 => self,
            1..=63 => Self::from_parts(
                self.high >> shift,
                (self.low >> shift) | ((self.high as u64) << (64 - shift)),
            ),
            64..=127 => Self::from_parts(self.high >> 63, (self.high >> (shift - 64)) as u64),
            _ => Self::from_i64(self.high >> 63),
        }
    }
}

impl BitAnd for Int128 {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self::from_bits(self.to_bits() & rhs.to_bits())
    }
}

impl BitOr for Int128 {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self::from_bits(self.to_bits() | rhs.to_bits())
    }
}

impl BitXor for Int128 {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Self::from_bits(self.to_bits() ^ rhs.to_bits())
    }
}

impl Not for Int128 {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self::from_bits(!self.to_bits())
    }
}

impl_assign_ops! {
    Int128 =>
    AddAssign::add_assign = Add::add(Int128),
    SubAssign::sub_assign = Sub::sub(Int128),
    ShlAssign::shl_assign = Shl::shl(u32),
    ShrAssign::shr_assign = Shr::shr(u32),
    BitAndAssign::bitand_assign = BitAnd::bitand(Int128),
    BitOrAssign::bitor_assign = BitOr::bitor(Int128),
    BitXorAssign::bitxor_assign = BitXor::bitxor(Int128),
}

impl Ord for Int128 {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.high.cmp(&other.high) {
            Ordering::Equal => self.low.cmp(&other.low),
            ord => ord,
        }
    }
}

impl PartialOrd for Int128 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<i64> for Int128 {
    #[inline]
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<i128> for Int128 {
    #[inline]
    fn from(value: i128) -> Self {
        Self::from_parts((value >> 64) as i64, value as u64)
    }
}

impl From<Int128> for i128 {
    #[inline]
    fn from(value: Int128) -> Self {
        ((value.high as i128) << 64) | value.low as i128
    }
}

impl fmt::Display for Int128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&i128::from(*self), f)
    }
}
