use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, BitAnd, BitOr, BitXor, Not, Shl, Shr, Sub},
};

use byteorder::{ByteOrder, LittleEndian};

/// An unsigned 128-bit integer stored as two 64-bit words.
///
/// The represented value is `high * 2^64 + low`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct UInt128 {
    /// The most significant 64 bits.
    pub high: u64,
    /// The least significant 64 bits.
    pub low: u64,
}

impl UInt128 {
    /// The value `0`.
    pub const ZERO: Self = Self::from_parts(0, 0);

    /// The value `1`.
    pub const ONE: Self = Self::from_parts(0, 1);

    /// The largest representable value, `2^128 - 1`.
    pub const MAX: Self = Self::from_parts(u64::MAX, u64::MAX);

    /// The number of bits in the type.
    pub const BITS: u32 = 128;

    /// Creates a value from its high and low words.
    #[inline]
    pub const fn from_parts(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    /// Zero-extends a [`u64`] into a wide value.
    #[inline]
    pub const fn from_u64(value: u64) -> Self {
        Self::from_parts(0, value)
    }

    /// Builds a mask covering the low `nbits` bits.
    ///
    /// An `nbits` of 128 or more yields [`UInt128::MAX`].
    pub const fn mask(nbits: u32) -> Self {
        if nbits >= 128 {
            Self::MAX
        } else if nbits >= 64 {
            Self::from_parts((1 << (nbits - 64)) - 1, u64::MAX)
        } else {
            Self::from_parts(0, (1 << nbits) - 1)
        }
    }

    /// Keeps the low `nbits` bits of the value and clears the rest.
    #[inline]
    pub fn low_bits(self, nbits: u32) -> Self {
        self & Self::mask(nbits)
    }

    /// Whether the value is zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.high == 0 && self.low == 0
    }

    /// Computes the two's complement negation, wrapping around.
    #[inline]
    pub fn wrapping_neg(self) -> Self {
        !self + Self::ONE
    }

    /// Encodes the value as 16 little-endian bytes, low word first.
    pub fn to_le_bytes(self) -> [u8; 16] {
        let mut out = [0; 16];
        LittleEndian::write_u64(&mut out[..8], self.low);
        LittleEndian::write_u64(&mut out[8..], self.high);
        out
    }

    /// Decodes a value from 16 little-endian bytes, low word first.
    pub fn from_le_bytes(bytes: [u8; 16]) -> Self {
        Self::from_parts(
            LittleEndian::read_u64(&bytes[8..]),
            LittleEndian::read_u64(&bytes[..8]),
        )
    }
}

impl Add for UInt128 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        let (low, carry) = self.low.overflowing_add(rhs.low);
        let high = self
            .high
            .wrapping_add(rhs.high)
            .wrapping_add(carry as u64);

        Self::from_parts(high, low)
    }
}

impl Sub for UInt128 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        let (low, borrow) = self.low.overflowing_sub(rhs.low);
        let high = self
            .high
            .wrapping_sub(rhs.high)
            .wrapping_sub(borrow as u64);

        Self::from_parts(high, low)
    }
}

impl Shl<u32> for UInt128 {
    type Output = Self;

    fn shl(self, shift: u32) -> Self {
        match shift {
            0 => self,
            1..=63 => Self::from_parts(
                (self.high << shift) | (self.low >> (64 - shift)),
                self.low << shift,
            ),
            64..=127 => Self::from_parts(self.low << (shift - 64), 0),
            _ => Self::ZERO,
        }
    }
}

impl Shr<u32> for UInt128 {
    type Output = Self;

    fn shr(self, shift: u32) -> Self {
        match shift {
            0 => self,
            1..=63 => Self::from_parts(
                self.high >> shift,
                (self.low >> shift) | (self.high << (64 - shift)),
            ),
            64..=127 => Self::from_parts(0, self.high >> (shift - 64)),
            _ => Self::ZERO,
        }
    }
}

impl BitAnd for UInt128 {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self::from_parts(self.high & rhs.high, self.low & rhs.low)
    }
}

impl BitOr for UInt128 {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self::from_parts(self.high | rhs.high, self.low | rhs.low)
    }
}

impl BitXor for UInt128 {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Self::from_parts(self.high ^ rhs.high, self.low ^ rhs.low)
    }
}

impl Not for UInt128 {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self::from_parts(!self.high, !self.low)
    }
}

impl_assign_ops! {
    UInt128 =>
    AddAssign::add_assign = Add::add(UInt128),
    SubAssign::sub_assign = Sub::sub(UInt128),
    ShlAssign::shl_assign = Shl::shl(u32),
    ShrAssign::shr_assign = Shr::shr(u32),
    BitAndAssign::bitand_assign = BitAnd::bitand(UInt128),
    BitOrAssign::bitor_assign = BitOr::bitor(UInt128),
    BitXorAssign::bitxor_assign = BitXor::bitxor(UInt128),
}

impl Ord for UInt128 {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.high.cmp(&other.high) {
            Ordering::Equal => self.low.cmp(&other.low),
            ord => ord,
        }
    }
}

impl PartialOrd for UInt128 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u64> for UInt128 {
    #[inline]
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u128> for UInt128 {
    #[inline]
    fn from(value: u128) -> Self {
        Self::from_parts((value >> 64) as u64, value as u64)
    }
}

impl From<UInt128> for u128 {
    #[inline]
    fn from(value: UInt128) -> Self {
        ((value.high as u128) << 64) | value.low as u128
    }
}

impl fmt::Display for UInt128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&u128::from(*self), f)
    }
}

impl fmt::LowerHex for UInt128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&u128::from(*self), f)
    }
}
