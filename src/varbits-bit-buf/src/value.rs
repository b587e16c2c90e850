use std::fmt;

use varbits_wide::{Int128, UInt128};

use crate::{
    error::{check_bit_count, Error, Result},
    MAX_NARROW_BITS, MAX_WIDE_BITS,
};

/// The native integer representation backing a [`BitValue`].
///
/// A value always lives in the smallest of the 8, 16, 32, 64 and
/// 128-bit types which covers its declared bit count.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Storage {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(UInt128),

    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(Int128),
}

impl Storage {
    fn unsigned(value: UInt128, bit_count: u32) -> Self {
        match bit_count {
            0..=8 => Self::U8(value.low as u8),
            9..=16 => Self::U16(value.low as u16),
            17..=32 => Self::U32(value.low as u32),
            33..=64 => Self::U64(value.low),
            _ => Self::U128(value),
        }
    }

    fn signed(value: Int128, bit_count: u32) -> Self {
        let narrow = value.low as i64;
        match bit_count {
            0..=8 => Self::I8(narrow as i8),
            9..=16 => Self::I16(narrow as i16),
            17..=32 => Self::I32(narrow as i32),
            33..=64 => Self::I64(narrow),
            _ => Self::I128(value),
        }
    }

    /// The width of the backing integer type in bits.
    pub const fn bits(&self) -> u32 {
        match self {
            Self::U8(_) | Self::I8(_) => u8::BITS,
            Self::U16(_) | Self::I16(_) => u16::BITS,
            Self::U32(_) | Self::I32(_) => u32::BITS,
            Self::U64(_) | Self::I64(_) => u64::BITS,
            Self::U128(_) | Self::I128(_) => UInt128::BITS,
        }
    }

    /// Whether the backing integer type is signed.
    pub const fn is_signed(&self) -> bool {
        matches!(
            self,
            Self::I8(_) | Self::I16(_) | Self::I32(_) | Self::I64(_) | Self::I128(_)
        )
    }
}

/// An integer tagged with its declared bit width and signedness.
///
/// Unsigned values are masked to their bit count on construction.
/// Signed values are kept as given and truncated only by the choice of
/// the backing type.
///
/// Two values are equal when they have the same bit count and the same
/// [`Storage`], i.e. width, signedness and bits all match. A signed and
/// an unsigned value never compare equal, even with identical bits.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawBitValue"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitValue {
    storage: Storage,
    bit_count: u32,
}

impl BitValue {
    /// Creates an unsigned value of `bit_count` bits from `value`.
    ///
    /// Bits of `value` beyond `bit_count` are discarded. Counts above 64
    /// select the 128-bit representation.
    pub fn new_unsigned(value: u64, bit_count: u32) -> Result<Self> {
        Self::new_unsigned_128(UInt128::from_u64(value), bit_count)
    }

    /// Creates an unsigned value of `bit_count` bits from a wide `value`.
    pub fn new_unsigned_128(value: UInt128, bit_count: u32) -> Result<Self> {
        check_bit_count(bit_count, MAX_WIDE_BITS)?;

        Ok(Self {
            storage: Storage::unsigned(value.low_bits(bit_count), bit_count),
            bit_count,
        })
    }

    /// Creates a signed value of `bit_count` bits, which must not
    /// exceed 64.
    ///
    /// Use [`BitValue::new_signed_128`] for wider signed values.
    pub fn new_signed(value: i64, bit_count: u32) -> Result<Self> {
        check_bit_count(bit_count, MAX_NARROW_BITS)?;

        Ok(Self {
            storage: Storage::signed(Int128::from_i64(value), bit_count),
            bit_count,
        })
    }

    /// Creates a signed value of `bit_count` bits from a wide `value`.
    pub fn new_signed_128(value: Int128, bit_count: u32) -> Result<Self> {
        check_bit_count(bit_count, MAX_WIDE_BITS)?;

        Ok(Self {
            storage: Storage::signed(value, bit_count),
            bit_count,
        })
    }

    /// Gets the declared number of bits in the value.
    #[inline]
    pub const fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Whether the value is signed.
    #[inline]
    pub const fn is_signed(&self) -> bool {
        self.storage.is_signed()
    }

    /// Gets the width of the backing integer type in bits.
    #[inline]
    pub const fn storage_bits(&self) -> u32 {
        self.storage.bits()
    }

    /// Gets the native representation of the value.
    #[inline]
    pub const fn storage(&self) -> Storage {
        self.storage
    }

    /// Converts the value to a [`u64`].
    ///
    /// 128-bit values are truncated to their low word; narrower signed
    /// values are sign-extended. Fails with [`Error::InvalidConversion`]
    /// for negative 128-bit values.
    pub fn to_u64(&self) -> Result<u64> {
        Ok(match self.storage {
            Storage::U8(v) => v as u64,
            Storage::U16(v) => v as u64,
            Storage::U32(v) => v as u64,
            Storage::U64(v) => v,
            Storage::U128(v) => v.low,

            Storage::I8(v) => v as u64,
            Storage::I16(v) => v as u64,
            Storage::I32(v) => v as u64,
            Storage::I64(v) => v as u64,
            Storage::I128(v) if v.is_negative() => return Err(Error::InvalidConversion),
            Storage::I128(v) => v.low,
        })
    }

    /// Converts the value to an unsigned 128-bit integer.
    ///
    /// Signed values yield their sign-extended two's complement bits.
    pub fn to_u128(&self) -> UInt128 {
        match self.storage {
            Storage::U128(v) => v,
            Storage::I128(v) => v.to_bits(),
            _ if self.is_signed() => Int128::from_i64(self.to_i64()).to_bits(),
            _ => UInt128::from_u64(self.to_i64() as u64),
        }
    }

    /// Converts the value to an [`i64`], truncating wider values.
    pub fn to_i64(&self) -> i64 {
        match self.storage {
            Storage::U8(v) => v as i64,
            Storage::U16(v) => v as i64,
            Storage::U32(v) => v as i64,
            Storage::U64(v) => v as i64,
            Storage::U128(v) => v.low as i64,

            Storage::I8(v) => v as i64,
            Storage::I16(v) => v as i64,
            Storage::I32(v) => v as i64,
            Storage::I64(v) => v,
            Storage::I128(v) => v.low as i64,
        }
    }

    /// Converts the value to a signed 128-bit integer.
    ///
    /// Unsigned values are zero-extended; a 128-bit unsigned value is
    /// reinterpreted as two's complement.
    pub fn to_i128(&self) -> Int128 {
        match self.storage {
            Storage::U128(v) => Int128::from_bits(v),
            Storage::I128(v) => v,
            _ if self.is_signed() => Int128::from_i64(self.to_i64()),
            _ => Int128::from_parts(0, self.to_i64() as u64),
        }
    }
}

// The unchecked shape of a serialized BitValue.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawBitValue {
    storage: Storage,
    bit_count: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawBitValue> for BitValue {
    type Error = Error;

    fn try_from(raw: RawBitValue) -> Result<Self> {
        let unchecked = Self {
            storage: raw.storage,
            bit_count: raw.bit_count,
        };

        // Rebuilding through the constructors applies the bit count
        // check, the storage choice and the unsigned mask.
        let value = if unchecked.is_signed() {
            Self::new_signed_128(unchecked.to_i128(), raw.bit_count)?
        } else {
            Self::new_unsigned_128(unchecked.to_u128(), raw.bit_count)?
        };

        if value == unchecked {
            Ok(value)
        } else {
            Err(Error::InvalidValue {
                bit_count: raw.bit_count,
            })
        }
    }
}

macro_rules! impl_from_native {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for BitValue {
                #[doc = concat!("Wraps a [`", stringify!($ty), "`] using its full width.")]
                #[inline]
                fn from(value: $ty) -> Self {
                    Self {
                        storage: Storage::$variant(value),
                        bit_count: Storage::$variant(value).bits(),
                    }
                }
            }
        )*
    };
}

impl_from_native! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    UInt128 => U128,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    Int128 => I128,
}

impl fmt::Display for BitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.storage {
            Storage::U8(v) => write!(f, "{v}")?,
            Storage::U16(v) => write!(f, "{v}")?,
            Storage::U32(v) => write!(f, "{v}")?,
            Storage::U64(v) => write!(f, "{v}")?,
            Storage::U128(v) => write!(f, "{v}")?,
            Storage::I8(v) => write!(f, "{v}")?,
            Storage::I16(v) => write!(f, "{v}")?,
            Storage::I32(v) => write!(f, "{v}")?,
            Storage::I64(v) => write!(f, "{v}")?,
            Storage::I128(v) => write!(f, "{v}")?,
        }

        let sign = if self.is_signed() { "signed" } else { "unsigned" };
        write!(f, " ({} bits, {sign})", self.bit_count)
    }
}
