use varbits_utils::bits::sign_extend;
use varbits_wide::{Int128, UInt128};

use crate::{error::Result, BitValue};

/// Reading of bit fields from a source, LSB first.
pub trait BitRead {
    /// Reads `bit_count` bits, between 1 and 64, into the low bits of
    /// the result.
    ///
    /// Fails with [`Error::EndOfStream`][crate::Error::EndOfStream]
    /// without consuming anything when fewer bits remain.
    fn read_bits(&mut self, bit_count: u32) -> Result<u64>;

    /// Reads `bit_count` bits, between 1 and 128.
    ///
    /// Fields wider than 64 bits are read as their low 64 bits first,
    /// followed by the remaining high bits.
    fn read_bits_128(&mut self, bit_count: u32) -> Result<UInt128>;

    /// Reads a single bit as a [`bool`].
    #[inline]
    fn read_bool(&mut self) -> Result<bool> {
        self.read_bits(1).map(|v| v != 0)
    }

    /// Reads `bit_count` bits as an unsigned [`BitValue`].
    fn read_bit_value(&mut self, bit_count: u32) -> Result<BitValue> {
        let raw = self.read_bits_128(bit_count)?;
        BitValue::new_unsigned_128(raw, bit_count)
    }

    /// Reads `bit_count` bits as a two's complement, signed [`BitValue`].
    fn read_signed_bit_value(&mut self, bit_count: u32) -> Result<BitValue> {
        let raw = self.read_bits_128(bit_count)?;

        if bit_count <= u64::BITS {
            BitValue::new_signed(sign_extend(raw.low, bit_count), bit_count)
        } else {
            let shift = UInt128::BITS - bit_count;
            let value = Int128::from_bits(raw << shift) >> shift;
            BitValue::new_signed_128(value, bit_count)
        }
    }
}

/// Writing of bit fields to a sink, LSB first.
pub trait BitWrite {
    /// Writes the low `bit_count` bits of `value`, between 1 and 64.
    ///
    /// Bits of `value` beyond `bit_count` are ignored.
    fn write_bits(&mut self, value: u64, bit_count: u32) -> Result<()>;

    /// Writes the low `bit_count` bits of `value`, between 1 and 128.
    ///
    /// Fields wider than 64 bits are written as their low 64 bits first,
    /// followed by the remaining high bits.
    fn write_bits_128(&mut self, value: UInt128, bit_count: u32) -> Result<()>;

    /// Writes a [`bool`] as a single bit.
    #[inline]
    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_bits(value as u64, 1)
    }

    /// Writes a [`BitValue`] using its own bit count.
    #[inline]
    fn write_bit_value(&mut self, value: &BitValue) -> Result<()> {
        self.write_bit_value_as(value, value.bit_count())
    }

    /// Writes the two's complement bits of a [`BitValue`] using an
    /// explicit `bit_count` in place of the value's own.
    #[inline]
    fn write_bit_value_as(&mut self, value: &BitValue, bit_count: u32) -> Result<()> {
        self.write_bits_128(value.to_u128(), bit_count)
    }
}
