//! The LSB-first packing rule shared by all bit containers.
//!
//! Positions are absolute bit offsets into a byte slice, where bit `n`
//! lives in byte `n / 8` at bit index `n % 8` counted from the LSB.
//! Callers are responsible for bounds: every addressed bit must lie
//! within the given slice.

use varbits_utils::bits::mask;
use varbits_wide::UInt128;

/// Reads `nbits` (at most 64) bits starting at bit `pos`.
///
/// The first bit read becomes bit 0 of the result.
pub(crate) fn get_bits(bytes: &[u8], pos: usize, nbits: u32) -> u64 {
    debug_assert!(nbits <= u64::BITS);
    debug_assert!(pos + nbits as usize <= bytes.len() << 3);

    let mut value = 0;
    let mut done = 0;

    let mut byte = pos >> 3;
    let mut bit = (pos & 7) as u32;

    while done < nbits {
        let take = (u8::BITS - bit).min(nbits - done);
        let chunk = (bytes[byte] >> bit) as u64 & mask(take);

        value |= chunk << done;
        done += take;

        bit += take;
        if bit == u8::BITS {
            byte += 1;
            bit = 0;
        }
    }

    value
}

/// Writes the low `nbits` (at most 64) bits of `value` starting at bit
/// `pos`, leaving every other bit of the touched bytes intact.
pub(crate) fn put_bits(bytes: &mut [u8], pos: usize, value: u64, nbits: u32) {
    debug_assert!(nbits <= u64::BITS);
    debug_assert!(pos + nbits as usize <= bytes.len() << 3);

    let mut done = 0;

    let mut byte = pos >> 3;
    let mut bit = (pos & 7) as u32;

    while done < nbits {
        let take = (u8::BITS - bit).min(nbits - done);
        let slot = (mask(take) as u8) << bit;
        let chunk = ((value >> done) & mask(take)) as u8;

        bytes[byte] = (bytes[byte] & !slot) | (chunk << bit);
        done += take;

        bit += take;
        if bit == u8::BITS {
            byte += 1;
            bit = 0;
        }
    }
}

/// Reads a field of up to 128 bits: the low word first, then the
/// remaining high bits.
pub(crate) fn get_bits_128(bytes: &[u8], pos: usize, nbits: u32) -> UInt128 {
    if nbits <= u64::BITS {
        UInt128::from_u64(get_bits(bytes, pos, nbits))
    } else {
        let low = get_bits(bytes, pos, u64::BITS);
        let high = get_bits(bytes, pos + u64::BITS as usize, nbits - u64::BITS);
        UInt128::from_parts(high, low)
    }
}

/// Writes a field of up to 128 bits: the low word first, then the
/// remaining high bits.
pub(crate) fn put_bits_128(bytes: &mut [u8], pos: usize, value: UInt128, nbits: u32) {
    let value = value.low_bits(nbits);

    if nbits <= u64::BITS {
        put_bits(bytes, pos, value.low, nbits);
    } else {
        put_bits(bytes, pos, value.low, u64::BITS);
        put_bits(bytes, pos + u64::BITS as usize, value.high, nbits - u64::BITS);
    }
}
