//! Miscellaneous utilities for working with bits.

/// Builds a mask covering the low `nbits` bits of a [`u64`].
///
/// Any `nbits` of 64 or more yields a mask with all bits set.
#[inline]
pub const fn mask(nbits: u32) -> u64 {
    if nbits >= u64::BITS {
        u64::MAX
    } else {
        (1 << nbits) - 1
    }
}

/// Sign-extends an `nbits` wide value to [`i64`].
///
/// `nbits` must be in the range `1..=64`.
#[inline]
pub fn sign_extend(value: u64, nbits: u32) -> i64 {
    debug_assert!(nbits != 0 && nbits <= u64::BITS);

    let shift = u64::BITS - nbits;
    (value << shift) as i64 >> shift
}

/// Computes how many bytes are needed to store `bits` bits.
#[inline]
pub const fn bits_to_bytes(bits: usize) -> usize {
    bits.div_ceil(u8::BITS as usize)
}
