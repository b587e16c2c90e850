//! Alignment helpers for bit and byte offsets.

/// Aligns `value` up to the next multiple of `align`.
///
/// Values which are already aligned are returned unchanged.
///
/// # Panics
///
/// Panics in debug mode when `align` is not a power of two.
#[inline(always)]
pub const fn align_up(value: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (value + (align - 1)) & !(align - 1)
}
