//! Branch hints for the hot paths of the codec.

/// Marks the calling path as rarely taken.
///
/// Stands in for [`std::hint::cold_path`] until that is stabilized.
#[cold]
#[inline(always)]
pub fn cold_path() {}

/// Hints that `cond` is usually `false` and returns it unchanged.
#[inline(always)]
pub fn unlikely(cond: bool) -> bool {
    if cond {
        cold_path();
    }
    cond
}
