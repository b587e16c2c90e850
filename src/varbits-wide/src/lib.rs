//! 128-bit integer arithmetic built from two 64-bit words.
//!
//! [`UInt128`] and [`Int128`] model wide values as a `(high, low)`
//! pair instead of relying on a native 128-bit primitive. This keeps
//! the word split explicit, which is exactly the layout the bit codec
//! uses when it moves wide fields: low word first, then the high word.
//!
//! All arithmetic wraps on overflow, mirroring the `wrapping_*` family
//! of methods on native integers.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

macro_rules! impl_assign_ops {
    ($ty:ty => $($assign_trait:ident::$assign_fn:ident = $op_trait:ident::$op_fn:ident($rhs:ty)),* $(,)?) => {
        $(
            impl std::ops::$assign_trait<$rhs> for $ty {
                #[inline]
                fn $assign_fn(&mut self, rhs: $rhs) {
                    *self = std::ops::$op_trait::$op_fn(*self, rhs);
                }
            }
        )*
    };
}

mod int;
pub use int::Int128;

mod uint;
pub use uint::UInt128;
