//! Provides bit-level serialization and deserialization of data.
//!
//! Every operation in this crate packs bits starting at a byte's LSB,
//! working towards the MSB, and moves through bytes in ascending order.
//! Fields wider than 64 bits are split into their low 64 bits, which
//! come first, followed by the remaining high bits.
//!
//! The same layout is produced by all the components:
//!
//! - [`BitBuffer`] is an in-memory, growable container with a cursor
//!   that can be moved freely.
//!
//! - [`BitStreamReader`] and [`BitStreamWriter`] adapt any
//!   [`std::io::Read`] or [`std::io::Write`] implementation and exchange
//!   data with it in whole chunks of an internal buffer.
//!
//! Reading and writing is done through the [`BitRead`] and [`BitWrite`]
//! traits. Field transfers are atomic: a failed call never consumes or
//! commits part of the requested bits.
//!
//! [`BitValue`] tags an integer with its declared width and signedness
//! so that typed fields can travel through the codec as a unit.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use varbits_wide::{Int128, UInt128};

mod buffer;
pub use buffer::BitBuffer;

mod error;
pub use error::{Error, Result};

mod traits;
pub use traits::{BitRead, BitWrite};

mod packing;

mod reader;
pub use reader::{BitStreamReader, ReaderOptions};

mod value;
pub use value::{BitValue, Storage};

mod writer;
pub use writer::{BitStreamWriter, WriterOptions};

/// The buffer capacity in bytes used by streaming adapters unless
/// configured otherwise.
pub const DEFAULT_CAPACITY: usize = 4096;

/// The smallest buffer capacity in bytes a streaming adapter will use.
///
/// This is enough to hold a 128-bit field starting at any bit offset
/// within a byte. Smaller configured capacities are rounded up to it.
pub const MIN_CAPACITY: usize = 17;

/// The maximum number of bits in a single narrow transfer.
pub(crate) const MAX_NARROW_BITS: u32 = u64::BITS;

/// The maximum number of bits in a single wide transfer.
pub(crate) const MAX_WIDE_BITS: u32 = UInt128::BITS;
