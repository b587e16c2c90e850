use std::io;

use thiserror::Error;

/// Errors that may occur during bit-level (de)serialization.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested number of bits is outside the range supported by
    /// an operation.
    #[error("invalid bit count {count}: expected a value between 1 and {max}")]
    InvalidBitCount { count: u32, max: u32 },

    /// Not enough bits are left to satisfy a read, or a position was
    /// requested past the end of the data.
    #[error("reached end of stream")]
    EndOfStream,

    /// The underlying byte source or sink reported an error.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// A negative value was converted to an unsigned integer type.
    #[error("cannot convert a negative value to an unsigned integer")]
    InvalidConversion,

    /// The parts of a [`BitValue`][crate::BitValue] do not describe a
    /// value its constructors could produce.
    #[error("storage does not hold a valid {bit_count}-bit value")]
    InvalidValue { bit_count: u32 },
}

/// A specialized [`Result`][std::result::Result] type for bit operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[inline]
pub(crate) fn check_bit_count(count: u32, max: u32) -> Result<()> {
    if count != 0 && count <= max {
        Ok(())
    } else {
        Err(Error::InvalidBitCount { count, max })
    }
}
