use std::io::{self, Read};

use varbits_utils::hints::unlikely;
use varbits_wide::UInt128;

use crate::{
    error::{check_bit_count, Error, Result},
    packing, BitRead, DEFAULT_CAPACITY, MAX_NARROW_BITS, MAX_WIDE_BITS, MIN_CAPACITY,
};

/// Configuration for a [`BitStreamReader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReaderOptions {
    /// The size of the internal buffer in bytes.
    ///
    /// Values below [`MIN_CAPACITY`] are rounded up to it.
    pub capacity: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// A forward-only bit reader over a byte source.
///
/// Data is pulled from the source in chunks of up to the buffer
/// capacity. A read only fails with [`Error::EndOfStream`] once the
/// source returned `0` bytes, so short reads from the source are
/// transparently retried.
///
/// Dropping the reader drops the source along with it. Pass a
/// `&mut R` to keep using the source afterwards.
#[derive(Debug)]
pub struct BitStreamReader<R> {
    // The byte source being read from.
    inner: R,

    // The buffer with data pulled from the source.
    buf: Box<[u8]>,

    // How many bytes at the start of `buf` are valid.
    filled: usize,

    // The read cursor as a bit position into `buf`.
    pos: usize,

    // Whether the source reported the end of its data.
    eof: bool,
}

impl<R: Read> BitStreamReader<R> {
    /// Creates a reader over `inner` with the default configuration.
    pub fn new(inner: R) -> Self {
        Self::with_options(inner, ReaderOptions::default())
    }

    /// Creates a reader over `inner` with a buffer of `capacity` bytes.
    pub fn with_capacity(inner: R, capacity: usize) -> Self {
        Self::with_options(inner, ReaderOptions { capacity })
    }

    /// Creates a reader over `inner` with the given options.
    pub fn with_options(inner: R, options: ReaderOptions) -> Self {
        Self {
            inner,
            buf: vec![0; options.capacity.max(MIN_CAPACITY)].into_boxed_slice(),
            filled: 0,
            pos: 0,
            eof: false,
        }
    }

    /// Gets the capacity of the internal buffer in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Gets the number of bits which can be read without touching
    /// the source.
    #[inline]
    pub fn buffered_bits(&self) -> usize {
        (self.filled << 3) - self.pos
    }

    /// Indicates if every bit of the source has been consumed.
    ///
    /// When the buffer is drained, this asks the source for more data
    /// to find out, which is why it may block or fail.
    pub fn is_at_end(&mut self) -> Result<bool> {
        if self.buffered_bits() != 0 {
            return Ok(false);
        }

        if !self.eof {
            self.fill_buffer()?;
        }

        Ok(self.buffered_bits() == 0)
    }

    /// Gets a reference to the underlying source.
    #[inline]
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Consumes the reader and returns the underlying source.
    ///
    /// Any data which was already pulled into the buffer is lost.
    #[inline]
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Consumes the reader and closes the underlying source by
    /// dropping it.
    #[inline]
    pub fn close(self) {
        drop(self);
    }

    // Pulls data from the source until at least `nbits` bits are buffered.
    fn ensure(&mut self, nbits: u32) -> Result<()> {
        while unlikely(self.buffered_bits() < nbits as usize) {
            if self.eof {
                return Err(Error::EndOfStream);
            }

            self.fill_buffer()?;
        }

        Ok(())
    }

    // Performs one read from the source into the free part of the buffer.
    fn fill_buffer(&mut self) -> Result<()> {
        // Move the unread bytes, including a partially consumed one,
        // to the front to make room.
        let start = self.pos >> 3;
        self.buf.copy_within(start..self.filled, 0);
        self.filled -= start;
        self.pos &= 7;

        let read = loop {
            match self.inner.read(&mut self.buf[self.filled..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        if read == 0 {
            log::debug!("Reached end of source with {} bits left", self.buffered_bits());
            self.eof = true;
        } else {
            log::trace!("Refilled reader buffer with {read} bytes");
            self.filled += read;
        }

        Ok(())
    }
}

impl<R: Read> BitRead for BitStreamReader<R> {
    fn read_bits(&mut self, bit_count: u32) -> Result<u64> {
        check_bit_count(bit_count, MAX_NARROW_BITS)?;
        self.ensure(bit_count)?;

        let value = packing::get_bits(&self.buf[..self.filled], self.pos, bit_count);
        self.pos += bit_count as usize;

        Ok(value)
    }

    fn read_bits_128(&mut self, bit_count: u32) -> Result<UInt128> {
        check_bit_count(bit_count, MAX_WIDE_BITS)?;
        self.ensure(bit_count)?;

        let value = packing::get_bits_128(&self.buf[..self.filled], self.pos, bit_count);
        self.pos += bit_count as usize;

        Ok(value)
    }
}
