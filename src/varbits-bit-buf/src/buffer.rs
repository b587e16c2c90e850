use varbits_utils::{align::align_up, bits::bits_to_bytes};
use varbits_wide::UInt128;

use crate::{
    error::{check_bit_count, Error, Result},
    packing, BitRead, BitWrite, MAX_NARROW_BITS, MAX_WIDE_BITS,
};

/// A growable, in-memory bit container with a random access cursor.
///
/// Reads and writes happen at the cursor and advance it. Writing past
/// the current end extends the data; writing before it overwrites
/// exactly the addressed bits.
///
/// The cursor never exceeds [`BitBuffer::len`], and the backing storage
/// always holds exactly as many bytes as are needed for it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitBuffer {
    // The backing bytes, `bits_to_bytes(len)` of them.
    inner: Vec<u8>,

    // The cursor as an absolute bit position.
    pos: usize,

    // The number of valid bits.
    len: usize,
}

impl BitBuffer {
    /// Creates an empty [`BitBuffer`].
    pub const fn new() -> Self {
        Self {
            inner: Vec::new(),
            pos: 0,
            len: 0,
        }
    }

    /// Creates an empty [`BitBuffer`] with room for at least `nbytes`
    /// bytes before reallocating.
    pub fn with_capacity(nbytes: usize) -> Self {
        Self {
            inner: Vec::with_capacity(nbytes),
            pos: 0,
            len: 0,
        }
    }

    /// Creates a [`BitBuffer`] over existing bytes, with the cursor at
    /// the start and every bit of `vec` considered valid.
    pub fn from_vec(vec: Vec<u8>) -> Self {
        let len = vec.len() << 3;
        Self {
            inner: vec,
            pos: 0,
            len,
        }
    }

    /// Gets the cursor position in bits.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor to the absolute bit position `pos`.
    ///
    /// Fails with [`Error::EndOfStream`] when `pos` is past the end.
    pub fn set_position(&mut self, pos: usize) -> Result<()> {
        if pos > self.len {
            return Err(Error::EndOfStream);
        }

        self.pos = pos;
        Ok(())
    }

    /// Moves the cursor back to the start of the data.
    #[inline]
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Removes all data and resets the cursor, keeping the allocation.
    pub fn clear(&mut self) {
        self.inner.clear();
        self.pos = 0;
        self.len = 0;
    }

    /// Gets the number of valid bits in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Indicates if the buffer doesn't contain any bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Gets the number of bits between the cursor and the end.
    #[inline]
    pub fn remaining_bits(&self) -> usize {
        self.len - self.pos
    }

    /// Indicates if the cursor has reached the end of the data.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.len
    }

    /// Advances the cursor to the next byte boundary, or to the end of
    /// the data if that comes first.
    pub fn align_to_byte(&mut self) {
        self.pos = align_up(self.pos, u8::BITS as usize).min(self.len);
    }

    /// Reserves capacity for at least `nbytes` more bytes.
    #[inline]
    pub fn reserve(&mut self, nbytes: usize) {
        self.inner.reserve(nbytes);
    }

    /// Gets a view of the buffer's storage as a byte slice.
    ///
    /// Unused high bits of a trailing partial byte are zero unless they
    /// were supplied through [`BitBuffer::from_vec`].
    #[inline]
    pub fn view(&self) -> &[u8] {
        &self.inner
    }

    /// Consumes the [`BitBuffer`] and returns the byte storage.
    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.inner
    }

    // Makes sure the `nbits` following the cursor are backed by storage
    // and counted as valid.
    fn grow_for(&mut self, nbits: u32) {
        let end = self.pos + nbits as usize;
        if end > self.len {
            self.inner.resize(bits_to_bytes(end), 0);
            self.len = end;
        }
    }

    fn ensure_remaining(&self, nbits: u32) -> Result<()> {
        if nbits as usize <= self.remaining_bits() {
            Ok(())
        } else {
            Err(Error::EndOfStream)
        }
    }
}

impl From<Vec<u8>> for BitBuffer {
    #[inline]
    fn from(vec: Vec<u8>) -> Self {
        Self::from_vec(vec)
    }
}

impl From<&[u8]> for BitBuffer {
    #[inline]
    fn from(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }
}

impl From<BitBuffer> for Vec<u8> {
    #[inline]
    fn from(buf: BitBuffer) -> Self {
        buf.into_inner()
    }
}

impl BitRead for BitBuffer {
    fn read_bits(&mut self, bit_count: u32) -> Result<u64> {
        check_bit_count(bit_count, MAX_NARROW_BITS)?;
        self.ensure_remaining(bit_count)?;

        let value = packing::get_bits(&self.inner, self.pos, bit_count);
        self.pos += bit_count as usize;

        Ok(value)
    }

    fn read_bits_128(&mut self, bit_count: u32) -> Result<UInt128> {
        check_bit_count(bit_count, MAX_WIDE_BITS)?;
        self.ensure_remaining(bit_count)?;

        let value = packing::get_bits_128(&self.inner, self.pos, bit_count);
        self.pos += bit_count as usize;

        Ok(value)
    }
}

impl BitWrite for BitBuffer {
    fn write_bits(&mut self, value: u64, bit_count: u32) -> Result<()> {
        check_bit_count(bit_count, MAX_NARROW_BITS)?;
        self.grow_for(bit_count);

        packing::put_bits(&mut self.inner, self.pos, value, bit_count);
        self.pos += bit_count as usize;

        Ok(())
    }

    fn write_bits_128(&mut self, value: UInt128, bit_count: u32) -> Result<()> {
        check_bit_count(bit_count, MAX_WIDE_BITS)?;
        self.grow_for(bit_count);

        packing::put_bits_128(&mut self.inner, self.pos, value, bit_count);
        self.pos += bit_count as usize;

        Ok(())
    }
}
