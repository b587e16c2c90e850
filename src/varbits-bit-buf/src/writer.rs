use std::io::Write;

use varbits_utils::{align::align_up, bits::bits_to_bytes, hints::unlikely};
use varbits_wide::UInt128;

use crate::{
    error::{check_bit_count, Result},
    packing, BitWrite, DEFAULT_CAPACITY, MAX_NARROW_BITS, MAX_WIDE_BITS, MIN_CAPACITY,
};

/// Configuration for a [`BitStreamWriter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriterOptions {
    /// The size of the internal buffer in bytes.
    ///
    /// Values below [`MIN_CAPACITY`] are rounded up to it.
    pub capacity: usize,

    /// Whether [`BitStreamWriter::close`] hands the sink back to the
    /// caller instead of dropping it.
    ///
    /// A writer that is dropped without being closed always drops its
    /// sink. Pass a `&mut W` to keep the sink alive in that case.
    pub leave_open: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            leave_open: false,
        }
    }
}

/// A forward-only bit writer over a byte sink.
///
/// Whole bytes are collected in an internal buffer and handed to the
/// sink once the next field no longer fits, or on [`BitStreamWriter::flush`].
/// The output is byte-identical to that of a [`BitBuffer`][crate::BitBuffer]
/// fed with the same calls, regardless of the buffer capacity.
///
/// Dropping the writer flushes it on a best-effort basis and drops the
/// sink along with it. Use [`BitStreamWriter::close`] to observe errors.
#[derive(Debug)]
pub struct BitStreamWriter<W: Write> {
    // The byte sink, present until the writer is closed.
    inner: Option<W>,

    // The buffer of pending output. Bytes past the cursor are zero.
    buf: Box<[u8]>,

    // The write cursor as a bit position into `buf`.
    pos: usize,

    // How many bytes were handed to the sink so far.
    flushed: usize,

    leave_open: bool,
}

impl<W: Write> BitStreamWriter<W> {
    /// Creates a writer to `inner` with the default configuration.
    pub fn new(inner: W) -> Self {
        Self::with_options(inner, WriterOptions::default())
    }

    /// Creates a writer to `inner` with a buffer of `capacity` bytes.
    pub fn with_capacity(inner: W, capacity: usize) -> Self {
        Self::with_options(
            inner,
            WriterOptions {
                capacity,
                ..Default::default()
            },
        )
    }

    /// Creates a writer to `inner` with the given options.
    pub fn with_options(inner: W, options: WriterOptions) -> Self {
        Self {
            inner: Some(inner),
            buf: vec![0; options.capacity.max(MIN_CAPACITY)].into_boxed_slice(),
            pos: 0,
            flushed: 0,
            leave_open: options.leave_open,
        }
    }

    /// Gets the capacity of the internal buffer in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Gets the total number of bits written, including those still
    /// waiting in the buffer and any flush padding.
    #[inline]
    pub fn bits_written(&self) -> usize {
        (self.flushed << 3) + self.pos
    }

    /// Writes all pending bits to the sink and flushes it.
    ///
    /// A trailing partial byte is written with its unused high bits
    /// set to zero, and the next write starts on a fresh byte.
    /// Flushing again without writing in between only flushes the sink.
    ///
    /// On failure, the pending bits stay buffered and the call can
    /// be retried.
    pub fn flush(&mut self) -> Result<()> {
        let pos = self.pos;
        self.pos = align_up(pos, u8::BITS as usize);

        if let Err(e) = self.flush_buffer() {
            self.pos = pos;
            return Err(e);
        }

        if let Some(inner) = self.inner.as_mut() {
            inner.flush()?;
        }

        Ok(())
    }

    /// Flushes the writer and closes it.
    ///
    /// The sink is returned when the writer was configured to leave it
    /// open, and dropped otherwise.
    pub fn close(mut self) -> Result<Option<W>> {
        self.flush()?;

        let inner = self.inner.take();
        Ok(if self.leave_open { inner } else { None })
    }

    // Flushes the buffer if a field of `nbits` bits would not fit anymore.
    fn reserve(&mut self, nbits: u32) -> Result<()> {
        if unlikely(bits_to_bytes(self.pos + nbits as usize) > self.buf.len()) {
            self.flush_buffer()?;
        }

        Ok(())
    }

    // Hands all whole bytes in the buffer to the sink and moves a
    // trailing partial byte to the front.
    fn flush_buffer(&mut self) -> Result<()> {
        let whole = self.pos >> 3;
        let Some(inner) = self.inner.as_mut() else {
            return Ok(());
        };

        if whole == 0 {
            return Ok(());
        }

        inner.write_all(&self.buf[..whole])?;
        log::trace!("Flushed {whole} bytes from writer buffer");

        let partial = if self.pos & 7 != 0 { self.buf[whole] } else { 0 };
        self.buf.fill(0);
        self.buf[0] = partial;

        self.flushed += whole;
        self.pos &= 7;

        Ok(())
    }
}

impl<W: Write> BitWrite for BitStreamWriter<W> {
    fn write_bits(&mut self, value: u64, bit_count: u32) -> Result<()> {
        check_bit_count(bit_count, MAX_NARROW_BITS)?;
        self.reserve(bit_count)?;

        packing::put_bits(&mut self.buf, self.pos, value, bit_count);
        self.pos += bit_count as usize;

        Ok(())
    }

    fn write_bits_128(&mut self, value: UInt128, bit_count: u32) -> Result<()> {
        check_bit_count(bit_count, MAX_WIDE_BITS)?;
        self.reserve(bit_count)?;

        packing::put_bits_128(&mut self.buf, self.pos, value, bit_count);
        self.pos += bit_count as usize;

        Ok(())
    }
}

impl<W: Write> Drop for BitStreamWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            if let Err(e) = self.flush() {
                log::warn!("Failed to flush bit stream writer on drop: {e}");
            }
        }
    }
}
