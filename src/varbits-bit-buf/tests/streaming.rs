use std::{
    cell::{Cell, RefCell},
    io::{self, Cursor, Read, Write},
    rc::Rc,
};

use varbits_bit_buf::{
    BitBuffer, BitRead, BitStreamReader, BitStreamWriter, BitWrite, Error, UInt128,
    WriterOptions, MIN_CAPACITY,
};

const WIDE: UInt128 = UInt128::from_parts(0x7EDC_BA98_7654_3210, 0x0123_4567_89AB_CDEF);

// A source which hands out a single byte per call.
struct Trickle<'a>(&'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.split_first() {
            Some((&byte, rest)) if !buf.is_empty() => {
                buf[0] = byte;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

// A source which is interrupted before every successful read.
struct Interrupting {
    inner: Cursor<Vec<u8>>,
    interrupt: bool,
}

impl Read for Interrupting {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if self.interrupt {
            Err(io::ErrorKind::Interrupted.into())
        } else {
            self.inner.read(buf)
        }
    }
}

struct Broken;

impl Read for Broken {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("source is broken"))
    }
}

// A sink whose contents stay observable while a writer owns it.
#[derive(Clone, Default)]
struct SharedSink {
    data: Rc<RefCell<Vec<u8>>>,
    flushes: Rc<Cell<usize>>,
    fail: Rc<Cell<bool>>,
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail.get() {
            return Err(io::Error::other("sink is unavailable"));
        }

        self.data.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.fail.get() {
            return Err(io::Error::other("sink is unavailable"));
        }

        self.flushes.set(self.flushes.get() + 1);
        Ok(())
    }
}

fn write_pattern<W: BitWrite>(w: &mut W) -> Result<(), Error> {
    for i in 0..1000u64 {
        w.write_bits(i & 0xFF, 8)?;
    }

    w.write_bits(0b101, 3)?;
    w.write_bits(0b1_0011, 5)?;

    for i in 0..100u64 {
        w.write_bits(!i & 0xFF, 8)?;
    }

    w.write_bits_128(WIDE, 127)?;
    w.write_bool(true)?;

    Ok(())
}

fn check_pattern<R: BitRead>(r: &mut R) -> Result<(), Error> {
    for i in 0..1000u64 {
        assert_eq!(r.read_bits(8)?, i & 0xFF);
    }

    assert_eq!(r.read_bits(3)?, 0b101);
    assert_eq!(r.read_bits(5)?, 0b1_0011);

    for i in 0..100u64 {
        assert_eq!(r.read_bits(8)?, !i & 0xFF);
    }

    assert_eq!(r.read_bits_128(127)?, WIDE);
    assert!(r.read_bool()?);

    Ok(())
}

fn pattern_bytes() -> Result<Vec<u8>, Error> {
    let mut buf = BitBuffer::new();
    write_pattern(&mut buf)?;
    Ok(buf.into_inner())
}

#[test]
fn capacity_is_clamped() {
    let reader = BitStreamReader::with_capacity(io::empty(), 1);
    assert_eq!(reader.capacity(), MIN_CAPACITY);

    let reader = BitStreamReader::with_capacity(io::empty(), 16);
    assert_eq!(reader.capacity(), MIN_CAPACITY);

    let writer = BitStreamWriter::with_capacity(io::sink(), 0);
    assert_eq!(writer.capacity(), MIN_CAPACITY);

    let writer = BitStreamWriter::new(io::sink());
    assert_eq!(writer.capacity(), varbits_bit_buf::DEFAULT_CAPACITY);
}

#[test]
fn reader_is_independent_of_capacity() -> Result<(), Error> {
    let bytes = pattern_bytes()?;

    for capacity in [MIN_CAPACITY, 33, 4096] {
        let mut reader = BitStreamReader::with_capacity(Cursor::new(&bytes), capacity);
        check_pattern(&mut reader)?;
        assert!(reader.is_at_end()?);
    }

    Ok(())
}

#[test]
fn reader_tolerates_short_reads() -> Result<(), Error> {
    let bytes = pattern_bytes()?;

    let mut reader = BitStreamReader::with_capacity(Trickle(&bytes), MIN_CAPACITY);
    check_pattern(&mut reader)?;
    assert!(reader.is_at_end()?);

    let source = Interrupting {
        inner: Cursor::new(bytes),
        interrupt: false,
    };
    let mut reader = BitStreamReader::new(source);
    check_pattern(&mut reader)?;
    assert!(reader.is_at_end()?);

    Ok(())
}

#[test]
fn reads_past_the_end_are_atomic() -> Result<(), Error> {
    let mut reader = BitStreamReader::new(Cursor::new(vec![0xFF, 0x01]));

    assert_eq!(reader.read_bits(12)?, 0x1FF);
    assert!(matches!(reader.read_bits(8), Err(Error::EndOfStream)));
    assert_eq!(reader.buffered_bits(), 4);

    assert_eq!(reader.read_bits(4)?, 0);
    assert!(reader.is_at_end()?);
    assert!(matches!(reader.read_bool(), Err(Error::EndOfStream)));

    Ok(())
}

#[test]
fn empty_source() -> Result<(), Error> {
    let mut reader = BitStreamReader::new(io::empty());

    assert!(reader.is_at_end()?);
    assert!(matches!(reader.read_bits_128(1), Err(Error::EndOfStream)));

    Ok(())
}

#[test]
fn source_errors_are_propagated() {
    let mut reader = BitStreamReader::new(Broken);

    assert!(matches!(reader.read_bits(8), Err(Error::Io(_))));
    assert!(matches!(reader.is_at_end(), Err(Error::Io(_))));
}

#[test]
fn reader_hands_back_its_source() -> Result<(), Error> {
    let mut reader = BitStreamReader::new(Cursor::new(vec![0x0F, 0xF0]));

    assert_eq!(reader.read_bits(4)?, 0xF);
    assert_eq!(reader.get_ref().position(), 2);

    let source = reader.into_inner();
    assert_eq!(source.into_inner(), &[0x0F, 0xF0]);

    Ok(())
}

#[test]
fn writer_matches_buffer_for_any_capacity() -> Result<(), Error> {
    let expected = pattern_bytes()?;

    for capacity in [MIN_CAPACITY, 33, 4096] {
        let mut out = Vec::new();

        let mut writer = BitStreamWriter::with_capacity(&mut out, capacity);
        write_pattern(&mut writer)?;
        writer.flush()?;
        drop(writer);

        assert_eq!(out, expected);
    }

    Ok(())
}

#[test]
fn writer_flushes_lazily() -> Result<(), Error> {
    let sink = SharedSink::default();
    let mut writer = BitStreamWriter::with_capacity(sink.clone(), MIN_CAPACITY);

    for _ in 0..MIN_CAPACITY {
        writer.write_bits(0xAA, 8)?;
    }
    assert!(sink.data.borrow().is_empty());

    // The next field no longer fits, so the full buffer goes out.
    writer.write_bits(0x55, 8)?;
    assert_eq!(*sink.data.borrow(), [0xAA; MIN_CAPACITY]);
    assert_eq!(writer.bits_written(), (MIN_CAPACITY + 1) * 8);

    Ok(())
}

#[test]
fn flush_pads_and_is_idempotent() -> Result<(), Error> {
    let sink = SharedSink::default();
    let mut writer = BitStreamWriter::new(sink.clone());

    writer.write_bits(0b101, 3)?;
    assert_eq!(writer.bits_written(), 3);
    assert!(sink.data.borrow().is_empty());

    writer.flush()?;
    assert_eq!(*sink.data.borrow(), [0b101]);
    assert_eq!(writer.bits_written(), 8);

    writer.flush()?;
    assert_eq!(*sink.data.borrow(), [0b101]);
    assert_eq!(sink.flushes.get(), 2);

    // Writing resumes on a fresh byte.
    writer.write_bits(0xF, 4)?;
    writer.flush()?;
    assert_eq!(*sink.data.borrow(), [0b101, 0x0F]);

    Ok(())
}

#[test]
fn failed_flush_can_be_retried() -> Result<(), Error> {
    let sink = SharedSink::default();
    let mut writer = BitStreamWriter::new(sink.clone());

    writer.write_bits(0x3FF, 10)?;

    sink.fail.set(true);
    assert!(matches!(writer.flush(), Err(Error::Io(_))));
    assert_eq!(writer.bits_written(), 10);

    sink.fail.set(false);
    writer.write_bits(0b11, 2)?;
    writer.flush()?;

    assert_eq!(*sink.data.borrow(), [0xFF, 0x0F]);

    Ok(())
}

#[test]
fn close_honors_leave_open() -> Result<(), Error> {
    let options = WriterOptions {
        leave_open: true,
        ..Default::default()
    };
    let mut writer = BitStreamWriter::with_options(Vec::new(), options);
    writer.write_bits(0x1234, 16)?;
    assert_eq!(writer.close()?, Some(vec![0x34, 0x12]));

    let sink = SharedSink::default();
    let mut writer = BitStreamWriter::new(sink.clone());
    writer.write_bits(0x1234, 13)?;
    assert!(writer.close()?.is_none());

    assert_eq!(*sink.data.borrow(), [0x34, 0x12]);
    assert_eq!(sink.flushes.get(), 1);

    Ok(())
}

#[test]
fn drop_flushes_pending_bits() -> Result<(), Error> {
    let sink = SharedSink::default();

    {
        let mut writer = BitStreamWriter::new(sink.clone());
        writer.write_bits(0x1F, 5)?;
    }
    assert_eq!(*sink.data.borrow(), [0x1F]);

    // Errors while dropping are swallowed.
    sink.fail.set(true);
    {
        let mut writer = BitStreamWriter::new(sink.clone());
        writer.write_bits(0x1F, 5)?;
    }
    assert_eq!(*sink.data.borrow(), [0x1F]);

    Ok(())
}

#[test]
fn wide_fields_through_streams() -> Result<(), Error> {
    let mut out = Vec::new();

    let mut writer = BitStreamWriter::with_capacity(&mut out, MIN_CAPACITY);
    for bit_count in 1..=128 {
        writer.write_bool(bit_count & 1 != 0)?;
        writer.write_bits_128(WIDE, bit_count)?;
    }
    writer.flush()?;
    drop(writer);

    let mut reader = BitStreamReader::with_capacity(Cursor::new(out), MIN_CAPACITY);
    for bit_count in 1..=128 {
        assert_eq!(reader.read_bool()?, bit_count & 1 != 0);
        assert_eq!(reader.read_bits_128(bit_count)?, WIDE.low_bits(bit_count));
    }

    assert!(reader.is_at_end()?);

    Ok(())
}
