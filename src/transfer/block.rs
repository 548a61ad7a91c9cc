//! Block mode framing
//!
//! Each frame is a one-byte descriptor, a big-endian 16-bit payload length
//! and the payload itself. The stream ends with a single frame carrying the
//! EOF descriptor.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, ErrorKind, Read, Write};

use super::codec::CodecError;

/// Descriptor used for ordinary data frames.
pub const DATA_DESCRIPTOR: u8 = 0x00;
/// Descriptor bit marking the last frame of the stream.
pub const EOF_DESCRIPTOR: u8 = 0x40;
/// Largest payload a single frame can declare.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

/// Wraps a sink and emits one data frame per `write` call.
pub struct BlockWriter<W: Write> {
    inner: W,
    frames: u64,
}

impl<W: Write> BlockWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, frames: 0 }
    }

    /// Number of data frames written so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Writes the EOF frame and hands back the underlying sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.write_u8(EOF_DESCRIPTOR)?;
        self.inner.write_u16::<BigEndian>(0)?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for BlockWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // A zero-length data frame would read back as a framing error.
        if buf.is_empty() {
            return Ok(0);
        }

        let len = buf.len().min(MAX_PAYLOAD);
        self.inner.write_u8(DATA_DESCRIPTOR)?;
        self.inner.write_u16::<BigEndian>(len as u16)?;
        self.inner.write_all(&buf[..len])?;
        self.frames += 1;
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Pulls frame payloads off a source until the EOF frame.
pub struct BlockReader<R: Read> {
    inner: R,
    finished: bool,
}

impl<R: Read> BlockReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            finished: false,
        }
    }

    /// Returns the next payload, or `None` once the stream has ended.
    ///
    /// A source that closes cleanly on a frame boundary without ever sending
    /// the EOF frame is treated as a finished stream. Closing inside a header
    /// or a payload is an I/O error.
    pub fn next_payload(&mut self) -> Result<Option<Vec<u8>>, CodecError> {
        if self.finished {
            return Ok(None);
        }

        let descriptor = match self.read_descriptor()? {
            Some(descriptor) => descriptor,
            None => {
                self.finished = true;
                return Ok(None);
            }
        };
        let length = self.inner.read_u16::<BigEndian>()?;

        if descriptor & EOF_DESCRIPTOR != 0 {
            self.finished = true;
            if length == 0 {
                return Ok(None);
            }
            return self.read_payload(length).map(Some);
        }

        if length == 0 {
            return Err(CodecError::Framing { descriptor, length });
        }

        self.read_payload(length).map(Some)
    }

    fn read_descriptor(&mut self) -> Result<Option<u8>, CodecError> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read_payload(&mut self, length: u16) -> Result<Vec<u8>, CodecError> {
        let mut payload = vec![0u8; length as usize];
        self.inner.read_exact(&mut payload)?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most one byte per `read`, like a slow socket.
    struct Trickle<R>(R);

    impl<R: Read> Read for Trickle<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let len = buf.len().min(1);
            self.0.read(&mut buf[..len])
        }
    }

    #[test]
    fn test_writer_frames_each_write() {
        let mut writer = BlockWriter::new(Vec::new());
        writer.write_all(b"abc").unwrap();
        let out = writer.finish().unwrap();

        assert_eq!(out, vec![0x00, 0x00, 0x03, b'a', b'b', b'c', 0x40, 0x00, 0x00]);
    }

    #[test]
    fn test_empty_stream_is_only_eof_frame() {
        let writer = BlockWriter::new(Vec::new());
        let out = writer.finish().unwrap();

        assert_eq!(out, vec![0x40, 0x00, 0x00]);
    }

    #[test]
    fn test_oversized_write_is_split() {
        let data = vec![7u8; MAX_PAYLOAD + 10];
        let mut writer = BlockWriter::new(Vec::new());
        writer.write_all(&data).unwrap();
        assert_eq!(writer.frames(), 2);

        let out = writer.finish().unwrap();
        let mut reader = BlockReader::new(Cursor::new(out));
        assert_eq!(reader.next_payload().unwrap().unwrap().len(), MAX_PAYLOAD);
        assert_eq!(reader.next_payload().unwrap().unwrap().len(), 10);
        assert!(reader.next_payload().unwrap().is_none());
    }

    #[test]
    fn test_reader_stops_at_eof_frame() {
        let wire = vec![
            0x00, 0x00, 0x02, b'h', b'i', 0x40, 0x00, 0x00, 0x00, 0x00, 0x01, b'x',
        ];
        let mut reader = BlockReader::new(Cursor::new(wire));

        assert_eq!(reader.next_payload().unwrap(), Some(b"hi".to_vec()));
        assert_eq!(reader.next_payload().unwrap(), None);
        // Bytes after the EOF frame are never consumed.
        assert_eq!(reader.next_payload().unwrap(), None);
    }

    #[test]
    fn test_eof_frame_with_payload_is_delivered() {
        let wire = vec![0x40, 0x00, 0x02, b'o', b'k'];
        let mut reader = BlockReader::new(Cursor::new(wire));

        assert_eq!(reader.next_payload().unwrap(), Some(b"ok".to_vec()));
        assert_eq!(reader.next_payload().unwrap(), None);
    }

    #[test]
    fn test_zero_length_data_frame_is_framing_error() {
        let wire = vec![0x00, 0x00, 0x00];
        let mut reader = BlockReader::new(Cursor::new(wire));

        match reader.next_payload() {
            Err(CodecError::Framing { descriptor, length }) => {
                assert_eq!(descriptor, 0x00);
                assert_eq!(length, 0);
            }
            other => panic!("expected framing error, got {:?}", other),
        }
    }

    #[test]
    fn test_clean_close_without_eof_frame() {
        let wire = vec![0x00, 0x00, 0x01, b'z'];
        let mut reader = BlockReader::new(Cursor::new(wire));

        assert_eq!(reader.next_payload().unwrap(), Some(b"z".to_vec()));
        assert_eq!(reader.next_payload().unwrap(), None);
    }

    #[test]
    fn test_frames_split_across_reads() {
        let mut writer = BlockWriter::new(Vec::new());
        writer.write_all(b"first").unwrap();
        writer.write_all(b"second frame").unwrap();
        let wire = writer.finish().unwrap();

        let mut reader = BlockReader::new(Trickle(Cursor::new(wire)));

        assert_eq!(reader.next_payload().unwrap(), Some(b"first".to_vec()));
        assert_eq!(reader.next_payload().unwrap(), Some(b"second frame".to_vec()));
        assert_eq!(reader.next_payload().unwrap(), None);
    }

    #[test]
    fn test_truncated_payload_is_io_error() {
        let wire = vec![0x00, 0x00, 0x05, b'a', b'b'];
        let mut reader = BlockReader::new(Cursor::new(wire));

        assert!(matches!(reader.next_payload(), Err(CodecError::Io(_))));
    }
}
