//! Transfer codec
//!
//! Moves bytes between a local source/sink and the data connection according
//! to the session's [`TransferParams`]. Everything here works over blocking
//! `std::io` traits so the same code serves the server, the client and the
//! unit tests.

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::debug;
use std::io::{self, BufRead, BufReader, ErrorKind, Read, Write};
use thiserror::Error;

use super::block::{BlockReader, BlockWriter, MAX_PAYLOAD};
use super::modes::{DataType, TransferMode, TransferParams};

/// Failures while encoding or decoding a transfer.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid block frame (descriptor {descriptor:#04x}, length {length})")]
    Framing { descriptor: u8, length: u16 },

    #[error("transfer I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Reads `source` to exhaustion and writes it to `sink` in wire form.
///
/// Returns the number of payload bytes taken from the source. The sink is
/// flushed but not closed; the caller owns the data connection.
pub fn encode<R: Read, W: Write>(
    params: &TransferParams,
    source: R,
    mut sink: W,
    chunk_size: usize,
) -> Result<u64, CodecError> {
    let chunk_size = clamp_chunk(chunk_size);

    if params.is_line_oriented() {
        let total = copy_lines(source, &mut sink)?;
        sink.flush()?;
        return Ok(total);
    }

    let mask = params.data_type == DataType::Ascii;
    let total = match params.mode {
        TransferMode::Stream => {
            let total = copy_chunks(source, &mut sink, chunk_size, mask)?;
            sink.flush()?;
            total
        }
        TransferMode::Block => {
            let mut framed = BlockWriter::new(sink);
            let total = copy_chunks(source, &mut framed, chunk_size, mask)?;
            debug!("Block encoder wrote {} data frame(s)", framed.frames());
            framed.finish()?;
            total
        }
        TransferMode::Compressed => {
            let mut compressed = GzEncoder::new(sink, Compression::default());
            let total = copy_chunks(source, &mut compressed, chunk_size, mask)?;
            compressed.finish()?.flush()?;
            total
        }
    };

    Ok(total)
}

/// Reads wire-form data from `source` until the stream ends and writes the
/// recovered payload to `sink`.
///
/// Returns the number of payload bytes written to the sink.
pub fn decode<R: Read, W: Write>(
    params: &TransferParams,
    source: R,
    mut sink: W,
    chunk_size: usize,
) -> Result<u64, CodecError> {
    let chunk_size = clamp_chunk(chunk_size);

    if params.is_line_oriented() {
        let total = copy_lines(source, &mut sink)?;
        sink.flush()?;
        return Ok(total);
    }

    let mask = params.data_type == DataType::Ascii;
    let total = match params.mode {
        TransferMode::Stream => copy_chunks(source, &mut sink, chunk_size, mask)?,
        TransferMode::Block => {
            let mut frames = BlockReader::new(source);
            let mut total = 0u64;
            while let Some(mut payload) = frames.next_payload()? {
                if mask {
                    strip_high_bit(&mut payload);
                }
                sink.write_all(&payload)?;
                total += payload.len() as u64;
            }
            total
        }
        TransferMode::Compressed => {
            copy_chunks(GzDecoder::new(source), &mut sink, chunk_size, mask)?
        }
    };

    sink.flush()?;
    Ok(total)
}

/// Clears the high bit of every byte. Lossy for anything outside 7-bit ASCII.
pub fn strip_high_bit(buf: &mut [u8]) {
    for b in buf.iter_mut() {
        *b &= 0x7F;
    }
}

fn clamp_chunk(chunk_size: usize) -> usize {
    chunk_size.clamp(1, MAX_PAYLOAD)
}

fn copy_chunks<R: Read, W: Write>(
    mut source: R,
    sink: &mut W,
    chunk_size: usize,
    mask: bool,
) -> io::Result<u64> {
    let mut buffer = vec![0u8; chunk_size];
    let mut total = 0u64;

    loop {
        let n = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        if mask {
            strip_high_bit(&mut buffer[..n]);
        }
        sink.write_all(&buffer[..n])?;
        total += n as u64;
    }

    Ok(total)
}

/// Line-oriented copy: each line loses its `\n` (and a preceding `\r`) and
/// is written back followed by a single `\n`.
fn copy_lines<R: Read, W: Write>(source: R, sink: &mut W) -> io::Result<u64> {
    let mut reader = BufReader::new(source);
    let mut line = Vec::new();
    let mut total = 0u64;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }

        sink.write_all(&line)?;
        sink.write_all(b"\n")?;
        total += line.len() as u64 + 1;
    }

    Ok(total)
}
