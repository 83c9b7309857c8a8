//! Low-level byte I/O primitives shared by the container readers/writers and
//! the column codecs.
//!
//! All multi-byte integers in headers, framing and codec payloads are
//! big-endian. `ByteWriter` wraps any `std::io::Write` (file, socket,
//! `Vec<u8>` payload buffer); `ByteReader` wraps any `std::io::Read`
//! (file, `&[u8]` payload slice). A source that ends mid-field surfaces as
//! `HybfError::Truncated` naming the field; every other I/O failure passes
//! through as `HybfError::Io`.

use std::io::{self, Read, Write};

use crate::error::HybfError;

//==================================================================================
// 1. ByteWriter
//==================================================================================

/// Big-endian writer over an arbitrary byte sink.
#[derive(Debug)]
pub struct ByteWriter<W: Write> {
    sink: W,
}

impl<W: Write> ByteWriter<W> {
    pub fn new(sink: W) -> Self {
        ByteWriter { sink }
    }

    pub fn write_u8(&mut self, v: u8) -> Result<(), HybfError> {
        self.sink.write_all(&[v])?;
        Ok(())
    }

    pub fn write_u16(&mut self, v: u16) -> Result<(), HybfError> {
        self.sink.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    pub fn write_u32(&mut self, v: u32) -> Result<(), HybfError> {
        self.sink.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    pub fn write_u64(&mut self, v: u64) -> Result<(), HybfError> {
        self.sink.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), HybfError> {
        self.sink.write_all(bytes)?;
        Ok(())
    }

    /// Writes a `u8` length followed by the UTF-8 bytes of `name`.
    /// Names are limited to 255 bytes.
    pub fn write_name(&mut self, name: &str) -> Result<(), HybfError> {
        let bytes = name.as_bytes();
        if bytes.len() > 255 {
            return Err(HybfError::NameTooLong(bytes.len()));
        }
        self.write_u8(bytes.len() as u8)?;
        self.write_bytes(bytes)
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

//==================================================================================
// 2. ByteReader
//==================================================================================

/// Big-endian reader over an arbitrary byte source.
#[derive(Debug)]
pub struct ByteReader<R: Read> {
    source: R,
}

impl<R: Read> ByteReader<R> {
    pub fn new(source: R) -> Self {
        ByteReader { source }
    }

    /// Fills `buf` exactly, mapping a premature end-of-source to
    /// `Truncated` with `what` naming the field being read.
    fn fill(&mut self, buf: &mut [u8], what: &str) -> Result<(), HybfError> {
        self.source.read_exact(buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                HybfError::Truncated(what.to_string())
            } else {
                HybfError::Io(e)
            }
        })
    }

    pub fn read_u8(&mut self, what: &str) -> Result<u8, HybfError> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf, what)?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self, what: &str) -> Result<u16, HybfError> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf, what)?;
        Ok(u16::from_be_bytes(buf))
    }

    pub fn read_u32(&mut self, what: &str) -> Result<u32, HybfError> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf, what)?;
        Ok(u32::from_be_bytes(buf))
    }

    pub fn read_u64(&mut self, what: &str) -> Result<u64, HybfError> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf, what)?;
        Ok(u64::from_be_bytes(buf))
    }

    pub fn read_bytes(&mut self, count: usize, what: &str) -> Result<Vec<u8>, HybfError> {
        let mut buf = vec![0u8; count];
        self.fill(&mut buf, what)?;
        Ok(buf)
    }

    /// Inverse of `ByteWriter::write_name`.
    pub fn read_name(&mut self) -> Result<String, HybfError> {
        let len = self.read_u8("name length")? as usize;
        let bytes = self.read_bytes(len, "name")?;
        String::from_utf8(bytes)
            .map_err(|e| HybfError::InvalidEncoding(format!("name is not valid UTF-8: {}", e)))
    }

    /// Consumes and discards `count` bytes.
    pub fn skip(&mut self, count: usize, what: &str) -> Result<(), HybfError> {
        let mut remaining = count;
        let mut chunk = [0u8; 4096];
        while remaining > 0 {
            let take = remaining.min(chunk.len());
            self.fill(&mut chunk[..take], what)?;
            remaining -= take;
        }
        Ok(())
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
