//! A no_std compatible byte cursor used by the container parser.
//!
//! Wraps a byte slice with position tracking and the little-endian reads
//! the GIF block structure needs. Running past the end of the slice maps to
//! [`GifError::UnexpectedEof`], which is the fail-fast behavior the parser
//! wants everywhere a block is cut short.

use byteorder_lite::{ByteOrder, LittleEndian};
use core::fmt;

use crate::error::GifError;

/// A reader that wraps a byte slice and tracks the current position.
#[derive(Clone)]
pub(crate) struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    /// Create a new reader over the given byte slice.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Byte offset of the next read.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Seek to an absolute byte offset.
    #[inline]
    pub fn seek_to(&mut self, pos: usize) -> Result<(), GifError> {
        if pos > self.data.len() {
            return Err(GifError::UnexpectedEof);
        }
        self.pos = pos;
        Ok(())
    }

    /// Step back `count` bytes, clamping at the start.
    #[inline]
    pub fn seek_back(&mut self, count: usize) {
        self.pos = self.pos.saturating_sub(count);
    }

    /// Advance past `count` bytes without looking at them.
    #[inline]
    pub fn skip(&mut self, count: usize) -> Result<(), GifError> {
        if self.pos + count > self.data.len() {
            return Err(GifError::UnexpectedEof);
        }
        self.pos += count;
        Ok(())
    }

    /// Read exactly `buf.len()` bytes.
    #[inline]
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), GifError> {
        let n = buf.len();
        if self.pos + n > self.data.len() {
            return Err(GifError::UnexpectedEof);
        }
        buf.copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(())
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, GifError> {
        if self.pos >= self.data.len() {
            return Err(GifError::UnexpectedEof);
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Read a u16 in little-endian byte order.
    #[inline]
    pub fn read_u16_le(&mut self) -> Result<u16, GifError> {
        if self.pos + 2 > self.data.len() {
            return Err(GifError::UnexpectedEof);
        }
        let val = LittleEndian::read_u16(&self.data[self.pos..]);
        self.pos += 2;
        Ok(val)
    }

    /// Borrow the next `n` bytes and advance past them.
    #[inline]
    pub fn take_slice(&mut self, n: usize) -> Result<&'a [u8], GifError> {
        if self.pos + n > self.data.len() {
            return Err(GifError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}

impl fmt::Debug for SliceReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliceReader")
            .field("len", &self.data.len())
            .field("pos", &self.pos)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_seeks() {
        let data = [0x2c, 0x34, 0x12, 0xaa, 0xbb];
        let mut r = SliceReader::new(&data);
        assert_eq!(r.read_u8().unwrap(), 0x2c);
        assert_eq!(r.read_u16_le().unwrap(), 0x1234);
        assert_eq!(r.take_slice(2).unwrap(), &[0xaa, 0xbb]);
        assert_eq!(r.read_u8(), Err(GifError::UnexpectedEof));
        r.seek_back(2);
        assert_eq!(r.position(), 3);
        assert_eq!(r.read_u8().unwrap(), 0xaa);
        assert!(r.skip(2).is_err());
    }
}
