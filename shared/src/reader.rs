//! Positionable big-endian cursor over a byte slice
//!
//! Besides fixed-width integers the cache uses three variable-length
//! encodings that favour small values:
//!
//! ```text
//! smart        first byte < 0x80: u8                  (0..=127)
//!              otherwise:         u16 - 0x8000        (0..=32767)
//! short smart  first byte < 0x80: u8 - 64             (-64..=63)
//!              otherwise:         u16 - 0xC000        (-16384..=16383)
//! big smart    first byte < 0x80: u16                 (0..=32767)
//!              otherwise:         u32 & 0x7FFF_FFFF
//! ```

use crate::error::{CacheError, CacheResult, Stage};

/// Cursor over a borrowed buffer
///
/// Cheap to create; decoders open one per segment instead of sharing a
/// long-lived cursor between segments.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    stage: Stage,
}

impl<'a> Reader<'a> {
    /// Cursor at the start of `data`
    pub fn new(data: &'a [u8], stage: Stage) -> Self {
        Self {
            data,
            pos: 0,
            stage,
        }
    }

    /// Cursor positioned at `offset`
    pub fn at(data: &'a [u8], offset: usize, stage: Stage) -> Self {
        Self {
            data,
            pos: offset,
            stage,
        }
    }

    /// Current position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move to an absolute position
    ///
    /// Seeking past the end is allowed; the next read fails.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Bytes left after the current position
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Stage this cursor reports errors for
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn truncated(&self, needed: usize) -> CacheError {
        CacheError::TruncatedInput {
            stage: self.stage,
            offset: self.pos,
            needed,
            len: self.data.len(),
        }
    }

    /// Borrow the next `n` bytes and advance past them
    pub fn read_bytes(&mut self, n: usize) -> CacheResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.truncated(n))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Advance past `n` bytes
    pub fn skip(&mut self, n: usize) -> CacheResult<()> {
        self.read_bytes(n).map(|_| ())
    }

    fn read_array<const N: usize>(&mut self) -> CacheResult<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(N)?);
        Ok(buf)
    }

    fn peek_u8(&self) -> CacheResult<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.truncated(1))
    }

    pub fn read_u8(&mut self) -> CacheResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> CacheResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> CacheResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> CacheResult<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> CacheResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> CacheResult<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Unsigned 1-2 byte smart
    pub fn read_smart(&mut self) -> CacheResult<u16> {
        if self.peek_u8()? < 0x80 {
            Ok(u16::from(self.read_u8()?))
        } else {
            Ok(self.read_u16()? - 0x8000)
        }
    }

    /// Signed 1-2 byte smart
    pub fn read_short_smart(&mut self) -> CacheResult<i32> {
        if self.peek_u8()? < 0x80 {
            Ok(i32::from(self.read_u8()?) - 64)
        } else {
            Ok(i32::from(self.read_u16()?) - 0xC000)
        }
    }

    /// Unsigned 2-4 byte smart
    pub fn read_big_smart(&mut self) -> CacheResult<u32> {
        if self.peek_u8()? < 0x80 {
            Ok(u32::from(self.read_u16()?))
        } else {
            Ok(self.read_u32()? & 0x7FFF_FFFF)
        }
    }
}
