//! Bounds-checked little-endian cursor over untrusted bytes.

use typelib_core::WidthValue;

use crate::error::DecodeError;

/// Cursor over a byte slice. Every read is bounds-checked and names what
/// it was reading so failures point at the broken field.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Cursor positioned at `pos`. Positions past the end fail on first read.
    pub fn at(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail unless `count * size` more bytes are available.
    ///
    /// Called before allocating for counts taken from a header.
    pub fn ensure(&self, count: usize, size: usize, what: &'static str) -> Result<(), DecodeError> {
        let needed = count.checked_mul(size).unwrap_or(usize::MAX);
        if needed > self.remaining() {
            return Err(self.eof(what, needed));
        }
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize, what: &'static str) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| self.eof(what, n))?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    pub fn read_array<const N: usize>(
        &mut self,
        what: &'static str,
    ) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, what)?);
        Ok(out)
    }

    pub fn skip(&mut self, n: usize, what: &'static str) -> Result<(), DecodeError> {
        self.read_bytes(n, what).map(|_| ())
    }

    pub fn read_u8(&mut self, what: &'static str) -> Result<u8, DecodeError> {
        Ok(self.read_array::<1>(what)?[0])
    }

    pub fn read_u16(&mut self, what: &'static str) -> Result<u16, DecodeError> {
        self.read_array(what).map(u16::from_le_bytes)
    }

    pub fn read_u32(&mut self, what: &'static str) -> Result<u32, DecodeError> {
        self.read_array(what).map(u32::from_le_bytes)
    }

    pub fn read_u64(&mut self, what: &'static str) -> Result<u64, DecodeError> {
        self.read_array(what).map(u64::from_le_bytes)
    }

    /// Read a `(value32, value64)` pair.
    pub fn read_width(&mut self, what: &'static str) -> Result<WidthValue, DecodeError> {
        Ok(WidthValue::new(self.read_u32(what)?, self.read_u32(what)?))
    }

    /// Read `count` u32 values, checking the whole span up front.
    pub fn read_u32_array(
        &mut self,
        count: usize,
        what: &'static str,
    ) -> Result<Vec<u32>, DecodeError> {
        self.ensure(count, 4, what)?;
        (0..count).map(|_| self.read_u32(what)).collect()
    }

    fn eof(&self, what: &'static str, needed: usize) -> DecodeError {
        DecodeError::UnexpectedEof {
            what,
            offset: self.pos,
            needed,
            available: self.remaining(),
        }
    }
}
