use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};
use super::types::{GoodAmount, Point};

/// Sequential little-endian reader over a save-game buffer
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::SeekOutOfBounds { pos, len: self.data.len() });
        }
        self.pos = pos;
        Ok(())
    }

    /// True once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(Error::UnexpectedEof {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.read_bytes(8)?))
    }

    /// Read `n` bytes as text, stopping at the first NUL but always consuming all `n`.
    /// Bytes are Latin-1, so every byte maps to exactly one char.
    pub fn read_fixed_string(&mut self, n: usize) -> Result<String> {
        let bytes = self.read_bytes(n)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(bytes[..end].iter().map(|&b| b as char).collect())
    }

    /// Read a stock counter stored as 1/32 tons
    pub fn read_amount(&mut self) -> Result<GoodAmount> {
        Ok(GoodAmount(self.read_u16_le()?))
    }

    /// Read an island-relative position (two u8 coordinates)
    pub fn read_point_u8(&mut self) -> Result<Point> {
        let x = self.read_u8()?;
        let y = self.read_u8()?;
        Ok(Point::new(x as u32, y as u32))
    }

    /// Read a world position (two u16 coordinates)
    pub fn read_point_u16(&mut self) -> Result<Point> {
        let x = self.read_u16_le()?;
        let y = self.read_u16_le()?;
        Ok(Point::new(x as u32, y as u32))
    }

    /// Read bytes whose meaning is unknown, appending them verbatim to `out`
    pub fn read_reserved(&mut self, n: usize, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(self.read_bytes(n)?);
        Ok(())
    }

    pub fn expect_zero_u8(&mut self, field: &'static str) -> Result<()> {
        match self.read_u8()? {
            0 => Ok(()),
            v => Err(Error::unexpected(field, v)),
        }
    }

    pub fn expect_zero_u16(&mut self, field: &'static str) -> Result<()> {
        match self.read_u16_le()? {
            0 => Ok(()),
            v => Err(Error::unexpected(field, v)),
        }
    }

    /// Consume `n` bytes that must all be zero
    pub fn expect_zeroes(&mut self, n: usize, field: &'static str) -> Result<()> {
        let bytes = self.read_bytes(n)?;
        match bytes.iter().find(|&&b| b != 0) {
            None => Ok(()),
            Some(&b) => Err(Error::unexpected(field, b)),
        }
    }

    /// Read remaining bytes
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }
}
