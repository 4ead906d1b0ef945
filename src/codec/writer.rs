use super::types::{GoodAmount, Point};

/// Little-endian writer mirroring [`BinaryReader`](super::BinaryReader)
pub struct BinaryWriter {
    data: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { data: Vec::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn write_zeroes(&mut self, n: usize) {
        self.data.resize(self.data.len() + n, 0);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.data.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(if v { 1 } else { 0 });
    }

    pub fn write_u16_le(&mut self, v: u16) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32_le(&mut self, v: u32) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32_le(&mut self, v: i32) {
        self.write_u32_le(v as u32);
    }

    pub fn write_u64_le(&mut self, v: u64) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    /// Write `s` into exactly `n` bytes, NUL-padded and truncated if longer.
    pub fn write_fixed_string(&mut self, s: &str, n: usize) {
        let start = self.data.len();
        for c in s.chars().take(n) {
            self.data.push(u32::from(c).min(0xFF) as u8);
        }
        self.data.resize(start + n, 0);
    }

    pub fn write_amount(&mut self, v: GoodAmount) {
        self.write_u16_le(v.0);
    }

    /// Write an island-relative position as two u8 coordinates
    pub fn write_point_u8(&mut self, p: Point) {
        self.write_u8(p.x as u8);
        self.write_u8(p.y as u8);
    }

    /// Write a container block header followed by its payload
    pub fn write_block(&mut self, tag: &str, payload: &[u8]) {
        self.write_fixed_string(tag, super::block::TAG_LEN);
        self.write_u32_le(payload.len() as u32);
        self.write_bytes(payload);
    }
}

impl Default for BinaryWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BinaryWriter> for Vec<u8> {
    fn from(writer: BinaryWriter) -> Self {
        writer.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::reader::BinaryReader;

    #[test]
    fn test_roundtrip_primitives() {
        let mut writer = BinaryWriter::new();
        writer.write_u8(0x42);
        writer.write_u16_le(0x1234);
        writer.write_u32_le(0xDEADBEEF);
        writer.write_i32_le(-1);

        let data = writer.into_vec();
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 0x42);
        assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_i32_le().unwrap(), -1);
    }

    #[test]
    fn test_fixed_string_padding() {
        let mut writer = BinaryWriter::new();
        writer.write_fixed_string("PLAYER4", 16);
        writer.write_fixed_string("TOOLONG", 4);

        let data = writer.into_vec();
        assert_eq!(data.len(), 20);
        assert_eq!(&data[..7], b"PLAYER4");
        assert!(data[7..16].iter().all(|&b| b == 0));
        assert_eq!(&data[16..], b"TOOL");
    }

    #[test]
    fn test_write_block_header() {
        let mut writer = BinaryWriter::new();
        writer.write_block("NAME", b"abc");

        let data = writer.into_vec();
        assert_eq!(data.len(), 16 + 4 + 3);
        assert_eq!(&data[16..20], &[3, 0, 0, 0]);
        assert_eq!(&data[20..], b"abc");
    }
}
