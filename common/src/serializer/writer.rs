use crate::crypto::Hash;

// Append-only writer, every integer is written in big-endian
pub struct Writer<'a> {
    bytes: &'a mut Vec<u8>,
    len: usize,
}

impl<'a> Writer<'a> {
    pub fn new(bytes: &'a mut Vec<u8>) -> Self {
        let len = bytes.len();
        Self { bytes, len }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn write_hash(&mut self, hash: &Hash) {
        self.bytes.extend_from_slice(hash.as_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.bytes.push(value as u8);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.bytes.extend(value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: &u32) {
        self.bytes.extend(value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: &u64) {
        self.bytes.extend(value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: &i64) {
        self.bytes.extend(value.to_be_bytes());
    }

    // Strings are prefixed by their byte length on 2 bytes
    pub fn write_string(&mut self, value: &str) {
        let bytes = value.as_bytes();
        self.write_u16(bytes.len() as u16);
        self.bytes.extend_from_slice(bytes);
    }

    // Variable sized blobs are prefixed by their length on 4 bytes
    pub fn write_blob(&mut self, value: &[u8]) {
        self.write_u32(&(value.len() as u32));
        self.bytes.extend_from_slice(value);
    }

    pub fn total_write(&self) -> usize {
        self.bytes.len() - self.len
    }
}
