use super::MAX_BYTES_SIZE;
use crate::crypto::{Hash, HASH_SIZE};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Invalid size")]
    InvalidSize,
    #[error("Invalid value")]
    InvalidValue,
    #[error("Invalid hex")]
    InvalidHex,
    #[error("Array size {} exceeds the maximum allowed", _0)]
    ExceedsMaxArraySize(usize),
    #[error("Bytes size {} exceeds the maximum allowed", _0)]
    ExceedsMaxBytesSize(usize),
}

// Cursor over a borrowed byte slice
pub struct Reader<'a> {
    bytes: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, total: 0 }
    }

    pub fn read_bytes_ref(&mut self, n: usize) -> Result<&'a [u8], ReaderError> {
        if n > self.size() {
            return Err(ReaderError::InvalidSize);
        }

        let bytes: &'a [u8] = self.bytes;
        let slice = &bytes[self.total..self.total + n];
        self.total += n;
        Ok(slice)
    }

    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], ReaderError> {
        let bytes = self.read_bytes_ref(N)?;
        bytes.try_into().map_err(|_| ReaderError::InvalidSize)
    }

    pub fn read_bool(&mut self) -> Result<bool, ReaderError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ReaderError::InvalidValue),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, ReaderError> {
        let [byte] = self.read_bytes::<1>()?;
        Ok(byte)
    }

    pub fn read_u16(&mut self) -> Result<u16, ReaderError> {
        Ok(u16::from_be_bytes(self.read_bytes()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReaderError> {
        Ok(u32::from_be_bytes(self.read_bytes()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, ReaderError> {
        Ok(u64::from_be_bytes(self.read_bytes()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, ReaderError> {
        Ok(i64::from_be_bytes(self.read_bytes()?))
    }

    pub fn read_hash(&mut self) -> Result<Hash, ReaderError> {
        Ok(Hash::new(self.read_bytes::<HASH_SIZE>()?))
    }

    pub fn read_string(&mut self) -> Result<String, ReaderError> {
        let size = self.read_u16()? as usize;
        self.read_string_with_size(size)
    }

    pub fn read_string_with_size(&mut self, size: usize) -> Result<String, ReaderError> {
        let bytes = self.read_bytes_ref(size)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ReaderError::InvalidValue)
    }

    pub fn read_blob(&mut self) -> Result<Vec<u8>, ReaderError> {
        let size = self.read_u32()? as usize;
        if size > MAX_BYTES_SIZE {
            return Err(ReaderError::ExceedsMaxBytesSize(size));
        }
        Ok(self.read_bytes_ref(size)?.to_vec())
    }

    // Bytes left to read
    pub fn size(&self) -> usize {
        self.bytes.len() - self.total
    }

    pub fn total_read(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_past_end() {
        let mut reader = Reader::new(&[0, 1]);
        assert_eq!(reader.read_u16().unwrap(), 1);
        assert_eq!(reader.read_u8(), Err(ReaderError::InvalidSize));
        assert_eq!(reader.total_read(), 2);
    }

    #[test]
    fn test_invalid_bool() {
        let mut reader = Reader::new(&[2]);
        assert_eq!(reader.read_bool(), Err(ReaderError::InvalidValue));
    }

    #[test]
    fn test_oversized_blob() {
        let declared = (MAX_BYTES_SIZE as u32 + 1).to_be_bytes();
        let mut reader = Reader::new(&declared);
        assert_eq!(
            reader.read_blob(),
            Err(ReaderError::ExceedsMaxBytesSize(MAX_BYTES_SIZE + 1))
        );
    }
}
