mod reader;
mod writer;

pub use reader::{Reader, ReaderError};
pub use writer::Writer;

// Maximum number of elements accepted when reading a length-prefixed vector
pub const MAX_ARRAY_SIZE: usize = 1024;

// Maximum number of bytes accepted when reading a length-prefixed byte blob
pub const MAX_BYTES_SIZE: usize = 64 * 1024;

// Reject a vector count the reader would refuse once encoded
pub fn check_array_size(count: usize) -> Result<(), ReaderError> {
    if count > MAX_ARRAY_SIZE {
        return Err(ReaderError::ExceedsMaxArraySize(count));
    }
    Ok(())
}

// Reject a blob length the reader would refuse once encoded
pub fn check_bytes_size(size: usize) -> Result<(), ReaderError> {
    if size > MAX_BYTES_SIZE {
        return Err(ReaderError::ExceedsMaxBytesSize(size));
    }
    Ok(())
}

// Canonical binary encoding shared by every type that crosses a boundary:
// argument values, authorization entries, resource footprints and
// the transaction snapshots handed to the signing agent and the ledger
pub trait Serializer {
    fn write(&self, writer: &mut Writer);

    fn read(reader: &mut Reader) -> Result<Self, ReaderError>
    where
        Self: Sized;

    fn size(&self) -> usize {
        let mut buffer = Vec::new();
        let mut writer = Writer::new(&mut buffer);
        self.write(&mut writer);
        writer.total_write()
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.size());
        let mut writer = Writer::new(&mut buffer);
        self.write(&mut writer);
        buffer
    }

    fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    // Decode a value and make sure no trailing bytes are left behind
    fn from_bytes(bytes: &[u8]) -> Result<Self, ReaderError>
    where
        Self: Sized,
    {
        let mut reader = Reader::new(bytes);
        let value = Self::read(&mut reader)?;
        if reader.size() != 0 {
            return Err(ReaderError::InvalidSize);
        }
        Ok(value)
    }

    fn from_hex(hex: &str) -> Result<Self, ReaderError>
    where
        Self: Sized,
    {
        let bytes = hex::decode(hex).map_err(|_| ReaderError::InvalidHex)?;
        Self::from_bytes(&bytes)
    }
}

impl Serializer for u8 {
    fn write(&self, writer: &mut Writer) {
        writer.write_u8(*self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_u8()
    }

    fn size(&self) -> usize {
        1
    }
}

impl Serializer for u32 {
    fn write(&self, writer: &mut Writer) {
        writer.write_u32(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_u32()
    }

    fn size(&self) -> usize {
        4
    }
}

impl Serializer for u64 {
    fn write(&self, writer: &mut Writer) {
        writer.write_u64(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_u64()
    }

    fn size(&self) -> usize {
        8
    }
}

impl Serializer for i64 {
    fn write(&self, writer: &mut Writer) {
        writer.write_i64(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_i64()
    }

    fn size(&self) -> usize {
        8
    }
}

impl Serializer for String {
    fn write(&self, writer: &mut Writer) {
        writer.write_string(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_string()
    }

    fn size(&self) -> usize {
        2 + self.len()
    }
}

impl<T: Serializer> Serializer for Option<T> {
    fn write(&self, writer: &mut Writer) {
        match self {
            Some(value) => {
                writer.write_bool(true);
                value.write(writer);
            }
            None => writer.write_bool(false),
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        if reader.read_bool()? {
            Ok(Some(T::read(reader)?))
        } else {
            Ok(None)
        }
    }

    fn size(&self) -> usize {
        1 + self.as_ref().map(|v| v.size()).unwrap_or(0)
    }
}

impl<T: Serializer> Serializer for Vec<T> {
    fn write(&self, writer: &mut Writer) {
        debug_assert!(
            self.len() <= MAX_ARRAY_SIZE,
            "vector of {} elements cannot be read back",
            self.len()
        );
        writer.write_u16(self.len() as u16);
        for value in self {
            value.write(writer);
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let count = reader.read_u16()? as usize;
        if count > MAX_ARRAY_SIZE {
            return Err(ReaderError::ExceedsMaxArraySize(count));
        }

        let mut values = Vec::with_capacity(count.min(reader.size()));
        for _ in 0..count {
            values.push(T::read(reader)?);
        }
        Ok(values)
    }

    fn size(&self) -> usize {
        2 + self.iter().map(|v| v.size()).sum::<usize>()
    }
}
