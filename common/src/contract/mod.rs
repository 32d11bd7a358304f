mod invocation;

use crate::{
    codec::{decode_wide_int, encode_symbol, encode_wide_int, is_valid_symbol, EncodingError, Int128Parts},
    config::SYMBOL_SHORT_MAX_LEN,
    crypto::Address,
    serializer::*,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub use invocation::InvocationRequest;

/// Short symbol: at most 9 characters of `[A-Z0-9_]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    // Normalize any text into a symbol, see `encode_symbol` for the lossy rules
    pub fn new(text: &str) -> Self {
        Self(encode_symbol(text, SYMBOL_SHORT_MAX_LEN))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Symbol {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if !is_valid_symbol(&value, SYMBOL_SHORT_MAX_LEN) {
            return Err("not a normalized short symbol");
        }
        Ok(Self(value))
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serializer for Symbol {
    fn write(&self, writer: &mut Writer) {
        debug_assert!(self.0.len() <= SYMBOL_SHORT_MAX_LEN);
        writer.write_u8(self.0.len() as u8);
        writer.write_bytes(self.0.as_bytes());
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let size = reader.read_u8()? as usize;
        if size > SYMBOL_SHORT_MAX_LEN {
            return Err(ReaderError::InvalidSize);
        }
        let value = reader.read_string_with_size(size)?;
        Symbol::try_from(value).map_err(|_| ReaderError::InvalidValue)
    }

    fn size(&self) -> usize {
        1 + self.0.len()
    }
}

/// Typed contract call value.
/// `Bool` and `Void` are only produced by contracts as return values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ScValue {
    Address(Address),
    Symbol(Symbol),
    U32(u32),
    U64(u64),
    I128(Int128Parts),
    Bool(bool),
    Void,
}

impl ScValue {
    // Wide signed amount, fails for negative values
    pub fn i128(value: i128) -> Result<Self, EncodingError> {
        Ok(Self::I128(encode_wide_int(value)?))
    }

    pub fn symbol(text: &str) -> Self {
        Self::Symbol(Symbol::new(text))
    }

    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::I128(parts) => Some(decode_wide_int(*parts)),
            _ => None,
        }
    }

    fn tag(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Void => 1,
            Self::U32(_) => 3,
            Self::U64(_) => 5,
            Self::I128(_) => 10,
            Self::Symbol(_) => 15,
            Self::Address(_) => 18,
        }
    }
}

impl Display for ScValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Address(v) => write!(f, "{}", v),
            Self::Symbol(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::I128(v) => write!(f, "{}", decode_wide_int(*v)),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Void => f.write_str("void"),
        }
    }
}

impl Serializer for ScValue {
    fn write(&self, writer: &mut Writer) {
        writer.write_u8(self.tag());
        match self {
            Self::Address(v) => v.write(writer),
            Self::Symbol(v) => v.write(writer),
            Self::U32(v) => writer.write_u32(v),
            Self::U64(v) => writer.write_u64(v),
            Self::I128(v) => v.write(writer),
            Self::Bool(v) => writer.write_bool(*v),
            Self::Void => {}
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(match reader.read_u8()? {
            0 => Self::Bool(reader.read_bool()?),
            1 => Self::Void,
            3 => Self::U32(reader.read_u32()?),
            5 => Self::U64(reader.read_u64()?),
            10 => Self::I128(Int128Parts::read(reader)?),
            15 => Self::Symbol(Symbol::read(reader)?),
            18 => Self::Address(Address::read(reader)?),
            _ => return Err(ReaderError::InvalidValue),
        })
    }

    fn size(&self) -> usize {
        1 + match self {
            Self::Address(v) => v.size(),
            Self::Symbol(v) => v.size(),
            Self::U32(_) => 4,
            Self::U64(_) => 8,
            Self::I128(v) => v.size(),
            Self::Bool(_) => 1,
            Self::Void => 0,
        }
    }
}
