use crate::{
    codec::EncodingError,
    serializer::{Reader, ReaderError, Serializer, Writer},
};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

// Length of a strkey encoded account or contract identifier
pub const ADDRESS_LENGTH: usize = 56;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressKind {
    // Externally owned account, strkey prefix 'G'
    Account,
    // Deployed contract, strkey prefix 'C'
    Contract,
}

impl AddressKind {
    fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'G' => Some(Self::Account),
            'C' => Some(Self::Contract),
            _ => None,
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            Self::Account => 0,
            Self::Contract => 1,
        }
    }
}

/// Ledger address in its strkey text form.
///
/// Only the shape is validated (length, prefix and base32 alphabet),
/// the embedded checksum is left to the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, EncodingError> {
        let value = value.into();
        Self::kind_of(&value)?;
        Ok(Self(value))
    }

    fn kind_of(value: &str) -> Result<AddressKind, EncodingError> {
        if value.len() != ADDRESS_LENGTH {
            return Err(EncodingError::InvalidAddress(value.to_owned()));
        }

        let kind = value
            .chars()
            .next()
            .and_then(AddressKind::from_prefix)
            .ok_or_else(|| EncodingError::InvalidAddress(value.to_owned()))?;

        // RFC 4648 base32 alphabet
        if !value
            .chars()
            .all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c))
        {
            return Err(EncodingError::InvalidAddress(value.to_owned()));
        }

        Ok(kind)
    }

    pub fn kind(&self) -> AddressKind {
        // Validated at construction
        if self.0.starts_with('C') {
            AddressKind::Contract
        } else {
            AddressKind::Account
        }
    }

    pub fn is_contract(&self) -> bool {
        self.kind() == AddressKind::Contract
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Address {
    type Error = EncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serializer for Address {
    fn write(&self, writer: &mut Writer) {
        writer.write_u8(self.kind().to_u8());
        writer.write_bytes(self.0.as_bytes());
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let kind = reader.read_u8()?;
        let value = reader.read_string_with_size(ADDRESS_LENGTH)?;
        let address = Address::new(value).map_err(|_| ReaderError::InvalidValue)?;
        if address.kind().to_u8() != kind {
            return Err(ReaderError::InvalidValue);
        }
        Ok(address)
    }

    fn size(&self) -> usize {
        1 + ADDRESS_LENGTH
    }
}

/// Identifier of the deployed contract every invocation targets.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractId(Address);

impl ContractId {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, EncodingError> {
        let address = Address::new(value)?;
        if !address.is_contract() {
            return Err(EncodingError::InvalidContractId(address.0));
        }
        Ok(Self(address))
    }

    pub fn as_address(&self) -> &Address {
        &self.0
    }
}

impl FromStr for ContractId {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ContractId {
    type Error = EncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContractId> for String {
    fn from(value: ContractId) -> Self {
        value.0.into()
    }
}

impl Display for ContractId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Serializer for ContractId {
    fn write(&self, writer: &mut Writer) {
        self.0.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let address = Address::read(reader)?;
        if !address.is_contract() {
            return Err(ReaderError::InvalidValue);
        }
        Ok(Self(address))
    }

    fn size(&self) -> usize {
        self.0.size()
    }
}
