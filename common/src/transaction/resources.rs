use crate::serializer::*;

// Opaque ledger entry key, only the ledger interprets it
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LedgerKey(Vec<u8>);

impl LedgerKey {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Serializer for LedgerKey {
    fn write(&self, writer: &mut Writer) {
        writer.write_blob(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self(reader.read_blob()?))
    }

    fn size(&self) -> usize {
        4 + self.0.len()
    }
}

// Authorization entry returned by the simulation for the invoked call tree.
// Merged as is into the prepared transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationEntry(Vec<u8>);

impl AuthorizationEntry {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Serializer for AuthorizationEntry {
    fn write(&self, writer: &mut Writer) {
        writer.write_blob(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self(reader.read_blob()?))
    }

    fn size(&self) -> usize {
        4 + self.0.len()
    }
}

// Ledger entries touched by the call
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Footprint {
    pub read_only: Vec<LedgerKey>,
    pub read_write: Vec<LedgerKey>,
}

impl Footprint {
    // Both key lists must be readable back once encoded
    pub fn check_limits(&self) -> Result<(), ReaderError> {
        for keys in [&self.read_only, &self.read_write] {
            check_array_size(keys.len())?;
            for key in keys {
                check_bytes_size(key.as_bytes().len())?;
            }
        }
        Ok(())
    }
}

impl Serializer for Footprint {
    fn write(&self, writer: &mut Writer) {
        self.read_only.write(writer);
        self.read_write.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let read_only = Vec::read(reader)?;
        let read_write = Vec::read(reader)?;
        Ok(Self {
            read_only,
            read_write,
        })
    }

    fn size(&self) -> usize {
        self.read_only.size() + self.read_write.size()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractResources {
    pub footprint: Footprint,
    pub instructions: u32,
    pub read_bytes: u32,
    pub write_bytes: u32,
}

impl Serializer for ContractResources {
    fn write(&self, writer: &mut Writer) {
        self.footprint.write(writer);
        writer.write_u32(&self.instructions);
        writer.write_u32(&self.read_bytes);
        writer.write_u32(&self.write_bytes);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let footprint = Footprint::read(reader)?;
        let instructions = reader.read_u32()?;
        let read_bytes = reader.read_u32()?;
        let write_bytes = reader.read_u32()?;
        Ok(Self {
            footprint,
            instructions,
            read_bytes,
            write_bytes,
        })
    }

    fn size(&self) -> usize {
        self.footprint.size() + 4 * 3
    }
}

/// Resources computed by the simulation and the fee they cost,
/// on top of the inclusion fee.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractTransactionData {
    pub resources: ContractResources,
    pub resource_fee: i64,
}

impl Serializer for ContractTransactionData {
    fn write(&self, writer: &mut Writer) {
        self.resources.write(writer);
        writer.write_i64(&self.resource_fee);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let resources = ContractResources::read(reader)?;
        let resource_fee = reader.read_i64()?;
        if resource_fee < 0 {
            return Err(ReaderError::InvalidValue);
        }

        Ok(Self {
            resources,
            resource_fee,
        })
    }

    fn size(&self) -> usize {
        self.resources.size() + 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_data_encoding() {
        let data = ContractTransactionData {
            resources: ContractResources {
                footprint: Footprint {
                    read_only: vec![LedgerKey::new(vec![1, 2, 3])],
                    read_write: vec![LedgerKey::new(vec![4]), LedgerKey::new(vec![5, 6])],
                },
                instructions: 1_500_000,
                read_bytes: 2048,
                write_bytes: 512,
            },
            resource_fee: 42_000,
        };

        let bytes = data.to_bytes();
        assert_eq!(bytes.len(), data.size());
        assert_eq!(ContractTransactionData::from_bytes(&bytes).unwrap(), data);
    }

    #[test]
    fn test_footprint_limits() {
        let mut footprint = Footprint {
            read_only: vec![LedgerKey::new(vec![0; MAX_BYTES_SIZE])],
            read_write: vec![LedgerKey::new(vec![1]); MAX_ARRAY_SIZE],
        };
        assert!(footprint.check_limits().is_ok());

        footprint.read_write.push(LedgerKey::new(vec![2]));
        assert!(matches!(
            footprint.check_limits(),
            Err(ReaderError::ExceedsMaxArraySize(_))
        ));

        let footprint = Footprint {
            read_only: vec![],
            read_write: vec![LedgerKey::new(vec![0; MAX_BYTES_SIZE + 1])],
        };
        assert!(matches!(
            footprint.check_limits(),
            Err(ReaderError::ExceedsMaxBytesSize(_))
        ));
    }

    #[test]
    fn test_negative_resource_fee_is_rejected() {
        let data = ContractTransactionData {
            resource_fee: -1,
            ..Default::default()
        };
        assert_eq!(
            ContractTransactionData::from_bytes(&data.to_bytes()),
            Err(ReaderError::InvalidValue)
        );
    }
}
