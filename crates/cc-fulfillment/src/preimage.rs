use cc_codec::{Reader, WriteBuf};
use cc_core::{Error, Result};

use crate::sha256::sha256;

/// The simplest variant: the witness for the condition *is* the hash
/// preimage itself. Parsing a preimage fulfillment never fails on content
/// (any byte string is a valid preimage of its own hash); only a builder
/// that never had a preimage set is incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preimage {
    preimage: Option<Vec<u8>>,
}

impl Preimage {
    pub const TYPE_BIT: u64 = 0;
    pub const FEATURE_BIT: u64 = 0x01;

    pub fn new(preimage: impl Into<Vec<u8>>) -> Self {
        Preimage {
            preimage: Some(preimage.into()),
        }
    }

    /// A builder with no preimage set yet; deriving a condition or payload
    /// from this fails with `IncompleteFulfillment`.
    pub fn unset() -> Self {
        Preimage { preimage: None }
    }

    pub fn type_bit(&self) -> u64 {
        Self::TYPE_BIT
    }

    pub fn feature_bitmask(&self) -> u64 {
        Self::FEATURE_BIT
    }

    fn preimage(&self) -> Result<&[u8]> {
        self.preimage
            .as_deref()
            .ok_or(Error::IncompleteFulfillment("preimage not set"))
    }

    pub fn hash_fingerprint(&self) -> Result<Vec<u8>> {
        Ok(sha256(self.preimage()?).to_vec())
    }

    pub fn calculate_max_fulfillment_length(&self) -> Result<u64> {
        let mut encoded = Vec::new();
        encoded.put_varbytes(self.preimage()?);
        Ok(encoded.len() as u64)
    }

    pub fn serialize_payload(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.put_varbytes(self.preimage()?);
        Ok(out)
    }

    pub(crate) fn parse_from_reader(r: &mut Reader) -> Result<Self> {
        let preimage = r.read_varbytes()?;
        Ok(Preimage::new(preimage))
    }

    /// Always true once a preimage is present: merely parsing or holding a
    /// preimage fulfillment does not validate a secret, it asserts
    /// structural completeness. There is no secret to check against here;
    /// the hash comparison happens one level up, when the derived
    /// condition is matched against an expected one.
    pub fn validate(&self, _message: Option<&[u8]>) -> bool {
        self.preimage.is_some()
    }
}
