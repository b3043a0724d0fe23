use cc_codec::{Reader, WriteBuf};
use cc_core::{Error, Result};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

/// Ed25519-SHA-256: the hash fingerprint is the raw public key, not a hash
/// of anything, because the aggregate condition hash already folds every
/// leaf through SHA-256 one level up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519 {
    public_key: [u8; 32],
    signature: [u8; 64],
}

impl Ed25519 {
    pub const TYPE_BIT: u64 = 4;
    pub const FEATURE_BIT: u64 = 0x20;

    /// An unsigned builder: the signature is all-zero until `sign` is
    /// called. Its condition can still be derived (the public key and the
    /// fixed payload length are already known), but it never validates.
    pub fn new(public_key: [u8; 32]) -> Self {
        Ed25519 {
            public_key,
            signature: [0u8; 64],
        }
    }

    pub fn sign(&self, message: &[u8], signing_key: &SigningKey) -> Result<Self> {
        let derived = signing_key.verifying_key();
        if derived.to_bytes() != self.public_key {
            return Err(Error::KeyMismatch);
        }
        let signature: Signature = signing_key.sign(message);
        Ok(Ed25519 {
            public_key: self.public_key,
            signature: signature.to_bytes(),
        })
    }

    pub fn type_bit(&self) -> u64 {
        Self::TYPE_BIT
    }

    pub fn feature_bitmask(&self) -> u64 {
        Self::FEATURE_BIT
    }

    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    pub fn hash_fingerprint(&self) -> Result<Vec<u8>> {
        Ok(self.public_key.to_vec())
    }

    pub fn calculate_max_fulfillment_length(&self) -> Result<u64> {
        Ok(96)
    }

    pub fn serialize_payload(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.put_fixed(&self.public_key).put_fixed(&self.signature);
        Ok(out)
    }

    pub(crate) fn parse_from_reader(r: &mut Reader) -> Result<Self> {
        let public_key = r.read_fixed(32)?;
        let signature = r.read_fixed(64)?;
        Ok(Ed25519 {
            public_key: public_key.try_into().expect("read_fixed(32) returns 32 bytes"),
            signature: signature.try_into().expect("read_fixed(64) returns 64 bytes"),
        })
    }

    /// A message is mandatory for this variant; an unsigned (all-zero
    /// signature) fulfillment never validates, regardless of message.
    pub fn validate(&self, message: Option<&[u8]>) -> bool {
        let Some(message) = message else {
            return false;
        };
        if self.signature == [0u8; 64] {
            return false;
        }
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.public_key) else {
            return false;
        };
        let signature = Signature::from_bytes(&self.signature);
        verifying_key.verify(message, &signature).is_ok()
    }
}
