use cc_codec::{base64url, Reader, WriteBuf};
use cc_core::{Condition, Error, Result, VERSION};

use crate::ed25519::Ed25519;
use crate::preimage::Preimage;
use crate::threshold::Threshold;

/// A tagged union over the three fulfillment variants, discriminated by
/// `type_bit`. No runtime type introspection beyond that discriminant: the
/// match arms below are the only place the variant set is enumerated.
#[derive(Debug, Clone, PartialEq)]
pub enum Fulfillment {
    Preimage(Preimage),
    Ed25519(Ed25519),
    Threshold(Threshold),
}

impl Fulfillment {
    pub fn type_bit(&self) -> u64 {
        match self {
            Fulfillment::Preimage(p) => p.type_bit(),
            Fulfillment::Ed25519(e) => e.type_bit(),
            Fulfillment::Threshold(t) => t.type_bit(),
        }
    }

    pub fn feature_bitmask(&self) -> Result<u64> {
        match self {
            Fulfillment::Preimage(p) => Ok(p.feature_bitmask()),
            Fulfillment::Ed25519(e) => Ok(e.feature_bitmask()),
            Fulfillment::Threshold(t) => t.feature_bitmask(),
        }
    }

    pub fn hash_fingerprint(&self) -> Result<Vec<u8>> {
        match self {
            Fulfillment::Preimage(p) => p.hash_fingerprint(),
            Fulfillment::Ed25519(e) => e.hash_fingerprint(),
            Fulfillment::Threshold(t) => t.hash_fingerprint(),
        }
    }

    pub fn calculate_max_fulfillment_length(&self) -> Result<u64> {
        match self {
            Fulfillment::Preimage(p) => p.calculate_max_fulfillment_length(),
            Fulfillment::Ed25519(e) => e.calculate_max_fulfillment_length(),
            Fulfillment::Threshold(t) => t.calculate_max_fulfillment_length(),
        }
    }

    pub fn serialize_payload(&self) -> Result<Vec<u8>> {
        match self {
            Fulfillment::Preimage(p) => p.serialize_payload(),
            Fulfillment::Ed25519(e) => e.serialize_payload(),
            Fulfillment::Threshold(t) => t.serialize_payload(),
        }
    }

    /// Validates this fulfillment against an optional message. Never
    /// returns an error for a cryptographic failure, only `false`; the only
    /// way this can error is the one documented re-serialization edge case
    /// in a threshold whose selection is unsatisfiable, which surfaces as
    /// `false` here rather than propagating (validation is total).
    pub fn validate(&self, message: Option<&[u8]>) -> bool {
        match self {
            Fulfillment::Preimage(p) => p.validate(message),
            Fulfillment::Ed25519(e) => e.validate(message),
            Fulfillment::Threshold(t) => t.validate(message),
        }
    }

    /// The condition this fulfillment derives. Idempotent and side-effect
    /// free; fails only if the fulfillment (or a descendant, for
    /// thresholds) is an incomplete builder.
    pub fn condition(&self) -> Result<Condition> {
        Ok(Condition::new(
            self.feature_bitmask()?,
            self.hash_fingerprint()?,
            self.calculate_max_fulfillment_length()?,
        ))
    }

    pub fn to_uri(&self) -> Result<String> {
        Ok(format!(
            "cf:{}:{:x}:{}",
            VERSION,
            self.type_bit(),
            base64url::encode(&self.serialize_payload()?)
        ))
    }

    pub fn from_uri(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix("cf:")
            .ok_or_else(|| Error::MalformedEncoding("fulfillment URI must start with 'cf:'".into()))?;

        let mut parts = rest.split(':');
        let version_str = next_part(&mut parts)?;
        let type_bit_str = next_part(&mut parts)?;
        let payload_str = next_part(&mut parts)?;
        if parts.next().is_some() {
            return Err(Error::MalformedEncoding(
                "fulfillment URI has too many ':'-separated fields".into(),
            ));
        }

        let version = parse_dec(version_str)?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        let type_bit = parse_hex(type_bit_str)?;
        let payload = base64url::decode(payload_str)?;

        let mut r = Reader::new(&payload);
        let f = dispatch_parse(type_bit, &mut r)?;
        r.expect_end()?;
        Ok(f)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.put_varuint(self.type_bit());
        out.put_fixed(&self.serialize_payload()?);
        Ok(out)
    }

    pub fn from_binary(buf: &[u8]) -> Result<Self> {
        let mut r = Reader::new(buf);
        let type_bit = r.read_varuint()?;
        let f = dispatch_parse(type_bit, &mut r)?;
        r.expect_end()?;
        Ok(f)
    }

    /// Parses `buf` the way [`Self::from_binary`] does, but first refuses to
    /// even attempt the parse if `buf` already exceeds `bound` bytes (the
    /// resource budget: a condition supplied as a trust root pins an upper
    /// bound on any fulfillment buffer worth allocating for it).
    pub fn from_binary_bounded(buf: &[u8], bound: u64) -> Result<Self> {
        let actual = buf.len() as u64;
        if actual > bound {
            return Err(Error::FulfillmentTooLarge { actual, bound });
        }
        Self::from_binary(buf)
    }

    /// URI-form counterpart of [`Self::from_binary_bounded`]: decodes the
    /// base64url payload, reconstructs the equivalent binary length, and
    /// applies the same bound before dispatching to the variant parser.
    pub fn from_uri_bounded(s: &str, bound: u64) -> Result<Self> {
        let rest = s
            .strip_prefix("cf:")
            .ok_or_else(|| Error::MalformedEncoding("fulfillment URI must start with 'cf:'".into()))?;

        let mut parts = rest.split(':');
        let version_str = next_part(&mut parts)?;
        let type_bit_str = next_part(&mut parts)?;
        let payload_str = next_part(&mut parts)?;
        if parts.next().is_some() {
            return Err(Error::MalformedEncoding(
                "fulfillment URI has too many ':'-separated fields".into(),
            ));
        }

        let version = parse_dec(version_str)?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        let type_bit = parse_hex(type_bit_str)?;
        let payload = base64url::decode(payload_str)?;

        let actual = cc_codec::encode_varuint(type_bit).len() as u64 + payload.len() as u64;
        if actual > bound {
            return Err(Error::FulfillmentTooLarge { actual, bound });
        }

        let mut r = Reader::new(&payload);
        let f = dispatch_parse(type_bit, &mut r)?;
        r.expect_end()?;
        Ok(f)
    }
}

/// Parses a fulfillment body of the given `type_bit` from `r`, which is
/// positioned right after the `type_bit` field (top-level) or right after a
/// threshold subentry's flags byte (nested). Shared between the three entry
/// points that need it so the variant dispatch is written once.
pub(crate) fn dispatch_parse(type_bit: u64, r: &mut Reader) -> Result<Fulfillment> {
    match type_bit {
        Preimage::TYPE_BIT => Ok(Fulfillment::Preimage(Preimage::parse_from_reader(r)?)),
        Ed25519::TYPE_BIT => Ok(Fulfillment::Ed25519(Ed25519::parse_from_reader(r)?)),
        Threshold::TYPE_BIT => Ok(Fulfillment::Threshold(Threshold::parse_from_reader(r)?)),
        other => Err(Error::UnsupportedType(other)),
    }
}

fn next_part<'a>(parts: &mut std::str::Split<'a, char>) -> Result<&'a str> {
    parts
        .next()
        .ok_or_else(|| Error::MalformedEncoding("fulfillment URI is missing a ':'-separated field".into()))
}

fn parse_dec(s: &str) -> Result<u64> {
    if s.is_empty() || (s.len() > 1 && s.starts_with('0')) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedEncoding(format!("invalid decimal field: {s:?}")));
    }
    s.parse::<u64>()
        .map_err(|_| Error::MalformedEncoding(format!("decimal field out of range: {s:?}")))
}

fn parse_hex(s: &str) -> Result<u64> {
    if s.is_empty()
        || (s.len() > 1 && s.starts_with('0'))
        || !s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    {
        return Err(Error::MalformedEncoding(format!("invalid hex field: {s:?}")));
    }
    u64::from_str_radix(s, 16).map_err(|_| Error::MalformedEncoding(format!("hex field out of range: {s:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_preimage_uri_matches_interop_vector() {
        let f = Fulfillment::Preimage(Preimage::new(Vec::new()));
        assert_eq!(f.to_uri().unwrap(), "cf:1:0:AA");
        assert_eq!(
            f.condition().unwrap().to_uri(),
            "cc:1:1:47DEQpj8HBSa-_TImW-5JCeuQeRkm5NMpJWZG3hSuFU:1"
        );
    }

    #[test]
    fn parsing_unknown_type_bit_fails() {
        // VARUINT(99) || empty payload, as a binary fulfillment.
        let mut buf = Vec::new();
        buf.put_varuint(99);
        let err = Fulfillment::from_binary(&buf).unwrap_err();
        assert_eq!(err, Error::UnsupportedType(99));
    }

    #[test]
    fn parsing_cf_1_0_aa_succeeds_and_validates() {
        let f = Fulfillment::from_uri("cf:1:0:AA").unwrap();
        assert!(f.validate(None));
    }

    #[test]
    fn parsing_bad_hex_type_bit_is_malformed() {
        let err = Fulfillment::from_uri("cf:1:ZZ:AA").unwrap_err();
        assert!(matches!(err, Error::MalformedEncoding(_)));
    }

    #[test]
    fn binary_roundtrips() {
        let f = Fulfillment::Preimage(Preimage::new(b"roundtrip me".to_vec()));
        let bin = f.to_binary().unwrap();
        let parsed = Fulfillment::from_binary(&bin).unwrap();
        assert_eq!(parsed, f);
    }

    #[test]
    fn bounded_binary_parse_accepts_within_bound_and_rejects_over() {
        let f = Fulfillment::Preimage(Preimage::new(b"trust root bound".to_vec()));
        let bin = f.to_binary().unwrap();
        let bound = bin.len() as u64;

        assert_eq!(Fulfillment::from_binary_bounded(&bin, bound).unwrap(), f);
        let err = Fulfillment::from_binary_bounded(&bin, bound - 1).unwrap_err();
        assert_eq!(
            err,
            Error::FulfillmentTooLarge {
                actual: bound,
                bound: bound - 1
            }
        );
    }

    #[test]
    fn bounded_uri_parse_rejects_over_bound() {
        let f = Fulfillment::Preimage(Preimage::new(b"trust root bound".to_vec()));
        let uri = f.to_uri().unwrap();
        let bin = f.to_binary().unwrap();
        let bound = bin.len() as u64;

        assert_eq!(Fulfillment::from_uri_bounded(&uri, bound).unwrap(), f);
        assert!(matches!(
            Fulfillment::from_uri_bounded(&uri, bound - 1).unwrap_err(),
            Error::FulfillmentTooLarge { .. }
        ));
    }
}
