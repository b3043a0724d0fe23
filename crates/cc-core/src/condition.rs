use std::cmp::Ordering;
use std::fmt;

use cc_codec::{base64url, Reader, WriteBuf};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// The only condition-encoding version this crate understands.
pub const VERSION: u64 = 1;

/// An immutable commitment to a predicate: `(version, type_bitmask, hash,
/// max_fulfillment_length)`. Two conditions are equal iff all four fields
/// are byte-equal; the URI and binary forms are pure functions of this
/// record, so `Condition` never needs to track which form it was built
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    version: u64,
    type_bitmask: u64,
    hash: Vec<u8>,
    max_fulfillment_length: u64,
}

impl Condition {
    /// Constructs a condition directly from its four fields. This is the
    /// one place a `Condition` comes into being other than parsing; every
    /// fulfillment variant's `condition()` method funnels through here.
    pub fn new(type_bitmask: u64, hash: Vec<u8>, max_fulfillment_length: u64) -> Self {
        Condition {
            version: VERSION,
            type_bitmask,
            hash,
            max_fulfillment_length,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn type_bitmask(&self) -> u64 {
        self.type_bitmask
    }

    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    pub fn max_fulfillment_length(&self) -> u64 {
        self.max_fulfillment_length
    }

    /// `"cc:" DEC(version) ":" HEX(type_bitmask) ":" B64URL(hash) ":" DEC(max_fulfillment_length)`
    pub fn to_uri(&self) -> String {
        format!(
            "cc:{}:{:x}:{}:{}",
            self.version,
            self.type_bitmask,
            base64url::encode(&self.hash),
            self.max_fulfillment_length
        )
    }

    pub fn from_uri(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix("cc:")
            .ok_or_else(|| Error::MalformedEncoding("condition URI must start with 'cc:'".into()))?;

        let mut parts = rest.split(':');
        let version_str = next_part(&mut parts)?;
        let bitmask_str = next_part(&mut parts)?;
        let hash_str = next_part(&mut parts)?;
        let length_str = next_part(&mut parts)?;
        if parts.next().is_some() {
            return Err(Error::MalformedEncoding(
                "condition URI has too many ':'-separated fields".into(),
            ));
        }

        let version = parse_dec(version_str)?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        let type_bitmask = parse_hex(bitmask_str)?;
        let hash = base64url::decode(hash_str)?;
        let max_fulfillment_length = parse_dec(length_str)?;

        Ok(Condition {
            version,
            type_bitmask,
            hash,
            max_fulfillment_length,
        })
    }

    /// `VARUINT type_bitmask || VARBYTES hash || VARUINT max_fulfillment_length`
    /// The version is implicit (always 1) and not written to the wire.
    pub fn to_binary(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.put_varuint(self.type_bitmask)
            .put_varbytes(&self.hash)
            .put_varuint(self.max_fulfillment_length);
        out
    }

    pub fn from_binary(buf: &[u8]) -> Result<Self> {
        let mut r = Reader::new(buf);
        let type_bitmask = r.read_varuint()?;
        let hash = r.read_varbytes()?;
        let max_fulfillment_length = r.read_varuint()?;
        r.expect_end()?;
        Ok(Condition {
            version: VERSION,
            type_bitmask,
            hash,
            max_fulfillment_length,
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri())
    }
}

/// Conditions order by their binary form, used as the threshold selection
/// tiebreak.
impl PartialOrd for Condition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Condition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_binary().cmp(&other.to_binary())
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_uri())
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Condition::from_uri(&s).map_err(de::Error::custom)
    }
}

fn next_part<'a>(parts: &mut std::str::Split<'a, char>) -> Result<&'a str> {
    parts
        .next()
        .ok_or_else(|| Error::MalformedEncoding("condition URI is missing a ':'-separated field".into()))
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
