use thiserror::Error;

use cc_codec::CodecError;

/// The seven distinguishable failure modes a caller of this crate can act on
/// programmatically. Every parse, build, and derivation path in the
/// workspace returns one of these tags (or propagates a [`CodecError`]
/// folded into [`Error::MalformedEncoding`]); `validate` never returns an
/// error for a cryptographic failure, only `false`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("unsupported fulfillment type bit: {0}")]
    UnsupportedType(u64),

    #[error("unsupported version: {0} (only version 1 is defined)")]
    UnsupportedVersion(u64),

    #[error("fulfillment is incomplete: {0}")]
    IncompleteFulfillment(&'static str),

    #[error("no subset of sub-fulfillments satisfies the threshold")]
    UnsatisfiedThreshold,

    #[error("signing key does not derive the fulfillment's public key")]
    KeyMismatch,

    #[error("fulfillment ({actual} bytes) exceeds max_fulfillment_length ({bound} bytes)")]
    FulfillmentTooLarge { actual: u64, bound: u64 },
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Error::MalformedEncoding(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
