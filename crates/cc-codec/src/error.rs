use thiserror::Error;

/// Failure modes for the binary and URI codecs.
///
/// Every codec primitive in this crate folds down to this one error: a
/// well-formed value either decodes cleanly or it doesn't, and the caller
/// never needs more detail than "where" and "why" to act on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("truncated input: expected {expected} more byte(s), found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("non-canonical VARUINT encoding")]
    NonCanonicalVaruint,

    #[error("VARUINT value exceeds u64 range")]
    VaruintOverflow,

    #[error("VARBYTES length prefix ({len}) exceeds remaining buffer ({remaining})")]
    LengthExceedsBuffer { len: u64, remaining: usize },

    #[error("{0} trailing byte(s) left unconsumed after top-level decode")]
    TrailingBytes(usize),

    #[error("invalid base64url character")]
    InvalidBase64,
}
