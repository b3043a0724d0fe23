use crate::error::CodecError;

/// Encodes `data` as base64url with no `=` padding, e.g. for embedding a
/// condition hash or fulfillment payload in a `cc:`/`cf:` URI.
pub fn encode(data: &[u8]) -> String {
    base64_url::encode(data)
}

/// Decodes a base64url string with no `=` padding. `base64_url::decode`
/// already tolerates a missing-padding input and rejects characters outside
/// the URL-safe alphabet; this wraps that in the crate's own error type.
pub fn decode(s: &str) -> Result<Vec<u8>, CodecError> {
    base64_url::decode(s).map_err(|_| CodecError::InvalidBase64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roundtrip() {
        assert_eq!(encode(b""), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn known_vector() {
        assert_eq!(encode(b"any carnal pleasure."), "YW55IGNhcm5hbCBwbGVhc3VyZS4");
        assert_eq!(decode("YW55IGNhcm5hbCBwbGVhc3VyZS4").unwrap(), b"any carnal pleasure.");
    }

    #[test]
    fn rejects_invalid_alphabet() {
        assert_eq!(decode("not valid base64!").unwrap_err(), CodecError::InvalidBase64);
    }
}
