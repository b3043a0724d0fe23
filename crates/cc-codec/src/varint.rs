use crate::error::CodecError;

/// Maximum number of continuation groups a canonical VARUINT can occupy.
/// `ceil(64 / 7) == 10` groups cover the full `u64` range.
const MAX_VARUINT_BYTES: usize = 10;

/// Encodes `value` as a little-endian base-128 VARUINT: each byte carries 7
/// payload bits in its low order bits, with the high bit set on every byte
/// but the last. This is always the canonical (minimal-length) encoding.
pub fn encode_varuint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARUINT_BYTES);
    let mut remaining = value;
    loop {
        let mut byte = (remaining & 0x7f) as u8;
        remaining >>= 7;
        if remaining != 0 {
            byte |= 0x80;
            out.push(byte);
        } else {
            out.push(byte);
            break;
        }
    }
    out
}

/// Decodes a VARUINT from the front of `buf`, returning the value and the
/// number of bytes consumed. Rejects truncated input, non-canonical
/// trailing-zero encodings, and values that would not fit in a `u64`.
pub fn decode_varuint(buf: &[u8]) -> Result<(u64, usize), CodecError> {
    let mut result: u128 = 0;
    let mut shift: u32 = 0;
    let mut consumed = 0usize;

    loop {
        if consumed >= MAX_VARUINT_BYTES {
            return Err(CodecError::VaruintOverflow);
        }
        let Some(&byte) = buf.get(consumed) else {
            return Err(CodecError::Truncated {
                expected: 1,
                found: 0,
            });
        };
        let continuation = byte & 0x80 != 0;
        result |= ((byte & 0x7f) as u128) << shift;
        consumed += 1;

        if !continuation {
            // A final byte of zero is only canonical when it is the sole byte
            // (i.e. the encoded value is itself zero).
            if consumed > 1 && byte == 0 {
                return Err(CodecError::NonCanonicalVaruint);
            }
            break;
        }
        shift += 7;
    }

    if result > u64::MAX as u128 {
        return Err(CodecError::VaruintOverflow);
    }
    Ok((result as u64, consumed))
}

/// Encodes `data` as VARBYTES: a VARUINT length prefix followed by the raw
/// payload bytes.
pub fn encode_varbytes(data: &[u8]) -> Vec<u8> {
    let mut out = encode_varuint(data.len() as u64);
    out.extend_from_slice(data);
    out
}

/// Decodes VARBYTES from the front of `buf`, returning the payload and the
/// number of bytes consumed (length prefix + payload).
pub fn decode_varbytes(buf: &[u8]) -> Result<(Vec<u8>, usize), CodecError> {
    let (len, prefix_len) = decode_varuint(buf)?;
    let remaining = &buf[prefix_len..];
    if len > remaining.len() as u64 {
        return Err(CodecError::LengthExceedsBuffer {
            len,
            remaining: remaining.len(),
        });
    }
    let len = len as usize;
    Ok((remaining[..len].to_vec(), prefix_len + len))
}
