use crate::error::CodecError;
use crate::varint::{decode_varbytes, decode_varuint};

/// A forward-only cursor over a byte slice, used to sequentially decode the
/// VARUINT/VARBYTES/VARARRAY grammar without every call site re-deriving
/// offsets by hand.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn read_varuint(&mut self) -> Result<u64, CodecError> {
        let (value, consumed) = decode_varuint(self.remaining())?;
        self.pos += consumed;
        Ok(value)
    }

    pub fn read_varbytes(&mut self) -> Result<Vec<u8>, CodecError> {
        let (value, consumed) = decode_varbytes(self.remaining())?;
        self.pos += consumed;
        Ok(value)
    }

    /// Reads a fixed number of raw bytes with no length prefix (used for the
    /// fixed-width Ed25519 public key and signature fields).
    pub fn read_fixed(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let rem = self.remaining();
        if rem.len() < n {
            return Err(CodecError::Truncated {
                expected: n,
                found: rem.len(),
            });
        }
        let out = &rem[..n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_fixed(1)?[0])
    }

    /// Decodes a VARARRAY: a VARUINT element count followed by that many
    /// elements, each produced by `decode_one`.
    pub fn read_vararray<T>(
        &mut self,
        mut decode_one: impl FnMut(&mut Reader<'a>) -> Result<T, CodecError>,
    ) -> Result<Vec<T>, CodecError> {
        let count = self.read_varuint()?;
        let mut out = Vec::with_capacity(count.min(4096) as usize);
        for _ in 0..count {
            out.push(decode_one(self)?);
        }
        Ok(out)
    }

    /// Asserts that every byte of the buffer has been consumed; used after
    /// decoding a top-level condition or fulfillment.
    pub fn expect_end(&self) -> Result<(), CodecError> {
        let left = self.remaining().len();
        if left != 0 {
            return Err(CodecError::TrailingBytes(left));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_sequence_and_detects_trailing_bytes() {
        let mut buf = Vec::new();
        buf.extend(crate::varint::encode_varuint(42));
        buf.extend(crate::varint::encode_varbytes(b"abc"));
        buf.push(0xff); // trailing byte

        let mut r = Reader::new(&buf);
        assert_eq!(r.read_varuint().unwrap(), 42);
        assert_eq!(r.read_varbytes().unwrap(), b"abc");
        assert_eq!(r.expect_end().unwrap_err(), CodecError::TrailingBytes(1));
    }

    #[test]
    fn reads_vararray_of_varuints() {
        let mut buf = Vec::new();
        buf.extend(crate::varint::encode_varuint(3));
        buf.extend(crate::varint::encode_varuint(10));
        buf.extend(crate::varint::encode_varuint(20));
        buf.extend(crate::varint::encode_varuint(30));

        let mut r = Reader::new(&buf);
        let items = r.read_vararray(|r| r.read_varuint()).unwrap();
        assert_eq!(items, vec![10, 20, 30]);
        r.expect_end().unwrap();
    }
}
