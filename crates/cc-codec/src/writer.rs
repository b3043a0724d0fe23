use crate::varint::{encode_varbytes, encode_varuint};

/// Extends a `Vec<u8>` with the VARUINT/VARBYTES/VARARRAY grammar, the
/// writing-side counterpart of [`crate::reader::Reader`]. Mirrors the
/// builder-trait-on-`Vec<u8>` style used for length-prefixed field
/// construction elsewhere in the codebase, adapted to this crate's
/// little-endian base-128 wire format instead of fixed big-endian widths.
pub trait WriteBuf {
    fn put_varuint(&mut self, value: u64) -> &mut Self;
    fn put_varbytes(&mut self, data: &[u8]) -> &mut Self;
    fn put_fixed(&mut self, data: &[u8]) -> &mut Self;
    fn put_vararray<T>(&mut self, items: &[T], write_one: impl Fn(&mut Self, &T)) -> &mut Self;
}

impl WriteBuf for Vec<u8> {
    fn put_varuint(&mut self, value: u64) -> &mut Self {
        self.extend(encode_varuint(value));
        self
    }

    fn put_varbytes(&mut self, data: &[u8]) -> &mut Self {
        self.extend(encode_varbytes(data));
        self
    }

    fn put_fixed(&mut self, data: &[u8]) -> &mut Self {
        self.extend_from_slice(data);
        self
    }

    fn put_vararray<T>(&mut self, items: &[T], write_one: impl Fn(&mut Self, &T)) -> &mut Self {
        self.put_varuint(items.len() as u64);
        for item in items {
            write_one(self, item);
        }
        self
    }
}
