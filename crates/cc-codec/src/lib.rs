//! Binary and textual codec primitives shared by every record in the
//! `crypto-conditions` workspace: the VARUINT/VARBYTES/VARARRAY grammar and
//! a base64url-no-pad string codec.
//!
//! Nothing in this crate knows about conditions, fulfillments, or hashing —
//! it is the pure, reusable bottom layer the rest of the workspace builds on.

pub mod base64url;
pub mod error;
pub mod reader;
pub mod varint;
pub mod writer;

pub use error::CodecError;
pub use reader::Reader;
pub use varint::{decode_varbytes, decode_varuint, encode_varbytes, encode_varuint};
pub use writer::WriteBuf;
