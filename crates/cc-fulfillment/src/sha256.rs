//! SHA-256 wrapped behind a single function so the rest of the crate never
//! touches `openssl` directly, mirroring the grounding workspace's own
//! `packing/src/feistel.rs`, which hashes through `openssl::sha::Sha256`
//! rather than inlining the digest crate at every call site.

use openssl::sha::Sha256;

pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finish()
}
