//! The three fulfillment variants (Preimage-SHA-256, Ed25519-SHA-256,
//! Threshold-SHA-256), their uniform `cf:`/binary wrapper, and the
//! threshold branch-and-bound selection evaluator.

mod config;
mod ed25519;
mod fulfillment;
mod preimage;
mod sha256;
mod threshold;

pub use config::SelectionLimits;
pub use ed25519::Ed25519;
pub use fulfillment::Fulfillment;
pub use preimage::Preimage;
pub use threshold::Threshold;
