//! The `Condition` record, the shared [`Error`] type every crate
//! in the workspace returns, and the version-1 feature bitmask registry.

pub mod condition;
pub mod error;
pub mod registry;

pub use condition::{Condition, VERSION};
pub use error::{Error, Result};
pub use registry::{describe_bitmask, FeatureBit, FEATURE_REGISTRY};
