//! Convenient re-exports for downstream crates.

pub use crate::budget::{AllocBudget, AllocLease};
pub use crate::config::{BufferConfig, GrowthPolicy};
pub use crate::error::{Error, Result};
