//! outbuf: growable binary output buffer for compiler back ends.
//!
//! Facade over the workspace crates. `outbuf-core` holds configuration, errors
//! and the allocation-budget traits; `outbuf-mem` holds the buffer.

pub use outbuf_core as types;
pub use outbuf_mem as mem;

pub use outbuf_core::config::{BufferConfig, GrowthPolicy};
pub use outbuf_mem::{Error, Outbuffer, Reserved, Result, SharedBudget, SharedLease};
