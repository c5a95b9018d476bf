use thiserror::Error;

/// Result type local to outbuf-mem.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("allocation budget exceeded for tag '{tag}': requested {requested} bytes, capacity {capacity}, used {used}")]
    BudgetExceeded {
        tag: &'static str,
        requested: usize,
        capacity: usize,
        used: usize,
    },

    #[error("allocation failed for {bytes} bytes")]
    AllocFailed { bytes: usize },

    #[error("capacity overflow: {size} bytes in use, {additional} more requested")]
    CapacityOverflow { size: usize, additional: usize },

    #[error("truncated LEB128 value: input ended after {read} bytes")]
    Leb128Truncated { read: usize },

    #[error("LEB128 value does not fit in {bits} bits")]
    Leb128Overflow { bits: u32 },

    #[error(transparent)]
    Core(#[from] outbuf_core::error::Error),
}
