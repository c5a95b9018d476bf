#![forbid(unsafe_code)]
//! outbuf-mem: the growable binary output buffer.
//!
//! `Outbuffer` assembles byte-oriented output (object-code sections,
//! debug-info records) without knowing the final size up front. Growth is
//! governed by the `GrowthPolicy` from `outbuf-core` and may be accounted
//! against a shared allocation budget (`SharedBudget`).
//!
//! Writes come in two tiers: checked writers grow on demand, unchecked `_n`
//! writers and the `Reserved` token never grow and panic if the caller did
//! not reserve enough.

pub mod budget;
pub mod error;
pub mod growth;
pub mod leb128;
pub mod outbuf;
pub mod reserved;

pub use budget::{SharedBudget, SharedLease};
pub use error::{Error, Result};
pub use leb128::{decode_sleb128, decode_uleb128, sleb128_len, uleb128_len};
pub use outbuf::Outbuffer;
pub use reserved::Reserved;
