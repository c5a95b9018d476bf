#![forbid(unsafe_code)]
//! outbuf-core: shared vocabulary for the outbuf workspace.
//!
//! Holds the error type, the buffer configuration and the allocation-budget
//! *interfaces*. The buffer itself and the concrete budget live in
//! `outbuf-mem`.

pub mod budget;
pub mod config;
pub mod error;
pub mod prelude;
