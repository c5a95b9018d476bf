//! Abstract allocation budget interfaces.
//!
//! The buffer treats the allocator as an external collaborator: before an
//! owned buffer grows it asks a budget for the extra bytes. The concrete
//! implementation lives in `outbuf-mem`; only traits live here.

/// A lease returned by an allocation budget.
///
/// Must be RAII: dropping the lease returns its bytes to the budget.
pub trait AllocLease: Send {
    /// Number of bytes currently accounted for by this lease.
    fn bytes(&self) -> usize;

    /// Debug tag for tracing.
    fn tag(&self) -> &'static str {
        "lease"
    }

    /// Resize the lease. Shrinking always succeeds; growing succeeds only if
    /// the budget can cover the difference. On failure the lease is unchanged.
    fn try_resize(&mut self, new_bytes: usize) -> bool;
}

/// A byte ceiling shared by any number of buffers.
pub trait AllocBudget: Send + Sync + 'static {
    type Lease: AllocLease;

    /// Attempt to lease `bytes` from the budget.
    fn try_lease(&self, bytes: usize, tag: &'static str) -> Option<Self::Lease>;

    /// Total configured capacity (bytes).
    fn capacity_bytes(&self) -> usize;

    /// Bytes currently leased (advisory).
    fn used_bytes(&self) -> usize;
}

// NOTE: no blanket "unlimited" impl here; an unbudgeted buffer simply carries
// no lease.
