//! Shared allocation budget and its RAII lease.
//!
//! A `SharedBudget` is a byte ceiling that many buffers draw from. Each
//! budgeted buffer holds one `SharedLease` sized to its current capacity;
//! growth resizes the lease first and dropping the buffer returns the bytes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use outbuf_core::budget::{AllocBudget, AllocLease};

struct Ledger {
    ceiling: usize,
    leased: AtomicUsize,
}

impl Ledger {
    fn take(&self, bytes: usize) -> bool {
        self.leased
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| {
                cur.checked_add(bytes).filter(|&next| next <= self.ceiling)
            })
            .is_ok()
    }

    fn give_back(&self, bytes: usize) {
        self.leased.fetch_sub(bytes, Ordering::AcqRel);
    }

    fn leased(&self) -> usize {
        self.leased.load(Ordering::Relaxed)
    }
}

/// Byte ceiling shared by any number of buffers. Cloning shares the ledger.
#[derive(Clone)]
pub struct SharedBudget {
    ledger: Arc<Ledger>,
}

impl SharedBudget {
    pub fn new(ceiling_bytes: usize) -> Self {
        Self {
            ledger: Arc::new(Ledger {
                ceiling: ceiling_bytes,
                leased: AtomicUsize::new(0),
            }),
        }
    }
}

impl std::fmt::Debug for SharedBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedBudget")
            .field("ceiling", &self.ledger.ceiling)
            .field("leased", &self.ledger.leased())
            .finish()
    }
}

impl AllocBudget for SharedBudget {
    type Lease = SharedLease;

    fn try_lease(&self, bytes: usize, tag: &'static str) -> Option<SharedLease> {
        if bytes > 0 && !self.ledger.take(bytes) {
            return None;
        }
        Some(SharedLease {
            ledger: Arc::clone(&self.ledger),
            bytes,
            tag,
        })
    }

    fn capacity_bytes(&self) -> usize {
        self.ledger.ceiling
    }

    fn used_bytes(&self) -> usize {
        self.ledger.leased()
    }
}

/// Bytes leased from a `SharedBudget`. Returned on drop.
pub struct SharedLease {
    ledger: Arc<Ledger>,
    bytes: usize,
    tag: &'static str,
}

impl SharedLease {
    /// Ceiling of the budget this lease was drawn from.
    pub fn budget_capacity(&self) -> usize {
        self.ledger.ceiling
    }

    /// Bytes leased from the budget by everyone, this lease included.
    pub fn budget_used(&self) -> usize {
        self.ledger.leased()
    }
}

impl AllocLease for SharedLease {
    fn bytes(&self) -> usize {
        self.bytes
    }

    fn tag(&self) -> &'static str {
        self.tag
    }

    fn try_resize(&mut self, new_bytes: usize) -> bool {
        if new_bytes <= self.bytes {
            self.ledger.give_back(self.bytes - new_bytes);
        } else if !self.ledger.take(new_bytes - self.bytes) {
            return false;
        }
        self.bytes = new_bytes;
        true
    }
}

impl Drop for SharedLease {
    fn drop(&mut self) {
        if self.bytes > 0 {
            self.ledger.give_back(self.bytes);
            self.bytes = 0;
        }
    }
}
