//! The ledger store: transactional relational state.

pub mod in_memory;
pub mod tables;

pub use in_memory::InMemoryLedger;
pub use tables::{LevelKey, Tables};

use backstock_core::DomainResult;

/// Transaction seam over the relational state.
///
/// `with_transaction` runs `f` against a working copy of the tables and
/// commits only if `f` returns `Ok`:
///
/// - commit on success
/// - rollback on error
/// - rollback on panic (the unwind never reaches the committed state)
///
/// Concurrent transactions against the same ledger serialize; a multi-step
/// mutation either fully precedes or fully follows another, never interleaves.
pub trait Ledger: Send + Sync {
    fn with_transaction<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> DomainResult<T>,
    ) -> DomainResult<T>;

    /// Read-only access outside any transaction.
    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T;
}
