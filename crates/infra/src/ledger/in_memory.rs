//! In-memory ledger for tests/dev.
//!
//! The reference stand-in for a relational database: one lock serializes
//! transactions the way row-level locking would for touching row sets.

use std::sync::Mutex;

use backstock_core::DomainResult;

use super::Ledger;
use super::tables::Tables;

/// In-memory transactional store.
///
/// A transaction clones the committed tables, runs the closure against the
/// copy, and swaps the copy in only on `Ok`. An `Err` or a panic inside the
/// closure leaves the committed state untouched.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: Mutex<Tables>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed initial rows (test fixtures, demo data) through one transaction.
    pub fn seed(&self, f: impl FnOnce(&mut Tables)) {
        let mut guard = self.lock();
        f(&mut guard);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        // A panicked transaction only ever touched its working copy, so the
        // committed state behind a poisoned lock is still consistent.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl backstock_auth::MembershipDirectory for InMemoryLedger {
    fn role_for(
        &self,
        store_id: backstock_core::StoreId,
        user_id: backstock_core::UserId,
    ) -> Option<backstock_auth::Role> {
        self.read(|tables| tables.role_for(store_id, user_id))
    }
}

impl Ledger for InMemoryLedger {
    fn with_transaction<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> DomainResult<T>,
    ) -> DomainResult<T> {
        let mut guard = self.lock();
        let mut working = guard.clone();
        let out = f(&mut working)?;
        *guard = working;
        Ok(out)
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        f(&self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backstock_catalog::Store;
    use backstock_core::{DomainError, StoreId};
    use chrono::Utc;

    fn store() -> Store {
        Store::new(StoreId::new(), "Acme", 10, Utc::now()).unwrap()
    }

    #[test]
    fn commits_on_success() {
        let ledger = InMemoryLedger::new();
        let s = store();
        let id = s.id;
        ledger
            .with_transaction(|tables| {
                tables.insert_store(s.clone());
                Ok(())
            })
            .unwrap();
        assert!(ledger.read(|tables| tables.store(id).is_ok()));
    }

    #[test]
    fn rolls_back_on_error() {
        let ledger = InMemoryLedger::new();
        let s = store();
        let id = s.id;
        let result: DomainResult<()> = ledger.with_transaction(|tables| {
            tables.insert_store(s.clone());
            Err(DomainError::validation("boom"))
        });
        assert!(result.is_err());
        assert!(ledger.read(|tables| tables.store(id).is_err()));
    }

    #[test]
    fn rolls_back_on_panic() {
        let ledger = InMemoryLedger::new();
        let s = store();
        let id = s.id;
        let panicked = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _: DomainResult<()> = ledger.with_transaction(|tables| {
                tables.insert_store(s.clone());
                panic!("mid-transaction failure");
            });
        }));
        assert!(panicked.is_err());
        // Committed state never saw the insert, and the ledger stays usable.
        assert!(ledger.read(|tables| tables.store(id).is_err()));
    }
}
