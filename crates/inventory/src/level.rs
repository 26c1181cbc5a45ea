use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backstock_core::{DomainError, DomainResult, LocationId, VariantId};

/// Stock counters for one (variant, location) pair.
///
/// The pair is unique in the ledger; the three counters are always persisted,
/// never inferred, and each stays non-negative:
///
/// - `available`: free to be reserved.
/// - `committed`: reserved against open orders, physically still on the shelf.
/// - `incoming`: expected but not yet received. No operation here mutates it.
///
/// The three primitives below are all-or-nothing on a single row: a failed
/// call leaves every counter exactly as it was. They do **not** deduplicate
/// retries; idempotency belongs to the calling service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLevel {
    pub variant_id: VariantId,
    pub location_id: LocationId,
    pub available: i64,
    pub committed: i64,
    pub incoming: i64,
    pub updated_at: DateTime<Utc>,
}

impl InventoryLevel {
    /// A fresh row with every counter at zero.
    pub fn empty(variant_id: VariantId, location_id: LocationId, now: DateTime<Utc>) -> Self {
        Self {
            variant_id,
            location_id,
            available: 0,
            committed: 0,
            incoming: 0,
            updated_at: now,
        }
    }

    /// `available += delta`. Fails without mutating if the result would be
    /// negative.
    pub fn adjust(&mut self, delta: i64, now: DateTime<Utc>) -> DomainResult<()> {
        let new_available = self
            .available
            .checked_add(delta)
            .ok_or_else(|| DomainError::validation("inventory adjustment overflows"))?;
        if new_available < 0 {
            return Err(DomainError::NegativeInventory);
        }
        self.available = new_available;
        self.updated_at = now;
        Ok(())
    }

    /// Move `quantity` units from `available` to `committed`.
    pub fn reserve(&mut self, quantity: i64, now: DateTime<Utc>) -> DomainResult<()> {
        if self.available < quantity {
            return Err(DomainError::InsufficientInventory {
                requested: quantity,
                available: self.available,
            });
        }
        self.available -= quantity;
        self.committed += quantity;
        self.updated_at = now;
        Ok(())
    }

    /// Release `quantity` committed units: the physical stock has left the
    /// warehouse. `available` is untouched; it was already decremented at
    /// reservation time.
    pub fn fulfill(&mut self, quantity: i64, now: DateTime<Utc>) -> DomainResult<()> {
        if self.committed < quantity {
            return Err(DomainError::InsufficientCommitted {
                requested: quantity,
                committed: self.committed,
            });
        }
        self.committed -= quantity;
        self.updated_at = now;
        Ok(())
    }

    pub fn in_stock(&self) -> bool {
        self.available > 0
    }

    pub fn out_of_stock(&self) -> bool {
        self.available == 0
    }

    /// At or below the store's configured threshold.
    pub fn low_stock(&self, threshold: i64) -> bool {
        self.available <= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn level(available: i64, committed: i64) -> InventoryLevel {
        InventoryLevel {
            variant_id: VariantId::new(),
            location_id: LocationId::new(),
            available,
            committed,
            incoming: 0,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn adjust_applies_delta_and_leaves_other_counters() {
        let mut row = level(50, 3);
        row.adjust(25, Utc::now()).unwrap();
        assert_eq!(row.available, 75);
        assert_eq!(row.committed, 3);
        assert_eq!(row.incoming, 0);
    }

    #[test]
    fn adjust_below_zero_fails_without_mutation() {
        let mut row = level(50, 0);
        let err = row.adjust(-100, Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::NegativeInventory);
        assert_eq!(row.available, 50);
    }

    #[test]
    fn adjust_overflowing_delta_fails_without_mutation() {
        let mut row = level(1, 0);
        let err = row.adjust(i64::MAX, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(row.available, 1);
    }

    #[test]
    fn reserve_moves_units_from_available_to_committed() {
        let mut row = level(50, 0);
        row.reserve(20, Utc::now()).unwrap();
        assert_eq!(row.available, 30);
        assert_eq!(row.committed, 20);
    }

    #[test]
    fn reserve_beyond_available_fails_and_leaves_row_unchanged() {
        let mut row = level(50, 0);
        let err = row.reserve(100, Utc::now()).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientInventory {
                requested: 100,
                available: 50
            }
        );
        assert_eq!(row.available, 50);
        assert_eq!(row.committed, 0);
    }

    #[test]
    fn fulfill_decrements_committed_only() {
        let mut row = level(10, 8);
        row.fulfill(5, Utc::now()).unwrap();
        assert_eq!(row.available, 10);
        assert_eq!(row.committed, 3);
    }

    #[test]
    fn fulfill_beyond_committed_fails_and_leaves_row_unchanged() {
        let mut row = level(10, 2);
        let err = row.fulfill(5, Utc::now()).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientCommitted {
                requested: 5,
                committed: 2
            }
        );
        assert_eq!(row.committed, 2);
    }

    proptest! {
        /// Counters never go negative under any interleaving of the three
        /// primitives, and a successful reserve conserves available+committed.
        #[test]
        fn counters_stay_non_negative(
            start in 0i64..10_000,
            ops in proptest::collection::vec((0u8..3, 0i64..500), 1..40),
        ) {
            let mut row = level(start, 0);
            for (op, amount) in ops {
                let before = row.clone();
                let result = match op {
                    0 => row.adjust(amount - 250, Utc::now()),
                    1 => row.reserve(amount, Utc::now()),
                    _ => row.fulfill(amount, Utc::now()),
                };
                if result.is_err() {
                    prop_assert_eq!(row.available, before.available);
                    prop_assert_eq!(row.committed, before.committed);
                }
                prop_assert!(row.available >= 0);
                prop_assert!(row.committed >= 0);
                if op == 1 && result.is_ok() {
                    prop_assert_eq!(
                        row.available + row.committed,
                        before.available + before.committed
                    );
                }
            }
        }
    }
}
