use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backstock_core::{DomainError, DomainResult, StoreId};

/// A store: the multi-tenant boundary everything else is scoped under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    /// URL-safe handle, unique across stores. `[a-z0-9-]+`.
    pub slug: String,
    /// An adjustment leaving `available` at or below this raises a low-stock
    /// alert.
    pub low_stock_threshold: i64,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn new(
        id: StoreId,
        name: impl Into<String>,
        low_stock_threshold: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("store name cannot be empty"));
        }
        if low_stock_threshold < 0 {
            return Err(DomainError::validation(
                "low stock threshold cannot be negative",
            ));
        }
        let slug = slugify(&name);
        Ok(Self {
            id,
            name,
            slug,
            low_stock_threshold,
            created_at: now,
        })
    }

    /// Order-number prefix: first three slug characters, uppercased, falling
    /// back to `ORD` for very short slugs.
    pub fn order_prefix(&self) -> String {
        let prefix: String = self
            .slug
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(3)
            .collect::<String>()
            .to_ascii_uppercase();
        if prefix.is_empty() {
            "ORD".to_string()
        } else {
            prefix
        }
    }
}

/// Lowercase the name and collapse every non-alphanumeric run into a single
/// dash, trimming dashes at the ends.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
