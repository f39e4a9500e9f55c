//! The category matching logic.
//!
//! Matching is deliberately exact-string, not fuzzy: when a user assigns a
//! category, the entire raw description is recorded as a keyword, and a
//! future transaction matches only when its trimmed description equals a
//! recorded keyword. Deterministic and auditable, at the cost of not
//! generalizing to descriptions that vary slightly.

use crate::store::{Category, CategoryStore, StoreError, UNCATEGORIZED};

/// Determines the category for a transaction description
///
/// Categories are scanned in store insertion order and the first one holding
/// a matching keyword wins, so classification is reproducible for a fixed
/// store state. An empty description, or one no keyword matches, returns
/// [`UNCATEGORIZED`].
pub fn classify<'a>(store: &'a CategoryStore, description: &str) -> &'a str {
    let description = description.trim();
    if description.is_empty() {
        return UNCATEGORIZED;
    }
    store
        .iter()
        .filter(|category| category.name() != UNCATEGORIZED)
        .find(|category| category.keywords().iter().any(|keyword| keyword == description))
        .map(Category::name)
        .unwrap_or(UNCATEGORIZED)
}

/// Records a user's explicit category assignment
///
/// The whole raw description becomes a keyword under `category`, so the next
/// transaction with the same description classifies the same way. Returns
/// whether a new keyword was actually added; repeating an assignment is a
/// no-op.
pub fn record_assignment(
    store: &mut CategoryStore,
    category: &str,
    description: &str,
) -> Result<bool, StoreError> {
    store.add_keyword(category, description)
}
