use rust_decimal::Decimal;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

use crate::classifier;
use crate::loader::{self, LoadError};
use crate::store::{CategoryStore, StoreError};
use crate::summary::{self, CategoryTotal};
use crate::transaction::Transaction;

/// Possible errors to occur while operating on a session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("there is no expense row with index {0}")]
    RowOutOfRange(usize),
}

/// The application state for one interactive review session
///
/// A session owns the category store, the path it persists to, and the
/// transactions from the most recent upload, split into expenses
/// (`amount > 0`, subject to classification) and payments (`amount < 0`,
/// summarized only). Every successful store mutation is persisted
/// immediately; there is no batching of edits. When a save fails the
/// in-memory change is kept and the error is returned to the caller.
#[derive(Debug)]
pub struct Session {
    store: CategoryStore,
    store_path: PathBuf,
    expenses: Vec<Transaction>,
    payments: Vec<Transaction>,
}

impl Session {
    /// Opens a session, loading the category store from `store_path`
    ///
    /// A missing or unreadable store file degrades to the default store; it
    /// never prevents the session from starting.
    pub fn open(store_path: impl Into<PathBuf>) -> Self {
        let store_path = store_path.into();
        let store = CategoryStore::load(&store_path);
        Self {
            store,
            store_path,
            expenses: Vec::new(),
            payments: Vec::new(),
        }
    }

    /// The category store backing this session
    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    /// The classifiable transactions from the current upload (`amount > 0`)
    pub fn expenses(&self) -> &[Transaction] {
        &self.expenses
    }

    /// The payment transactions from the current upload (`amount < 0`)
    pub fn payments(&self) -> &[Transaction] {
        &self.payments
    }

    /// The known category names, for selection UIs
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.store.names()
    }

    /// Replaces the session's transactions with the contents of an upload
    ///
    /// Expenses are auto-classified against the current store as they come
    /// in. Transactions with a zero or missing amount land in neither
    /// bucket. On error the previous upload, if any, is kept.
    pub fn load_transactions<R: Read>(&mut self, reader: R) -> Result<(), LoadError> {
        let transactions = loader::load_transactions(reader)?;

        self.expenses.clear();
        self.payments.clear();
        for mut transaction in transactions {
            match transaction.amount() {
                Some(amount) if amount > Decimal::ZERO => {
                    let category =
                        classifier::classify(&self.store, transaction.description()).to_string();
                    transaction.set_category(category);
                    self.expenses.push(transaction);
                }
                Some(amount) if amount < Decimal::ZERO => self.payments.push(transaction),
                _ => {}
            }
        }
        info!(
            "loaded {} expenses and {} payments",
            self.expenses.len(),
            self.payments.len()
        );
        Ok(())
    }

    /// Creates a new category and persists the store
    ///
    /// Returns whether the category was actually created; duplicates and
    /// empty names are a no-op.
    pub fn add_category(&mut self, name: &str) -> Result<bool, StoreError> {
        let added = self.store.add_category(name);
        if added {
            self.store.save(&self.store_path)?;
        }
        Ok(added)
    }

    /// Associates a keyword with an existing category and persists the store
    pub fn add_keyword(&mut self, category: &str, keyword: &str) -> Result<bool, StoreError> {
        let added = self.store.add_keyword(category, keyword)?;
        if added {
            self.store.save(&self.store_path)?;
        }
        Ok(added)
    }

    /// Assigns an expense row to a category
    ///
    /// The row's full description is recorded as a keyword under `category`
    /// so future uploads classify it automatically, and the store is
    /// persisted. Assigning to a category that does not exist is rejected
    /// without touching the row or the store.
    pub fn assign_category(&mut self, row: usize, category: &str) -> Result<(), SessionError> {
        if !self.store.contains(category) {
            return Err(StoreError::UnknownCategory(category.to_string()).into());
        }
        let description = self
            .expenses
            .get(row)
            .ok_or(SessionError::RowOutOfRange(row))?
            .description()
            .to_string();

        let added = classifier::record_assignment(&mut self.store, category, &description)?;
        self.expenses[row].set_category(category);
        if added {
            self.store.save(&self.store_path)?;
        }
        Ok(())
    }

    /// Re-runs classification over all expenses with the current store
    ///
    /// Useful after keywords have been edited through [`Session::add_keyword`]
    /// rather than row assignments.
    pub fn reclassify(&mut self) {
        for transaction in &mut self.expenses {
            let category =
                classifier::classify(&self.store, transaction.description()).to_string();
            transaction.set_category(category);
        }
    }

    /// The per-category expense totals
    pub fn summary(&self) -> Vec<CategoryTotal> {
        summary::summarize(&self.expenses)
    }

    /// The sum of all payment amounts
    pub fn total_payments(&self) -> Decimal {
        summary::total_negative(&self.payments)
    }
}
