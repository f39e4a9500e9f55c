pub use self::{
    classifier::{classify, record_assignment},
    loader::{load_transactions, LoadError},
    session::{Session, SessionError},
    store::{Category, CategoryStore, StoreError, UNCATEGORIZED},
    summary::{summarize, total_negative, CategoryTotal},
    transaction::Transaction,
};

mod classifier;
mod loader;
mod session;
mod store;
mod summary;
mod transaction;
