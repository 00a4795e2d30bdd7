//! Contains the trait and SQLite implementation for storing the domain
//! [models](crate::models).

mod sqlite;
mod transaction;

pub use sqlite::SQLiteTransactionStore;
pub use transaction::TransactionStore;
