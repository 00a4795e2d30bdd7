//! Implements a struct that holds the state of the REST server.

use crate::stores::TransactionStore;

/// The state of the REST server.
///
/// The store handle is injected here and passed to handlers through axum's
/// `State` extractor, so there is no module-wide persistence handle.
#[derive(Debug, Clone)]
pub struct AppState<T>
where
    T: TransactionStore + Send + Sync,
{
    /// The store for managing a session's [transactions](crate::models::Transaction).
    pub transaction_store: T,
}

impl<T> AppState<T>
where
    T: TransactionStore + Send + Sync,
{
    /// Create a new [AppState].
    pub fn new(transaction_store: T) -> Self {
        Self { transaction_store }
    }
}
