//! Defines the transaction store trait.

use crate::{
    Error,
    models::{NewTransaction, SessionId, Transaction, TransactionId},
};

/// Handles the creation and retrieval of transactions.
///
/// Every read is scoped to a session: a store never hands out another
/// session's transactions.
pub trait TransactionStore {
    /// Insert a new transaction, assigning it a fresh ID and creation
    /// timestamp.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve the transaction with `id` belonging to `session_id`.
    ///
    /// Returns [None] when no transaction matches, including when the ID
    /// exists but belongs to a different session. Callers cannot tell the
    /// two cases apart, so they cannot probe for other sessions' entries.
    fn get(
        &self,
        id: TransactionId,
        session_id: &SessionId,
    ) -> Result<Option<Transaction>, Error>;

    /// Retrieve all transactions belonging to `session_id`, in storage order.
    fn get_by_session(&self, session_id: &SessionId) -> Result<Vec<Transaction>, Error>;

    /// Sum the signed amounts of all transactions belonging to `session_id`.
    ///
    /// A session with no transactions sums to zero.
    fn sum_by_session(&self, session_id: &SessionId) -> Result<f64, Error>;
}
