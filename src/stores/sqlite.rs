//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{NewTransaction, SessionId, Transaction, TransactionId},
    stores::TransactionStore,
};

/// Stores transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// The ID and creation timestamp are assigned here, not by the caller.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the
    /// same thread.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let id = TransactionId::new();
        let created_at = OffsetDateTime::now_utc();

        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO transactions (id, title, amount, session_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id, title, amount, session_id, created_at",
            )?
            .query_row(
                (
                    id.to_string(),
                    new_transaction.title,
                    new_transaction.amount,
                    new_transaction.session_id.as_str().to_owned(),
                    created_at,
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Retrieve the transaction with `id` owned by `session_id`.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn get(
        &self,
        id: TransactionId,
        session_id: &SessionId,
    ) -> Result<Option<Transaction>, Error> {
        let id = id.to_string();
        let session_id = session_id.as_str().to_owned();

        let result = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, title, amount, session_id, created_at FROM transactions
                 WHERE id = :id AND session_id = :session_id",
            )?
            .query_row(
                &[(":id", &id), (":session_id", &session_id)],
                Self::map_row,
            );

        match result {
            Ok(transaction) => Ok(Some(transaction)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Retrieve the transactions in the database that belong to `session_id`.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn get_by_session(&self, session_id: &SessionId) -> Result<Vec<Transaction>, Error> {
        let session_id = session_id.as_str().to_owned();

        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, title, amount, session_id, created_at FROM transactions
                 WHERE session_id = :session_id",
            )?
            .query_map(&[(":session_id", &session_id)], Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Sum the signed amounts of the transactions that belong to
    /// `session_id`.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn sum_by_session(&self, session_id: &SessionId) -> Result<f64, Error> {
        let session_id = session_id.as_str().to_owned();

        // TOTAL instead of SUM: an empty session must sum to 0.0, not NULL.
        self.connection
            .lock()
            .unwrap()
            .query_row(
                "SELECT TOTAL(amount) FROM transactions WHERE session_id = :session_id",
                &[(":session_id", &session_id)],
                |row| row.get(0),
            )
            .map_err(|error| error.into())
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS transactions (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    amount REAL NOT NULL,
                    session_id TEXT NOT NULL,
                    created_at TEXT NOT NULL
                    )",
            (),
        )?;

        connection.execute(
            "CREATE INDEX IF NOT EXISTS transactions_session_id
             ON transactions (session_id)",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id: String = row.get(offset)?;
        let id = raw_id.parse::<TransactionId>().map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                offset,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })?;

        let title = row.get(offset + 1)?;
        let amount = row.get(offset + 2)?;
        let session_id = SessionId::new(row.get::<_, String>(offset + 3)?);
        let created_at = row.get(offset + 4)?;

        Ok(Transaction::new(id, title, amount, session_id, created_at))
    }
}

#[cfg(test)]
mod sqlite_transaction_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        db::initialize,
        models::{NewTransaction, SessionId, TransactionId},
        stores::{SQLiteTransactionStore, TransactionStore},
    };

    fn get_test_store() -> SQLiteTransactionStore {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)))
    }

    fn new_transaction(title: &str, amount: f64, session_id: &SessionId) -> NewTransaction {
        NewTransaction {
            title: title.to_owned(),
            amount,
            session_id: session_id.clone(),
        }
    }

    #[test]
    fn create_and_get_round_trip() {
        let mut store = get_test_store();
        let session_id = SessionId::mint();

        let inserted = store
            .create(new_transaction("Salary", 5000.0, &session_id))
            .unwrap();

        let selected = store.get(inserted.id(), &session_id).unwrap();

        assert_eq!(selected, Some(inserted));
    }

    #[test]
    fn create_assigns_unique_ids() {
        let mut store = get_test_store();
        let session_id = SessionId::mint();

        let first = store
            .create(new_transaction("Salary", 5000.0, &session_id))
            .unwrap();
        let second = store
            .create(new_transaction("Salary", 5000.0, &session_id))
            .unwrap();

        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn create_stores_signed_amount_verbatim() {
        let mut store = get_test_store();
        let session_id = SessionId::mint();

        let inserted = store
            .create(new_transaction("Rent", -2000.0, &session_id))
            .unwrap();

        assert_eq!(inserted.amount(), -2000.0);
        assert_eq!(inserted.title(), "Rent");
        assert_eq!(inserted.session_id(), &session_id);
    }

    #[test]
    fn get_returns_none_for_unknown_id() {
        let mut store = get_test_store();
        let session_id = SessionId::mint();
        store
            .create(new_transaction("Salary", 5000.0, &session_id))
            .unwrap();

        let selected = store.get(TransactionId::new(), &session_id).unwrap();

        assert_eq!(selected, None);
    }

    #[test]
    fn get_returns_none_for_other_sessions_transaction() {
        let mut store = get_test_store();
        let owner = SessionId::mint();
        let other = SessionId::mint();

        let inserted = store.create(new_transaction("Salary", 5000.0, &owner)).unwrap();

        let selected = store.get(inserted.id(), &other).unwrap();

        assert_eq!(selected, None);
    }

    #[test]
    fn get_by_session_only_returns_matching_transactions() {
        let mut store = get_test_store();
        let session_a = SessionId::mint();
        let session_b = SessionId::mint();

        let expected = vec![
            store.create(new_transaction("Salary", 5000.0, &session_a)).unwrap(),
            store.create(new_transaction("Groceries", -150.0, &session_a)).unwrap(),
        ];
        store.create(new_transaction("Rent", -2000.0, &session_b)).unwrap();

        let transactions = store.get_by_session(&session_a).unwrap();

        assert_eq!(transactions, expected);
    }

    #[test]
    fn get_by_session_returns_empty_vec_for_unknown_session() {
        let store = get_test_store();

        let transactions = store.get_by_session(&SessionId::mint()).unwrap();

        assert_eq!(transactions, vec![]);
    }

    #[test]
    fn sum_by_session_nets_signed_amounts() {
        let mut store = get_test_store();
        let session_id = SessionId::mint();

        store.create(new_transaction("Salary", 5000.0, &session_id)).unwrap();
        store.create(new_transaction("Rent", -2000.0, &session_id)).unwrap();

        let sum = store.sum_by_session(&session_id).unwrap();

        assert_eq!(sum, 3000.0);
    }

    #[test]
    fn sum_by_session_is_zero_for_empty_session() {
        let store = get_test_store();

        let sum = store.sum_by_session(&SessionId::mint()).unwrap();

        assert_eq!(sum, 0.0);
    }
}
