/*! This module defines traits for mapping the domain models to the
application's SQLite database, and the entry point for creating the schema. */

use rusqlite::{Connection, Error, Row, Transaction as SqlTransaction};

use crate::stores::SQLiteTransactionStore;

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    /// The concrete type that rows are mapped to.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type.
    ///
    /// The `offset` indicates which column the row should be read from.
    /// This is useful in cases where tables have been joined and you want to construct two different types from the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, Error>;
}

/// Create the application schema.
///
/// This is the migration step: it must run before the server accepts traffic.
/// It is safe to call on a database that already has the schema.
///
/// # Errors
/// Returns an error if the schema cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), crate::Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    SQLiteTransactionStore::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
