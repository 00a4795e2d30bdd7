//! This module defines the domain data types: the transaction, its
//! identifier, and the session token that scopes it.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// The unique identifier of a [Transaction].
///
/// IDs are UUIDs generated when a transaction is inserted and are never
/// reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Generate a fresh, globally unique transaction ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// An opaque token correlating a client to its own transactions.
///
/// Tokens are minted as UUID strings, but the server never validates a token
/// presented by a client: whatever non-empty value is in the cookie is used
/// verbatim as the tenancy boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a token presented by a client. The value is trusted as-is.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Mint a fresh session token.
    pub fn mint() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether an amount is credited to or debited from a session's balance.
///
/// The type only exists in the create request: it is collapsed into the sign
/// of the stored amount at write time and cannot be recovered afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money paid into the session's balance, stored with a positive sign.
    Credit,
    /// Money taken out of the session's balance, stored with a negative sign.
    Debit,
}

impl TransactionType {
    /// Apply the type to a non-negative magnitude, negating debits.
    pub fn signed_amount(self, magnitude: f64) -> f64 {
        match self {
            Self::Credit => magnitude,
            Self::Debit => -magnitude,
        }
    }
}

/// One immutable signed monetary entry tied to a session.
///
/// Transactions are only ever created; there is no update or delete path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    title: String,
    amount: f64,
    session_id: SessionId,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a transaction from its stored parts.
    pub fn new(
        id: TransactionId,
        title: String,
        amount: f64,
        session_id: SessionId,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            title,
            amount,
            session_id,
            created_at,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// A free-text label describing the transaction.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The signed amount: positive for credits, negative for debits.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The session that owns this transaction.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// When the transaction was inserted.
    pub fn created_at(&self) -> &OffsetDateTime {
        &self.created_at
    }
}

/// The data needed to insert a transaction.
///
/// The store assigns the ID and the creation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A free-text label describing the transaction.
    pub title: String,
    /// The signed amount: positive for credits, negative for debits.
    pub amount: f64,
    /// The session that will own the transaction.
    pub session_id: SessionId,
}

#[cfg(test)]
mod transaction_type_tests {
    use crate::models::TransactionType;

    #[test]
    fn credit_keeps_sign() {
        assert_eq!(TransactionType::Credit.signed_amount(5000.0), 5000.0);
    }

    #[test]
    fn debit_flips_sign() {
        assert_eq!(TransactionType::Debit.signed_amount(2000.0), -2000.0);
    }

    #[test]
    fn parses_lowercase_tokens() {
        assert_eq!(
            serde_json::from_str::<TransactionType>("\"credit\"").unwrap(),
            TransactionType::Credit
        );
        assert_eq!(
            serde_json::from_str::<TransactionType>("\"debit\"").unwrap(),
            TransactionType::Debit
        );
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert!(serde_json::from_str::<TransactionType>("\"transfer\"").is_err());
        assert!(serde_json::from_str::<TransactionType>("\"Credit\"").is_err());
    }
}

#[cfg(test)]
mod transaction_id_tests {
    use crate::models::TransactionId;

    #[test]
    fn round_trips_through_string() {
        let id = TransactionId::new();

        let parsed = id.to_string().parse::<TransactionId>().unwrap();

        assert_eq!(parsed, id);
    }

    #[test]
    fn rejects_non_uuid_strings() {
        assert!("123".parse::<TransactionId>().is_err());
        assert!("not-a-uuid".parse::<TransactionId>().is_err());
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(TransactionId::new(), TransactionId::new());
    }
}
