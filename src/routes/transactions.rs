//! Defines the endpoints for creating and retrieving a session's
//! transactions.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::{NewTransaction, SessionId, Transaction, TransactionId, TransactionType},
    session::{get_session_from_cookies, set_session_cookie},
    state::AppState,
    stores::TransactionStore,
};

/// The response body for listing a session's transactions.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionListResponse {
    /// All transactions belonging to the caller's session.
    pub transactions: Vec<Transaction>,
}

/// The aggregate balance of a session's transactions.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of the session's signed amounts. Zero when the session has no
    /// transactions.
    pub amount: f64,
}

/// The response body for the summary endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// The aggregate balance of the caller's session.
    pub summary: Summary,
}

/// The response body for a single transaction lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// The matching transaction, or null when the ID does not exist or
    /// belongs to a different session. The two cases are deliberately
    /// indistinguishable.
    pub transaction: Option<Transaction>,
}

/// The request body for creating a transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTransactionBody {
    /// A free-text label for the transaction.
    pub title: String,
    /// The non-negative magnitude of the transaction.
    pub amount: f64,
    /// Whether the amount is credited to or debited from the session's
    /// balance.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// A route handler for listing all of the session's transactions.
///
/// The whole matching set is returned in one response, in storage order.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_transactions<T>(
    State(state): State<AppState<T>>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Json<TransactionListResponse>, Error>
where
    T: TransactionStore + Send + Sync,
{
    let transactions = state.transaction_store.get_by_session(&session_id)?;

    Ok(Json(TransactionListResponse { transactions }))
}

/// A route handler for the aggregate balance of the session's transactions.
///
/// Credits and debits net against each other because debit amounts are stored
/// negative.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_summary<T>(
    State(state): State<AppState<T>>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Json<SummaryResponse>, Error>
where
    T: TransactionStore + Send + Sync,
{
    let amount = state.transaction_store.sum_by_session(&session_id)?;

    Ok(Json(SummaryResponse {
        summary: Summary { amount },
    }))
}

/// A route handler for getting a single transaction by its ID.
///
/// The path segment must be a UUID, otherwise the handler responds with a 400
/// without touching the store. A lookup that matches nothing responds with a
/// null transaction and status 200, whether the ID is unknown or owned by a
/// different session.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_transaction<T>(
    State(state): State<AppState<T>>,
    Extension(session_id): Extension<SessionId>,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransactionResponse>, Error>
where
    T: TransactionStore + Send + Sync,
{
    let transaction_id = match transaction_id.parse::<TransactionId>() {
        Ok(id) => id,
        Err(_) => return Err(Error::InvalidTransactionId(transaction_id)),
    };

    let transaction = state.transaction_store.get(transaction_id, &session_id)?;

    Ok(Json(TransactionResponse { transaction }))
}

/// A route handler for creating a new transaction.
///
/// The only route that does not sit behind the session guard: when the
/// request carries no session cookie, a fresh token is minted and set on the
/// response. Debit amounts are negated before storage. The response has no
/// body; clients list their transactions to see the stored entry.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_transaction<T>(
    State(mut state): State<AppState<T>>,
    jar: CookieJar,
    body: Result<Json<CreateTransactionBody>, JsonRejection>,
) -> Result<Response, Error>
where
    T: TransactionStore + Send + Sync,
{
    let Json(body) =
        body.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;

    if !body.amount.is_finite() || body.amount < 0.0 {
        return Err(Error::InvalidAmount(body.amount));
    }

    let (jar, session_id) = match get_session_from_cookies(&jar) {
        Some(session_id) => (jar, session_id),
        None => {
            let session_id = SessionId::mint();
            let jar = set_session_cookie(jar, &session_id);
            (jar, session_id)
        }
    };

    state.transaction_store.create(NewTransaction {
        title: body.title,
        amount: body.transaction_type.signed_amount(body.amount),
        session_id,
    })?;

    Ok((StatusCode::CREATED, jar).into_response())
}
