//! Defines the app level error type and its mapping to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A guarded route was requested without a session cookie.
    #[error("no session cookie was sent with the request")]
    SessionRequired,

    /// The path parameter for a single transaction lookup was not a valid
    /// UUID. The store is never queried in this case.
    #[error("\"{0}\" is not a valid transaction ID")]
    InvalidTransactionId(String),

    /// The request body was missing, could not be parsed, or had fields of
    /// the wrong shape. This includes unrecognized `type` tokens.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A transaction was submitted with a negative or non-finite amount.
    ///
    /// Clients send a non-negative magnitude plus a type token; the sign is
    /// applied server side.
    #[error("transaction amounts must be finite and non-negative, got {0}")]
    InvalidAmount(f64),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // The guard halts the request before the handler runs. No body is
            // sent, so clients learn nothing about what a valid token looks
            // like.
            Error::SessionRequired => return StatusCode::UNAUTHORIZED.into_response(),
            Error::InvalidTransactionId(_)
            | Error::InvalidRequestBody(_)
            | Error::InvalidAmount(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::SqlError(error) => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn missing_session_maps_to_unauthorized() {
        let response = Error::SessionRequired.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn validation_errors_map_to_bad_request() {
        let errors = [
            Error::InvalidTransactionId("123".to_owned()),
            Error::InvalidRequestBody("missing field `title`".to_owned()),
            Error::InvalidAmount(-1.0),
        ];

        for error in errors {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn sql_errors_map_to_internal_server_error() {
        let response = Error::SqlError(rusqlite::Error::QueryReturnedNoRows).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
