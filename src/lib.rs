//! A session-scoped transaction ledger served over HTTP.
//!
//! Clients create credit and debit entries and read back their own entries,
//! a single entry, or an aggregate balance. A client's identity is nothing
//! more than an opaque session token stored in a cookie: the token is minted
//! on the client's first write and trusted verbatim afterwards. There are no
//! user accounts and no server-side session store.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod error;
mod models;
mod routes;
mod session;
mod state;

pub mod db;
pub mod endpoints;
pub mod routing;
pub mod stores;

pub use error::Error;
pub use models::{NewTransaction, SessionId, Transaction, TransactionId, TransactionType};
pub use routes::{
    CreateTransactionBody, Summary, SummaryResponse, TransactionListResponse, TransactionResponse,
};
pub use routing::build_router;
pub use session::session_guard;
pub use state::AppState;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
