//! Application router configuration with guarded and unguarded route
//! definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState, endpoints,
    routes::{create_transaction, get_summary, get_transaction, get_transactions},
    session::session_guard,
    stores::TransactionStore,
};

/// Return a router with all the app's routes.
///
/// The read routes sit behind the session guard. Creation is left open so
/// that a client's first request can mint a session.
pub fn build_router<T>(state: AppState<T>) -> Router
where
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    let guarded_routes = Router::new()
        .route(endpoints::TRANSACTIONS, get(get_transactions))
        .route(endpoints::TRANSACTIONS_SUMMARY, get(get_summary))
        .route(endpoints::TRANSACTION, get(get_transaction))
        .route_layer(middleware::from_fn(session_guard));

    Router::new()
        .route(endpoints::TRANSACTIONS, post(create_transaction))
        .merge(guarded_routes)
        .with_state(state)
}
