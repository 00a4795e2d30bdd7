//! The HTTP request handlers and their request/response body types.

mod transactions;

pub use transactions::{
    CreateTransactionBody, Summary, SummaryResponse, TransactionListResponse, TransactionResponse,
    create_transaction, get_summary, get_transaction, get_transactions,
};
