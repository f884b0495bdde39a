//! Cashbook is a small ledger for tracking income and expenses.
//!
//! This library provides a JSON REST API for registering users, recording
//! transactions and categories, and summarising transactions by month.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod database_id;
mod db;
mod email;
mod endpoints;
mod error;
mod logging;
mod password;
mod response;
mod routing;
mod summary;
#[cfg(test)]
mod test_utils;
mod transaction;
mod user;

pub use app_state::AppState;
pub use category::{Category, CategoryName, create_category};
pub use db::initialize as initialize_db;
pub use email::Email;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use summary::{
    ComparisonResult, MonthToken, MonthlySummary, TrendResult, compare_months, compute_trend,
    months_between, pct_change, summarize_month,
};
pub use transaction::{
    NewTransaction, PaymentMethod, Transaction, TransactionKind, TransactionStatus,
    create_transaction,
};
pub use user::{NewUser, User, UserID, UserName, create_user, get_user_by_id};

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
