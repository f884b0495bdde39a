//! Transactions: the income and expenses a user records.
//!
//! This module contains the `Transaction` model, the database functions for
//! storing and querying transactions, and the REST handlers for them.

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    list_transactions, update_transaction,
};
pub use domain::{
    NewTransaction, PaymentMethod, Transaction, TransactionKind, TransactionPayload,
    TransactionStatus,
};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
    list_transactions_endpoint, update_transaction_endpoint,
};
