//! Database queries for transactions.
//!
//! Every query is scoped to the transaction's owner. A transaction that belongs
//! to another user is treated the same as a transaction that does not exist.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error, UserID,
    database_id::TransactionId,
    transaction::{NewTransaction, Transaction},
};

/// The maximum number of transactions returned by [list_transactions].
pub const TRANSACTION_LIST_LIMIT: u32 = 200;

const TRANSACTION_COLUMNS: &str =
    "id, kind, amount, category, occurred_on, description, payment_method, status, created_at";

/// Validate and store a new transaction for `user_id`.
///
/// # Errors
/// This function will return an:
/// - [Error::InvalidAmount] if the amount is negative or not finite,
/// - [Error::EmptyCategory] if the category is empty,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let new_transaction = new_transaction.validate()?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\"
                (user_id, kind, amount, category, occurred_on, description, payment_method, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                new_transaction.kind,
                new_transaction.amount,
                new_transaction.category,
                new_transaction.occurred_on,
                new_transaction.description,
                new_transaction.payment_method,
                new_transaction.status,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(
            rusqlite::named_params! {":id": id, ":user_id": user_id.as_i64()},
            map_transaction_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the newest transactions of `user_id`, at most [TRANSACTION_LIST_LIMIT].
///
/// Transactions are ordered by date, then by when they were recorded, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn list_transactions(user_id: UserID, connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
            WHERE user_id = :user_id
            ORDER BY occurred_on DESC, created_at DESC, id DESC
            LIMIT :limit"
        ))?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":limit": TRANSACTION_LIST_LIMIT,
            },
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Replace the user provided fields of a transaction owned by `user_id`.
///
/// # Errors
/// This function will return an:
/// - [Error::InvalidAmount] or [Error::EmptyCategory] if the new fields are invalid,
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let new_transaction = new_transaction.validate()?;

    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
        SET kind = ?1, amount = ?2, category = ?3, occurred_on = ?4, description = ?5,
            payment_method = ?6, status = ?7
        WHERE id = ?8 AND user_id = ?9",
        (
            new_transaction.kind,
            new_transaction.amount,
            new_transaction.category,
            new_transaction.occurred_on,
            new_transaction.description,
            new_transaction.payment_method,
            new_transaction.status,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    get_transaction(id, user_id, connection)
}

/// Delete a transaction owned by `user_id`.
///
/// # Errors
/// This function will return an:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
            amount REAL NOT NULL CHECK (amount >= 0),
            category TEXT NOT NULL,
            occurred_on TEXT NOT NULL,
            description TEXT,
            payment_method TEXT NOT NULL CHECK (payment_method IN ('cash', 'bank', 'card', 'transfer')),
            status TEXT NOT NULL CHECK (status IN ('paid', 'pending')),
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, occurred_on);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        kind: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        occurred_on: row.get(4)?,
        description: row.get(5)?,
        payment_method: row.get(6)?,
        status: row.get(7)?,
        created_at: row.get(8)?,
    })
}
