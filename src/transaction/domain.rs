//! Defines the core data models for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, database_id::TransactionId};

/// Implements the string conversions and SQL mapping for a fieldless enum
/// stored as lowercase text.
macro_rules! text_enum {
    ($name:ident, $label:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// The lowercase name used in JSON and in the database.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(Error::InvalidPayload(format!(
                        "unknown {} \"{other}\"",
                        $label
                    ))),
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
            }
        }
    };
}

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

text_enum!(TransactionKind, "transaction type", {
    Income => "income",
    Expense => "expense",
});

/// How a transaction was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paid in cash.
    Cash,
    /// Paid from or into a bank account.
    Bank,
    /// Paid by card.
    Card,
    /// Paid by transfer.
    Transfer,
}

text_enum!(PaymentMethod, "payment method", {
    Cash => "cash",
    Bank => "bank",
    Card => "card",
    Transfer => "transfer",
});

/// Whether a transaction has been settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// The money has moved.
    Paid,
    /// The money is yet to move.
    Pending,
}

text_enum!(TransactionStatus, "transaction status", {
    Paid => "paid",
    Pending => "pending",
});

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [NewTransaction::build] and
/// [crate::create_transaction].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money, never negative.
    pub amount: f64,
    /// A free text label, e.g. "Groceries".
    pub category: String,
    /// The calendar date the transaction happened on.
    pub occurred_on: Date,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// How the transaction was paid.
    pub payment_method: PaymentMethod,
    /// Whether the transaction has been settled.
    pub status: TransactionStatus,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The fields of a transaction that a user provides.
///
/// The amount and category are checked when the transaction is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// The amount of money, must be finite and zero or greater.
    pub amount: f64,
    /// A free text label, must not be empty.
    pub category: String,
    /// The calendar date the transaction happened on.
    pub occurred_on: Date,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// How the transaction was paid.
    pub payment_method: PaymentMethod,
    /// Whether the transaction has been settled.
    pub status: TransactionStatus,
}

impl NewTransaction {
    /// Start building a transaction that was paid in cash, has been settled and has no description.
    pub fn build(kind: TransactionKind, amount: f64, occurred_on: Date, category: &str) -> Self {
        Self {
            kind,
            amount,
            category: category.to_owned(),
            occurred_on,
            description: None,
            payment_method: PaymentMethod::Cash,
            status: TransactionStatus::Paid,
        }
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Set the payment method.
    pub fn payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    /// Set the status.
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Check the amount and category, trimming the category.
    ///
    /// # Errors
    /// This function will return an:
    /// - [Error::InvalidAmount] if the amount is negative or not finite,
    /// - or [Error::EmptyCategory] if the category is empty after trimming.
    pub fn validate(mut self) -> Result<Self, Error> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        let category = self.category.trim();

        if category.is_empty() {
            return Err(Error::EmptyCategory);
        }

        self.category = category.to_owned();

        Ok(self)
    }
}

/// The JSON body for creating or replacing a transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionPayload {
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money.
    pub amount: f64,
    /// A free text label.
    pub category: String,
    /// The date in the format `YYYY-MM-DD`.
    pub occurred_on: Date,
    /// An optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// How the transaction was paid.
    pub payment_method: PaymentMethod,
    /// Whether the transaction has been settled.
    pub status: TransactionStatus,
}

impl From<TransactionPayload> for NewTransaction {
    fn from(payload: TransactionPayload) -> Self {
        Self {
            kind: payload.kind,
            amount: payload.amount,
            category: payload.category,
            occurred_on: payload.occurred_on,
            description: payload.description,
            payment_method: payload.payment_method,
            status: payload.status,
        }
    }
}
