//! Monthly totals of a user's income and expenses.

use std::collections::BTreeMap;

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{Error, UserID, summary::period::MonthToken};

/// The income, expense, balance and number of transactions of one user for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// The month that was summarised.
    pub month: MonthToken,
    /// The sum of the amounts of income transactions.
    pub income: f64,
    /// The sum of the amounts of expense transactions.
    pub expense: f64,
    /// Income minus expenses.
    pub balance: f64,
    /// The number of transactions in the month.
    pub count: i64,
}

impl MonthlySummary {
    /// A summary for a month without any transactions.
    pub fn empty(month: MonthToken) -> Self {
        Self::new(month, 0.0, 0.0, 0)
    }

    /// Create a summary, deriving the balance from `income` and `expense`.
    pub fn new(month: MonthToken, income: f64, expense: f64, count: i64) -> Self {
        Self {
            month,
            income,
            expense,
            balance: income - expense,
            count,
        }
    }
}

/// The aggregate columns shared by the single month and grouped queries.
///
/// Empty groups produce zeros rather than NULL.
const TOTALS_COLUMNS: &str = "COALESCE(SUM(CASE WHEN kind = 'income' THEN amount ELSE 0 END), 0.0),
        COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount ELSE 0 END), 0.0),
        COUNT(id)";

/// Summarise the transactions of `user_id` dated within `month`.
///
/// A month without transactions gives a summary where every field is zero.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn summarize_month(
    user_id: UserID,
    month: MonthToken,
    connection: &Connection,
) -> Result<MonthlySummary, Error> {
    let (start, end) = month.date_range();

    connection
        .prepare(&format!(
            "SELECT {TOTALS_COLUMNS}
            FROM \"transaction\"
            WHERE user_id = :user_id AND occurred_on BETWEEN :start AND :end"
        ))?
        .query_row(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":start": start,
                ":end": end,
            },
            |row| map_totals(row, 0, month),
        )
        .map_err(|error| error.into())
}

/// Summarise the transactions of `user_id` from the start of `from` to the end of `to`,
/// grouped by calendar month, in a single query.
///
/// Only months with at least one transaction have an entry.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn summarize_months(
    user_id: UserID,
    from: MonthToken,
    to: MonthToken,
    connection: &Connection,
) -> Result<BTreeMap<MonthToken, MonthlySummary>, Error> {
    let mut statement = connection.prepare(&format!(
        "SELECT
            CAST(strftime('%Y', occurred_on) AS INTEGER) AS year,
            CAST(strftime('%m', occurred_on) AS INTEGER) AS month,
            {TOTALS_COLUMNS}
        FROM \"transaction\"
        WHERE user_id = :user_id AND occurred_on BETWEEN :start AND :end
        GROUP BY year, month"
    ))?;

    let rows = statement.query_map(
        rusqlite::named_params! {
            ":user_id": user_id.as_i64(),
            ":start": from.first_day(),
            ":end": to.last_day(),
        },
        |row| {
            let year: u16 = row.get(0)?;
            let month: u8 = row.get(1)?;

            let month = MonthToken::new(year, month).ok_or_else(|| {
                rusqlite::Error::IntegralValueOutOfRange(1, i64::from(month))
            })?;

            map_totals(row, 2, month)
        },
    )?;

    let mut summaries = BTreeMap::new();

    for summary in rows {
        let summary = summary?;
        summaries.insert(summary.month, summary);
    }

    Ok(summaries)
}

fn map_totals(
    row: &Row,
    offset: usize,
    month: MonthToken,
) -> Result<MonthlySummary, rusqlite::Error> {
    let income = row.get(offset)?;
    let expense = row.get(offset + 1)?;
    let count = row.get(offset + 2)?;

    Ok(MonthlySummary::new(month, income, expense, count))
}
