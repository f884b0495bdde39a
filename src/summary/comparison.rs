//! Side-by-side comparison of two months.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error, UserID,
    summary::{aggregation::MonthlySummary, period::MonthToken, summarize_month},
};

/// The note attached to every comparison to explain missing percentages.
pub const PCT_CHANGE_NOTE: &str = "pct_change is null when the base value (monthA) is 0";

/// The percentage change from `base` to `next`.
///
/// Returns `None` when `base` is zero, since the change is undefined.
///
/// # Examples
/// ```
/// use cashbook_rs::pct_change;
///
/// assert_eq!(pct_change(100.0, 150.0), Some(50.0));
/// assert_eq!(pct_change(0.0, 10.0), None);
/// ```
pub fn pct_change(base: f64, next: f64) -> Option<f64> {
    if base == 0.0 {
        None
    } else {
        Some((next - base) / base * 100.0)
    }
}

/// `monthB - monthA` for each metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryDelta {
    /// The change in income.
    pub income: f64,
    /// The change in expenses.
    pub expense: f64,
    /// The change in balance.
    pub balance: f64,
    /// The change in the number of transactions.
    pub count: i64,
}

/// The percentage change from `monthA` to `monthB` for each metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentChange {
    /// The change in income, in percent.
    pub income: Option<f64>,
    /// The change in expenses, in percent.
    pub expense: Option<f64>,
    /// The change in balance, in percent.
    pub balance: Option<f64>,
    /// The change in the number of transactions, in percent.
    pub count: Option<f64>,
}

/// Extra information for clients displaying a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonMeta {
    /// Explains when `pct_change` fields are null.
    pub note: &'static str,
}

/// Two monthly summaries along with how the second differs from the first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// The base month.
    #[serde(rename = "monthA")]
    pub month_a: MonthlySummary,
    /// The month compared against the base month.
    #[serde(rename = "monthB")]
    pub month_b: MonthlySummary,
    /// The absolute differences.
    pub delta: SummaryDelta,
    /// The relative differences.
    pub pct_change: PercentChange,
    /// Notes for clients.
    pub meta: ComparisonMeta,
}

/// Compare two summaries, treating `month_a` as the base.
pub fn compare_summaries(month_a: MonthlySummary, month_b: MonthlySummary) -> ComparisonResult {
    let delta = SummaryDelta {
        income: month_b.income - month_a.income,
        expense: month_b.expense - month_a.expense,
        balance: month_b.balance - month_a.balance,
        count: month_b.count - month_a.count,
    };

    let pct_change = PercentChange {
        income: pct_change(month_a.income, month_b.income),
        expense: pct_change(month_a.expense, month_b.expense),
        balance: pct_change(month_a.balance, month_b.balance),
        count: pct_change(month_a.count as f64, month_b.count as f64),
    };

    ComparisonResult {
        month_a,
        month_b,
        delta,
        pct_change,
        meta: ComparisonMeta {
            note: PCT_CHANGE_NOTE,
        },
    }
}

/// Summarise `month_a` and `month_b` for `user_id` and compare them.
///
/// The two summaries are computed on separate blocking tasks and the
/// comparison fails as soon as either one does. Both tasks lock the same
/// connection, so the months are read one after the other.
///
/// # Errors
/// This function will return an:
/// - [Error::DatabaseLockError] if the database lock is poisoned,
/// - [Error::TaskFailed] if a summary task panicked or was cancelled,
/// - or [Error::SqlError] if there is an SQL error.
pub async fn compare_months(
    user_id: UserID,
    month_a: MonthToken,
    month_b: MonthToken,
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<ComparisonResult, Error> {
    let (summary_a, summary_b) = tokio::try_join!(
        summarize_in_background(user_id, month_a, db_connection.clone()),
        summarize_in_background(user_id, month_b, db_connection.clone()),
    )?;

    Ok(compare_summaries(summary_a, summary_b))
}

async fn summarize_in_background(
    user_id: UserID,
    month: MonthToken,
    db_connection: Arc<Mutex<Connection>>,
) -> Result<MonthlySummary, Error> {
    tokio::task::spawn_blocking(move || {
        let connection = db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        summarize_month(user_id, month, &connection)
    })
    .await
    .map_err(|error| {
        tracing::error!("summary task for {month} failed: {error}");
        Error::TaskFailed(error.to_string())
    })?
}
