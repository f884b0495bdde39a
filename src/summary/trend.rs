//! Month by month series of summaries with month-over-month changes.

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error, UserID,
    summary::{
        aggregation::{MonthlySummary, summarize_months},
        comparison::pct_change,
        period::{MonthToken, months_between},
    },
};

/// One month of a trend along with its change from the previous month.
///
/// The change fields are `None` for the first month of a trend and wherever the
/// previous month's value is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendMonth {
    /// The totals for the month.
    #[serde(flatten)]
    pub summary: MonthlySummary,
    /// The percentage change in income from the previous month.
    pub mom_income: Option<f64>,
    /// The percentage change in expenses from the previous month.
    pub mom_expense: Option<f64>,
    /// The percentage change in balance from the previous month.
    pub mom_balance: Option<f64>,
    /// The percentage change in the number of transactions from the previous month.
    pub mom_count: Option<f64>,
}

/// A contiguous series of monthly summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult {
    /// The first month of the series.
    pub from: MonthToken,
    /// The last month of the series.
    pub to: MonthToken,
    /// One entry per month from `from` to `to`, in chronological order.
    pub months: Vec<TrendMonth>,
}

/// Summarise every month from `from` to `to` inclusive for `user_id`.
///
/// Months without transactions are included with zero totals.
///
/// # Errors
/// This function will return an:
/// - [Error::ReversedMonthRange] if `from` is after `to`,
/// - or [Error::SqlError] if there is an SQL error.
pub fn compute_trend(
    user_id: UserID,
    from: MonthToken,
    to: MonthToken,
    connection: &Connection,
) -> Result<TrendResult, Error> {
    if from > to {
        return Err(Error::ReversedMonthRange {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    let mut summaries = summarize_months(user_id, from, to, connection)?;

    let series = months_between(from, to)
        .into_iter()
        .map(|month| {
            summaries
                .remove(&month)
                .unwrap_or_else(|| MonthlySummary::empty(month))
        })
        .collect();

    Ok(TrendResult {
        from,
        to,
        months: with_month_over_month(series),
    })
}

/// Attach the change from the previous entry to each summary in `series`.
pub fn with_month_over_month(series: Vec<MonthlySummary>) -> Vec<TrendMonth> {
    let mut previous: Option<MonthlySummary> = None;
    let mut months = Vec::with_capacity(series.len());

    for summary in series {
        let month = match &previous {
            None => TrendMonth {
                summary: summary.clone(),
                mom_income: None,
                mom_expense: None,
                mom_balance: None,
                mom_count: None,
            },
            Some(prev) => TrendMonth {
                summary: summary.clone(),
                mom_income: pct_change(prev.income, summary.income),
                mom_expense: pct_change(prev.expense, summary.expense),
                mom_balance: pct_change(prev.balance, summary.balance),
                mom_count: pct_change(prev.count as f64, summary.count as f64),
            },
        };

        months.push(month);
        previous = Some(summary);
    }

    months
}
