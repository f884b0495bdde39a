//! HTTP handlers for the monthly summary, comparison and trend reports.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, UserID,
    summary::{
        aggregation::{MonthlySummary, summarize_month},
        comparison::{ComparisonResult, compare_months},
        period::{MonthToken, parse_months},
        trend::{TrendResult, compute_trend},
    },
};

/// The state needed for the summary endpoints.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string for a monthly summary, e.g. `?month=2026-01`.
#[derive(Debug, Default, Deserialize)]
pub struct MonthlyQuery {
    month: Option<String>,
}

/// The query string for a comparison, e.g. `?monthA=2026-01&monthB=2026-02`.
#[derive(Debug, Default, Deserialize)]
pub struct CompareQuery {
    #[serde(rename = "monthA")]
    month_a: Option<String>,
    #[serde(rename = "monthB")]
    month_b: Option<String>,
}

/// The query string for a trend, e.g. `?from=2025-11&to=2026-02`.
#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    from: Option<String>,
    to: Option<String>,
}

/// Summarise the authenticated user's transactions for one month.
///
/// A missing `month` parameter is treated as an empty, and therefore malformed, token.
pub async fn get_monthly_summary(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<MonthlySummary>, Error> {
    let month = MonthToken::parse(query.month.as_deref().unwrap_or_default())?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    summarize_month(user_id, month, &connection).map(Json)
}

/// Compare two months of the authenticated user's transactions.
pub async fn get_month_comparison(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<ComparisonResult>, Error> {
    let [month_a, month_b] = parse_months([
        query.month_a.as_deref().unwrap_or_default(),
        query.month_b.as_deref().unwrap_or_default(),
    ])?;

    compare_months(user_id, month_a, month_b, &state.db_connection)
        .await
        .map(Json)
}

/// Get the month by month trend of the authenticated user's transactions.
pub async fn get_trend(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<TrendResult>, Error> {
    let [from, to] = parse_months([
        query.from.as_deref().unwrap_or_default(),
        query.to.as_deref().unwrap_or_default(),
    ])?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    compute_trend(user_id, from, to, &connection).map(Json)
}

#[cfg(test)]
mod summary_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
    };
    use time::macros::date;

    use crate::{
        Error, TransactionKind, UserID,
        summary::endpoints::{
            CompareQuery, MonthlyQuery, SummaryState, TrendQuery, get_month_comparison,
            get_monthly_summary, get_trend,
        },
        test_utils::{insert_test_transaction, insert_test_user, test_connection},
    };

    fn get_state() -> (SummaryState, UserID) {
        let connection = test_connection();
        let user_id = insert_test_user(&connection, "foo@bar.baz");
        insert_test_transaction(&connection, user_id, TransactionKind::Income, 1000.0, date!(2026 - 01 - 05));
        insert_test_transaction(&connection, user_id, TransactionKind::Expense, 400.0, date!(2026 - 01 - 10));
        insert_test_transaction(&connection, user_id, TransactionKind::Income, 500.0, date!(2026 - 02 - 01));

        let state = SummaryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, user_id)
    }

    fn some(token: &str) -> Option<String> {
        Some(token.to_owned())
    }

    #[tokio::test]
    async fn monthly_summary() {
        let (state, user_id) = get_state();

        let summary = get_monthly_summary(
            State(state),
            Extension(user_id),
            Query(MonthlyQuery {
                month: some("2026-01"),
            }),
        )
        .await
        .unwrap();

        assert_eq!(summary.income, 1000.0);
        assert_eq!(summary.expense, 400.0);
        assert_eq!(summary.balance, 600.0);
        assert_eq!(summary.count, 2);
    }

    #[tokio::test]
    async fn monthly_summary_without_month_is_a_format_error() {
        let (state, user_id) = get_state();

        let result = get_monthly_summary(
            State(state),
            Extension(user_id),
            Query(MonthlyQuery::default()),
        )
        .await;

        assert_eq!(result.err(), Some(Error::InvalidMonthFormat(String::new())));
    }

    #[tokio::test]
    async fn monthly_summary_rejects_out_of_range_month() {
        let (state, user_id) = get_state();

        let result = get_monthly_summary(
            State(state),
            Extension(user_id),
            Query(MonthlyQuery {
                month: some("2026-13"),
            }),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidMonthRange("2026-13".to_owned()))
        );
    }

    #[tokio::test]
    async fn comparison() {
        let (state, user_id) = get_state();

        let result = get_month_comparison(
            State(state),
            Extension(user_id),
            Query(CompareQuery {
                month_a: some("2026-01"),
                month_b: some("2026-02"),
            }),
        )
        .await
        .unwrap();

        assert_eq!(result.delta.income, -500.0);
        assert_eq!(result.delta.expense, -400.0);
        assert_eq!(result.delta.balance, -100.0);
        assert_eq!(result.delta.count, -1);
    }

    #[tokio::test]
    async fn comparison_of_month_with_itself() {
        let (state, user_id) = get_state();

        let result = get_month_comparison(
            State(state),
            Extension(user_id),
            Query(CompareQuery {
                month_a: some("2026-01"),
                month_b: some("2026-01"),
            }),
        )
        .await
        .unwrap();

        assert_eq!(result.month_a, result.month_b);
        assert_eq!(result.delta.income, 0.0);
        assert_eq!(result.delta.expense, 0.0);
        assert_eq!(result.delta.balance, 0.0);
        assert_eq!(result.delta.count, 0);
        assert_eq!(result.pct_change.income, Some(0.0));
        assert_eq!(result.pct_change.count, Some(0.0));
    }

    #[tokio::test]
    async fn comparison_reports_format_error_before_range_error() {
        let (state, user_id) = get_state();

        let result = get_month_comparison(
            State(state),
            Extension(user_id),
            Query(CompareQuery {
                month_a: some("2026-99"),
                month_b: some("2026-1"),
            }),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidMonthFormat("2026-1".to_owned()))
        );
    }

    #[tokio::test]
    async fn trend() {
        let (state, user_id) = get_state();

        let result = get_trend(
            State(state),
            Extension(user_id),
            Query(TrendQuery {
                from: some("2025-12"),
                to: some("2026-02"),
            }),
        )
        .await
        .unwrap();

        assert_eq!(result.months.len(), 3);
        assert_eq!(result.months[0].summary.count, 0);
        assert_eq!(result.months[1].mom_income, None);
        assert_eq!(result.months[2].mom_income, Some(-50.0));
    }

    #[tokio::test]
    async fn trend_rejects_reversed_range() {
        let (state, user_id) = get_state();

        let result = get_trend(
            State(state),
            Extension(user_id),
            Query(TrendQuery {
                from: some("2026-02"),
                to: some("2026-01"),
            }),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::ReversedMonthRange {
                from: "2026-02".to_owned(),
                to: "2026-01".to_owned(),
            })
        );
    }
}
