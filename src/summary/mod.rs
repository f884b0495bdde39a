//! Monthly reports over a user's transactions: single month summaries,
//! two month comparisons and multi-month trends.

mod aggregation;
mod comparison;
mod endpoints;
mod period;
mod trend;

pub use aggregation::{MonthlySummary, summarize_month};
pub use comparison::{ComparisonResult, compare_months, pct_change};
pub use endpoints::{get_month_comparison, get_monthly_summary, get_trend};
pub use period::{MonthToken, months_between};
pub use trend::{TrendResult, compute_trend};
