//! Month tokens of the form `YYYY-MM` and the calendar arithmetic on them.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, Month, util::is_leap_year};

use crate::Error;

/// A validated calendar month, written as `YYYY-MM`.
///
/// Tokens order chronologically: by year, then by month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthToken {
    year: u16,
    month: u8,
}

impl MonthToken {
    /// Parse and validate a month token.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::InvalidMonthFormat] if `token` is not four digits, a hyphen and two digits,
    /// - or [Error::InvalidMonthRange] if the month is not between `01` and `12`.
    pub fn parse(token: &str) -> Result<Self, Error> {
        let [month] = parse_months([token])?;

        Ok(month)
    }

    /// Create a month token from a year and a month number.
    ///
    /// Returns `None` if `month` is not between 1 and 12 or `year` is above 9999.
    pub fn new(year: u16, month: u8) -> Option<Self> {
        if year > 9999 || !(1..=12).contains(&month) {
            return None;
        }

        Some(Self { year, month })
    }

    /// The calendar year.
    pub fn year(&self) -> u16 {
        self.year
    }

    /// The month number, from 1 to 12.
    pub fn month(&self) -> u8 {
        self.month
    }

    /// The month that follows this one, rolling over into the next year after December.
    ///
    /// Returns `None` after `9999-12`, the last month a token can represent.
    pub fn next(&self) -> Option<Self> {
        match (self.year, self.month) {
            (9999, 12) => None,
            (year, 12) => Some(Self {
                year: year + 1,
                month: 1,
            }),
            (year, month) => Some(Self {
                year,
                month: month + 1,
            }),
        }
    }

    /// The first day of the month, `YYYY-MM-01`.
    pub fn first_day(&self) -> Date {
        self.day(1)
    }

    /// The last day of the month, accounting for leap years.
    pub fn last_day(&self) -> Date {
        let length = match self.month {
            2 if is_leap_year(i32::from(self.year)) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        };

        self.day(length)
    }

    /// The dates `(first day, last day)` covered by the month, both inclusive.
    ///
    /// Transactions are dated without a time of day, so this covers exactly the
    /// same dates as the half-open range up to the first day of the next month.
    pub fn date_range(&self) -> (Date, Date) {
        (self.first_day(), self.last_day())
    }

    fn day(&self, day: u8) -> Date {
        let month = Month::try_from(self.month).expect("month tokens hold a month from 1 to 12");

        Date::from_calendar_date(i32::from(self.year), month, day)
            .expect("month tokens hold a year from 0 to 9999 and days are within the month")
    }
}

/// Validate several month tokens at once.
///
/// The format of every token is checked before the month range of any token,
/// so a format error is always reported ahead of a range error.
///
/// # Errors
///
/// Returns the first [Error::InvalidMonthFormat], or failing that the first
/// [Error::InvalidMonthRange], in the order the tokens were given.
pub fn parse_months<const N: usize>(tokens: [&str; N]) -> Result<[MonthToken; N], Error> {
    let mut parts = [(0u16, 0u8); N];

    for (slot, token) in parts.iter_mut().zip(tokens) {
        *slot = split_token(token).ok_or_else(|| Error::InvalidMonthFormat(token.to_owned()))?;
    }

    for (&(_, month), token) in parts.iter().zip(tokens) {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonthRange(token.to_owned()));
        }
    }

    Ok(parts.map(|(year, month)| MonthToken { year, month }))
}

/// Split `YYYY-MM` into its numeric parts without checking the month range.
fn split_token(token: &str) -> Option<(u16, u8)> {
    let bytes = token.as_bytes();

    if bytes.len() != 7 || bytes[4] != b'-' {
        return None;
    }

    let (year, month) = (&bytes[..4], &bytes[5..]);

    if !year.iter().chain(month).all(u8::is_ascii_digit) {
        return None;
    }

    let digits_to_number = |digits: &[u8]| {
        digits
            .iter()
            .fold(0u16, |acc, digit| acc * 10 + u16::from(digit - b'0'))
    };

    Some((digits_to_number(year), digits_to_number(month) as u8))
}

/// The inclusive, chronological sequence of months from `from` to `to`.
///
/// Callers must reject a range where `from` comes after `to` before calling this;
/// such a range produces an empty sequence.
pub fn months_between(from: MonthToken, to: MonthToken) -> Vec<MonthToken> {
    let mut months = Vec::new();
    let mut current = from;

    while current <= to {
        months.push(current);

        match current.next() {
            Some(next) => current = next,
            None => break,
        }
    }

    months
}

impl Display for MonthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonthToken::parse(s)
    }
}

impl TryFrom<String> for MonthToken {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MonthToken::parse(&value)
    }
}

impl From<MonthToken> for String {
    fn from(value: MonthToken) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        summary::period::{MonthToken, months_between, parse_months},
    };

    fn month(token: &str) -> MonthToken {
        MonthToken::parse(token).unwrap()
    }

    #[test]
    fn parse_accepts_valid_token() {
        let token = MonthToken::parse("2026-01").unwrap();

        assert_eq!(token.year(), 2026);
        assert_eq!(token.month(), 1);
        assert_eq!(token.to_string(), "2026-01");
    }

    #[test]
    fn parse_rejects_bad_formats() {
        for token in ["", "2026", "2026-1", "2026-001", "26-01", "2026/01", "2026-0a", "２０２６-01"] {
            assert_eq!(
                MonthToken::parse(token),
                Err(Error::InvalidMonthFormat(token.to_owned())),
                "want a format error for {token:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_out_of_range_month_with_valid_format() {
        assert_eq!(
            MonthToken::parse("2026-99"),
            Err(Error::InvalidMonthRange("2026-99".to_owned()))
        );
        assert_eq!(
            MonthToken::parse("2026-00"),
            Err(Error::InvalidMonthRange("2026-00".to_owned()))
        );
        assert_eq!(
            MonthToken::parse("2026-13"),
            Err(Error::InvalidMonthRange("2026-13".to_owned()))
        );
    }

    #[test]
    fn parse_months_reports_format_errors_before_range_errors() {
        let result = parse_months(["2026-99", "2026-1"]);

        assert_eq!(result, Err(Error::InvalidMonthFormat("2026-1".to_owned())));
    }

    #[test]
    fn parse_months_reports_first_range_error() {
        let result = parse_months(["2026-01", "2026-13"]);

        assert_eq!(result, Err(Error::InvalidMonthRange("2026-13".to_owned())));
    }

    #[test]
    fn months_between_within_a_year() {
        let got = months_between(month("2026-01"), month("2026-03"));

        assert_eq!(
            got,
            vec![month("2026-01"), month("2026-02"), month("2026-03")]
        );
    }

    #[test]
    fn months_between_rolls_over_the_year() {
        let got = months_between(month("2025-11"), month("2026-02"));

        assert_eq!(
            got,
            vec![
                month("2025-11"),
                month("2025-12"),
                month("2026-01"),
                month("2026-02")
            ]
        );
    }

    #[test]
    fn months_between_single_month() {
        assert_eq!(
            months_between(month("2026-05"), month("2026-05")),
            vec![month("2026-05")]
        );
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(month("2025-12") < month("2026-01"));
        assert!(month("2026-02") > month("2026-01"));
    }

    #[test]
    fn months_between_stops_at_the_last_representable_month() {
        assert_eq!(
            months_between(month("9999-11"), month("9999-12")),
            vec![month("9999-11"), month("9999-12")]
        );
    }

    #[test]
    fn next_rolls_over_the_year() {
        assert_eq!(month("2025-12").next(), Some(month("2026-01")));
        assert_eq!(month("2026-01").next(), Some(month("2026-02")));
        assert_eq!(month("9999-12").next(), None);
    }

    #[test]
    fn first_day_and_date_range() {
        assert_eq!(month("2026-02").first_day(), date!(2026 - 02 - 01));
        assert_eq!(
            month("2025-12").date_range(),
            (date!(2025 - 12 - 01), date!(2025 - 12 - 31))
        );
    }

    #[test]
    fn last_day_handles_leap_years() {
        assert_eq!(month("2024-02").last_day(), date!(2024 - 02 - 29));
        assert_eq!(month("2026-02").last_day(), date!(2026 - 02 - 28));
        assert_eq!(month("2026-04").last_day(), date!(2026 - 04 - 30));
        assert_eq!(month("9999-12").last_day(), date!(9999 - 12 - 31));
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&month("2026-07")).unwrap();

        assert_eq!(json, r#""2026-07""#);
        assert_eq!(
            serde_json::from_str::<MonthToken>(&json).unwrap(),
            month("2026-07")
        );
    }
}
