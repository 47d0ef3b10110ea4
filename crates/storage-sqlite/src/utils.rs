//! Conversions between domain values and their SQLite text columns.
//!
//! Decimals are stored as their canonical string, timestamps as RFC 3339 UTC
//! with a fixed microsecond precision so that text ordering is chronological,
//! and calendar days as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use log::error;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const DATE_COLUMN_FORMAT: &str = "%Y-%m-%d";

pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_COLUMN_FORMAT).to_string()
}

/// Parses a stored timestamp, falling back to the Unix epoch on corrupt data.
pub fn parse_timestamp_tolerant(value: &str, field: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            error!("Failed to parse {} '{}': {}", field, value, e);
            DateTime::<Utc>::UNIX_EPOCH
        })
}

/// Parses a stored calendar day, falling back to the Unix epoch day on corrupt data.
pub fn parse_date_tolerant(value: &str, field: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, DATE_COLUMN_FORMAT).unwrap_or_else(|e| {
        error!("Failed to parse {} '{}': {}", field, value, e);
        DateTime::<Utc>::UNIX_EPOCH.date_naive()
    })
}

/// Parses a stored decimal, falling back to zero on corrupt data.
pub fn parse_decimal_tolerant(value: &str, field: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_else(|e| {
        error!("Failed to parse {} '{}': {}", field, value, e);
        Decimal::ZERO
    })
}
