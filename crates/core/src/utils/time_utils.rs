use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::constants::INVALID_DATE_FORMAT_MESSAGE;
use crate::errors::{Error, Result, ValidationError};

/// Default timezone for valuation dates.
/// This is the canonical timezone used to convert UTC instants to domain dates.
pub const DEFAULT_VALUATION_TZ: Tz = chrono_tz::UTC;

/// Format accepted for plain calendar days.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Converts a UTC instant to a valuation date in the given timezone.
///
/// This is the single source of truth for converting instants to domain dates.
/// Use this whenever you need to derive a "business date" from a timestamp.
pub fn valuation_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's valuation date in the given timezone.
pub fn valuation_date_today(tz: Tz) -> NaiveDate {
    valuation_date_from_utc(Utc::now(), tz)
}

/// All calendar days from `start` to `end`, both inclusive.
pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Parses an IANA timezone name such as `Asia/Tokyo`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim().parse::<Tz>().map_err(|e| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "Invalid timezone '{}': {}",
            name, e
        )))
    })
}

/// Parses a `YYYY-MM-DD` calendar day.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "Invalid date '{}'. Use YYYY-MM-DD",
            raw
        )))
    })
}

/// Parses a purchase timestamp.
///
/// RFC 3339 timestamps are taken as-is. A plain `YYYY-MM-DD` day means
/// midnight of that day in `tz`.
pub fn parse_purchase_timestamp(raw: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    let day = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        Error::Validation(ValidationError::InvalidInput(
            INVALID_DATE_FORMAT_MESSAGE.to_string(),
        ))
    })?;
    Ok(start_of_day(day, tz))
}

/// First instant of `day` in `tz`, expressed in UTC.
pub fn start_of_day(day: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = day.and_time(chrono::NaiveTime::MIN);
    match tz.from_local_datetime(&midnight).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // Midnight skipped by a DST jump
        None => tz.from_utc_datetime(&midnight).with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_between_is_inclusive() {
        let days = get_days_between(date(2024, 2, 27), date(2024, 3, 1));
        assert_eq!(
            days,
            vec![date(2024, 2, 27), date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]
        );
    }

    #[test]
    fn test_days_between_single_and_reversed() {
        assert_eq!(get_days_between(date(2024, 1, 1), date(2024, 1, 1)).len(), 1);
        assert!(get_days_between(date(2024, 1, 2), date(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_valuation_date_respects_timezone() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap();
        assert_eq!(valuation_date_from_utc(instant, chrono_tz::UTC), date(2024, 1, 1));
        assert_eq!(
            valuation_date_from_utc(instant, chrono_tz::Asia::Tokyo),
            date(2024, 1, 2)
        );
    }

    #[test]
    fn test_parse_rfc3339_timestamp() {
        let parsed = parse_purchase_timestamp("2023-10-27T10:00:00Z", chrono_tz::UTC).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 10, 27, 10, 0, 0).unwrap());

        let offset = parse_purchase_timestamp("2023-10-27T10:00:00+09:00", chrono_tz::UTC).unwrap();
        assert_eq!(offset, Utc.with_ymd_and_hms(2023, 10, 27, 1, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_plain_date_is_local_midnight() {
        let utc = parse_purchase_timestamp("2024-01-01", chrono_tz::UTC).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        let tokyo = parse_purchase_timestamp("2024-01-01", chrono_tz::Asia::Tokyo).unwrap();
        assert_eq!(tokyo, Utc.with_ymd_and_hms(2023, 12, 31, 15, 0, 0).unwrap());
        assert_eq!(
            valuation_date_from_utc(tokyo, chrono_tz::Asia::Tokyo),
            date(2024, 1, 1)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "yesterday", "2024/01/01", "2024-13-01", "01-01-2024"] {
            let err = parse_purchase_timestamp(raw, chrono_tz::UTC).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("Input validation failed: {}", INVALID_DATE_FORMAT_MESSAGE)
            );
        }
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-02").unwrap(), date(2024, 1, 2));
        assert!(parse_date("2024-1-2x").is_err());
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Asia/Tokyo").unwrap(), chrono_tz::Asia::Tokyo);
        assert!(parse_timezone("Mars/Olympus").is_err());
    }
}
