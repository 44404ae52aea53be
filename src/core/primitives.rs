use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Unix milliseconds at UTC midnight of `date`.
#[must_use]
pub fn date_to_unix_millis(date: NaiveDate) -> f64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis() as f64)
        .unwrap_or(0.0)
}

#[must_use]
pub fn unix_millis_to_date(millis: f64) -> Option<NaiveDate> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.round() as i64).map(|dt| dt.date_naive())
}

/// Parses a slide date label.
///
/// The committee decks write dates as `dd/mm/yy`; four-digit years, ISO
/// dates and RFC 3339 timestamps are accepted as fallbacks.
#[must_use]
pub fn parse_date_label(label: &str) -> Option<NaiveDate> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return None;
    }

    for pattern in ["%d/%m/%y", "%d/%m/%Y", "%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, pattern) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// Date assigned to the `ordinal`-th unparseable label on a time axis.
#[must_use]
pub fn synthesized_ordinal_date(ordinal: usize) -> NaiveDate {
    let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN);
    base.checked_add_days(chrono::Days::new(ordinal as u64))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{date_to_unix_millis, parse_date_label, unix_millis_to_date};

    #[test]
    fn slide_date_format_is_day_first() {
        assert_eq!(
            parse_date_label("31/12/25"),
            NaiveDate::from_ymd_opt(2025, 12, 31)
        );
        assert_eq!(
            parse_date_label("01/03/2024"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn iso_fallbacks_are_accepted() {
        assert_eq!(
            parse_date_label("2024-06-30"),
            NaiveDate::from_ymd_opt(2024, 6, 30)
        );
        assert_eq!(
            parse_date_label("2024-06-30T12:00:00Z"),
            NaiveDate::from_ymd_opt(2024, 6, 30)
        );
        assert_eq!(parse_date_label("Q1-25"), None);
    }

    #[test]
    fn millis_round_trip_keeps_the_date() {
        let date = NaiveDate::from_ymd_opt(2023, 9, 30).expect("valid date");
        let millis = date_to_unix_millis(date);
        assert_eq!(unix_millis_to_date(millis), Some(date));
    }
}
