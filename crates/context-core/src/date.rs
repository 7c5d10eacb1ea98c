use chrono::{NaiveDate, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validates a `YYYY-MM-DD` date against today (UTC).
///
/// Returns the original string when it is today or later, `None` when it is in the
/// past or not a date at all. Models happily invent past dates for "next weekend".
pub fn validate_date(date: &str) -> Option<String> {
    validate_date_on(date, Utc::now().date_naive())
}

/// Same as [`validate_date`] with an explicit "today".
pub fn validate_date_on(date: &str, today: NaiveDate) -> Option<String> {
    let parsed = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()?;
    if parsed < today {
        log::debug!("Discarding past date {} (today is {})", date, today);
        return None;
    }
    Some(date.to_string())
}

/// Applies [`validate_date`] to an optional value.
pub fn validate_optional_date(date: Option<&str>) -> Option<String> {
    date.and_then(validate_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn past_dates_are_invalid() {
        let today = day("2025-05-10");
        for date in ["2025-05-09", "2024-12-31", "1999-01-01"] {
            assert_eq!(validate_date_on(date, today), None, "{date} should be rejected");
        }
    }

    #[test]
    fn today_and_future_round_trip() {
        let today = day("2025-05-10");
        for date in ["2025-05-10", "2025-05-11", "2030-01-01"] {
            assert_eq!(validate_date_on(date, today).as_deref(), Some(date));
        }
    }

    #[test]
    fn malformed_dates_are_invalid() {
        let today = day("2025-05-10");
        for date in ["", "next weekend", "10.05.2025", "2025-13-01", "2025-02-30"] {
            assert_eq!(validate_date_on(date, today), None, "{date:?} should be rejected");
        }
    }

    #[test]
    fn validate_date_uses_current_day() {
        let today = Utc::now().date_naive().format(DATE_FORMAT).to_string();
        assert_eq!(validate_date(&today), Some(today.clone()));
        assert_eq!(validate_date("2000-01-01"), None);
        assert_eq!(validate_optional_date(None), None);
        assert_eq!(validate_optional_date(Some("2999-12-31")).as_deref(), Some("2999-12-31"));
    }
}
