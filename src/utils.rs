use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

const ISO_DATE_LEN: usize = 10;

/// Parses the calendar date out of an ISO-8601 string.
///
/// Accepts plain dates (`2025-05-10`), RFC 3339 timestamps
/// (`2025-05-10T08:00:00.000Z`) and naive timestamps. Anything else that
/// still starts with a valid `YYYY-MM-DD` prefix is reduced to that prefix.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }

    if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(timestamp.date());
    }

    if trimmed.len() > ISO_DATE_LEN && trimmed.is_char_boundary(ISO_DATE_LEN) {
        return NaiveDate::parse_from_str(&trimmed[..ISO_DATE_LEN], "%Y-%m-%d").ok();
    }

    None
}

/// Short "month day" label, e.g. `May 10`.
pub fn period_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Returns `len` consecutive days ending at `end`, oldest first.
pub fn window_dates(end: NaiveDate, len: usize) -> Vec<NaiveDate> {
    (0..len)
        .rev()
        .filter_map(|offset| end.checked_sub_days(Days::new(offset as u64)))
        .collect()
}

/// Number of whole days `date` lies before `end` (0 for `end` itself).
pub fn days_before(date: NaiveDate, end: NaiveDate) -> i64 {
    (end - date).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(
            parse_iso_date("2025-05-10"),
            NaiveDate::from_ymd_opt(2025, 5, 10)
        );
        assert_eq!(
            parse_iso_date("  2025-07-15\r"),
            NaiveDate::from_ymd_opt(2025, 7, 15)
        );
    }

    #[test]
    fn test_parse_timestamps() {
        assert_eq!(
            parse_iso_date("2025-06-20T13:45:00.000Z"),
            NaiveDate::from_ymd_opt(2025, 6, 20)
        );
        assert_eq!(
            parse_iso_date("2025-06-20T13:45:00"),
            NaiveDate::from_ymd_opt(2025, 6, 20)
        );
        assert_eq!(
            parse_iso_date("2025-06-20 13:45"),
            NaiveDate::from_ymd_opt(2025, 6, 20)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_iso_date(""), None);
        assert_eq!(parse_iso_date("yesterday"), None);
        assert_eq!(parse_iso_date("2025-13-40"), None);
        assert_eq!(parse_iso_date("ééééééééééé"), None);
    }

    #[test]
    fn test_period_label() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
        assert_eq!(period_label(date), "May 3");

        let date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        assert_eq!(period_label(date), "Dec 25");
    }

    #[test]
    fn test_window_dates() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let dates = window_dates(end, 3);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                end,
            ]
        );
        assert!(window_dates(end, 0).is_empty());
    }

    #[test]
    fn test_days_before() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 2, 26).unwrap();
        assert_eq!(days_before(date, end), 5);
        assert_eq!(days_before(end, end), 0);
    }
}
