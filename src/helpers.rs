//! Small utilities shared by scenarios: dates, JSON comparison, random ids.

use chrono::{Duration, NaiveDateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

const SECOND_PRECISION_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Current UTC time shifted by `days`, formatted with a strftime pattern.
pub fn formatted_date(days: i64, format: &str) -> String {
    (Utc::now() + Duration::days(days)).format(format).to_string()
}

/// Current UTC time shifted by `days` as `yyyy-MM-ddTHH:mm:ss.SSSZ`.
pub fn iso_datetime(days: i64) -> String {
    (Utc::now() + Duration::days(days))
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Compare two timestamps to the second, ignoring fractional seconds and
/// zone suffixes (`...35Z`, `...35.000+00:00`, `...35.35435Z`). Unparseable
/// input never compares equal.
pub fn same_second(actual: &str, expected: &str) -> bool {
    fn parse(s: &str) -> Option<NaiveDateTime> {
        let prefix = s.get(..19)?;
        NaiveDateTime::parse_from_str(prefix, SECOND_PRECISION_FORMAT).ok()
    }
    match (parse(actual), parse(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// True when every key of `expected` is present in `actual` with an equal
/// value. Only the top level is compared key-by-key.
pub fn is_subset(expected: &Value, actual: &Value) -> bool {
    match (expected.as_object(), actual.as_object()) {
        (Some(expected), Some(actual)) => expected
            .iter()
            .all(|(key, value)| actual.get(key) == Some(value)),
        _ => false,
    }
}

/// Random `[0-9a-f]` string of `len` characters.
pub fn random_alphanumeric(len: usize) -> String {
    let mut out = String::with_capacity(len);
    while out.len() < len {
        out.push_str(&Uuid::new_v4().simple().to_string());
    }
    out.truncate(len);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn same_second_ignores_fraction_and_zone() {
        assert!(same_second("2022-12-30T08:50:35.000+00:00", "2022-12-30T08:50:35Z"));
        assert!(same_second("2022-12-30T08:50:35.35435Z", "2022-12-30T08:50:35Z"));
        assert!(!same_second("2022-12-30T08:50:36Z", "2022-12-30T08:50:35Z"));
        assert!(!same_second("not a date", "2022-12-30T08:50:35Z"));
    }

    #[test]
    fn iso_datetime_has_millis_and_z() {
        let stamp = iso_datetime(0);
        assert!(stamp.ends_with('Z'));
        assert_eq!(stamp.len(), "2000-10-31T01:30:00.000Z".len());
    }

    #[test]
    fn formatted_date_shifts_days() {
        let today = formatted_date(0, "%Y-%m-%d");
        let later = formatted_date(3, "%Y-%m-%d");
        assert!(later > today);
    }

    #[test]
    fn subset_requires_equal_values() {
        let actual = json!({ "noteId": 1, "status": "Scheduled", "extra": true });
        assert!(is_subset(&json!({ "status": "Scheduled" }), &actual));
        assert!(!is_subset(&json!({ "status": "Draft" }), &actual));
        assert!(!is_subset(&json!({ "missing": 1 }), &actual));
    }

    #[test]
    fn random_alphanumeric_has_requested_length() {
        for len in [0, 10, 40] {
            let s = random_alphanumeric(len);
            assert_eq!(s.len(), len);
            assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
        }
        assert_ne!(random_alphanumeric(10), random_alphanumeric(10));
    }
}
