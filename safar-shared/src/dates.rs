use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// What a `datetime-local` input holds.
pub const FORM_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
pub const API_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Accepts `YYYY-MM-DD` alone or as the prefix of a date-time string.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let head = text.get(..10)?;
    let rest = &text[10..];
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

/// Offsets are dropped: the wall-clock time the backend sent is what the form shows.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

pub fn date_text(text: &str) -> String {
    parse_date(text)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn form_datetime_text(text: &str) -> String {
    parse_datetime(text)
        .map(|dt| dt.format(FORM_DATETIME_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn api_datetime_text(text: &str) -> Option<String> {
    parse_datetime(text).map(|dt| dt.format(API_DATETIME_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_text_accepts_datetime_prefix() {
        assert_eq!(date_text("2025-01-10"), "2025-01-10");
        assert_eq!(date_text("2025-01-10T00:00:00Z"), "2025-01-10");
        assert_eq!(date_text("10/01/2025"), "");
        assert_eq!(date_text("2025-13-40"), "");
        assert_eq!(date_text("2025-01-10abc"), "");
    }

    #[test]
    fn test_form_datetime_text_shapes() {
        assert_eq!(form_datetime_text("2025-03-01T08:30:00"), "2025-03-01T08:30");
        assert_eq!(form_datetime_text("2025-03-01T08:30:00+05:00"), "2025-03-01T08:30");
        assert_eq!(form_datetime_text("2025-03-01 08:30"), "2025-03-01T08:30");
        assert_eq!(form_datetime_text("2025-03-01T08:30:00.250"), "2025-03-01T08:30");
        assert_eq!(form_datetime_text("tomorrow"), "");
    }

    #[test]
    fn test_api_datetime_text() {
        assert_eq!(api_datetime_text("2025-03-01T08:30").as_deref(), Some("2025-03-01T08:30:00"));
        assert_eq!(api_datetime_text(""), None);
    }
}
