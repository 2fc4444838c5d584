//! Fields recomputed from other fields whenever their inputs are edited.
//! Every hook writes only when the value actually changes and reports
//! whether it did, so chained recomputation settles after one pass.

use chrono::Days;

use safar_shared::coerce::parse_int;
use safar_shared::dates::{parse_date, parse_datetime, DATE_FORMAT};

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

pub fn set_if_changed(slot: &mut String, value: String) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Check-out date for a stay; `None` when either input is unusable.
pub fn checkout_date(check_in: &str, nights: &str) -> Option<String> {
    if nights.trim().is_empty() {
        return None;
    }
    let nights = parse_int(nights);
    if nights < 0 {
        return None;
    }
    let date = parse_date(check_in)?.checked_add_days(Days::new(nights as u64))?;
    Some(date.format(DATE_FORMAT).to_string())
}

/// Whole days between the two dates; `None` if check-out precedes check-in.
pub fn nights_between(check_in: &str, check_out: &str) -> Option<i64> {
    let start = parse_date(check_in)?;
    let end = parse_date(check_out)?;
    let nights = (end - start).num_days();
    (nights >= 0).then_some(nights)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StayEdit {
    CheckIn,
    Nights,
    CheckOut,
}

/// Keeps check-in, nights and check-out consistent after one of them changed.
pub fn reconcile_stay(check_in: &str, nights: &mut String, check_out: &mut String, edited: StayEdit) -> bool {
    match edited {
        StayEdit::CheckIn | StayEdit::Nights => match checkout_date(check_in, nights) {
            Some(date) => set_if_changed(check_out, date),
            None => false,
        },
        StayEdit::CheckOut => match nights_between(check_in, check_out) {
            Some(n) => set_if_changed(nights, n.to_string()),
            None => false,
        },
    }
}

/// Minutes between arriving somewhere and leaving it again.
pub fn wait_minutes(arrival: &str, departure: &str) -> Option<i64> {
    let arrived = parse_datetime(arrival)?;
    let leaves = parse_datetime(departure)?;
    Some((leaves - arrived).num_minutes())
}

/// `45m`, `2h 5m`, `1d 1h`; anything not positive is `0m`.
pub fn format_wait(minutes: i64) -> String {
    if minutes <= 0 {
        "0m".to_string()
    } else if minutes < MINUTES_PER_HOUR {
        format!("{minutes}m")
    } else if minutes < MINUTES_PER_DAY {
        format!("{}h {}m", minutes / MINUTES_PER_HOUR, minutes % MINUTES_PER_HOUR)
    } else {
        format!(
            "{}d {}h",
            minutes / MINUTES_PER_DAY,
            (minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR
        )
    }
}

pub fn wait_time(arrival: &str, departure: &str) -> Option<String> {
    wait_minutes(arrival, departure).map(format_wait)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_from_nights() {
        assert_eq!(checkout_date("2025-01-10", "3").as_deref(), Some("2025-01-13"));
        assert_eq!(checkout_date("2025-02-27", "3").as_deref(), Some("2025-03-02"));
        assert_eq!(checkout_date("2025-01-10", "").as_deref(), None);
        assert_eq!(checkout_date("", "3"), None);
        assert_eq!(checkout_date("2025-01-10", "-2"), None);
    }

    #[test]
    fn test_nights_from_dates() {
        assert_eq!(nights_between("2025-01-10", "2025-01-13"), Some(3));
        assert_eq!(nights_between("2025-01-13", "2025-01-10"), None);
        assert_eq!(nights_between("2025-01-10", "garbage"), None);
    }

    #[test]
    fn test_reconcile_stay_both_directions() {
        let mut nights = "3".to_string();
        let mut check_out = String::new();
        assert!(reconcile_stay("2025-01-10", &mut nights, &mut check_out, StayEdit::Nights));
        assert_eq!(check_out, "2025-01-13");
        // Second pass over the same inputs is a no-op.
        assert!(!reconcile_stay("2025-01-10", &mut nights, &mut check_out, StayEdit::CheckIn));

        let mut nights = String::new();
        let mut check_out = "2025-01-13".to_string();
        assert!(reconcile_stay("2025-01-10", &mut nights, &mut check_out, StayEdit::CheckOut));
        assert_eq!(nights, "3");
        assert!(!reconcile_stay("2025-01-10", &mut nights, &mut check_out, StayEdit::CheckOut));
    }

    #[test]
    fn test_wait_buckets() {
        assert_eq!(format_wait(45), "45m");
        assert_eq!(format_wait(125), "2h 5m");
        assert_eq!(format_wait(1500), "1d 1h");
        assert_eq!(format_wait(0), "0m");
        assert_eq!(format_wait(-30), "0m");
        assert_eq!(format_wait(60), "1h 0m");
    }

    #[test]
    fn test_wait_time_from_datetimes() {
        assert_eq!(wait_time("2025-03-01T11:00", "2025-03-01T13:05").as_deref(), Some("2h 5m"));
        assert_eq!(wait_time("2025-03-01T11:00", "2025-03-01T10:00").as_deref(), Some("0m"));
        assert_eq!(wait_time("", "2025-03-01T10:00"), None);
    }
}
