use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

static DAY_MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})$").unwrap());

/// Resolve a "DD/MM" date against `today`.
///
/// The year is today's, except in January where months after September
/// belong to the previous year. Anything but two numeric fields, or an
/// impossible calendar date, yields `None`.
pub fn resolve(date_text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = DAY_MONTH_RE.captures(date_text.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;

    let mut year = today.year();
    if today.month() == 1 && month > 9 {
        year -= 1;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn feb() -> NaiveDate {
        ymd(2026, 2, 15)
    }

    fn jan() -> NaiveDate {
        ymd(2026, 1, 10)
    }

    #[test]
    fn valid_dd_mm() {
        assert_eq!(resolve("12/02", feb()), Some(ymd(2026, 2, 12)));
    }

    #[test]
    fn single_digit_fields() {
        assert_eq!(resolve("3/1", feb()), Some(ymd(2026, 1, 3)));
    }

    #[test]
    fn surrounding_whitespace() {
        assert_eq!(resolve("  12/02  ", feb()), Some(ymd(2026, 2, 12)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(resolve("", feb()), None);
        assert_eq!(resolve("not-a-date", feb()), None);
        assert_eq!(resolve("123/02", feb()), None);
    }

    #[test]
    fn rejects_explicit_year() {
        assert_eq!(resolve("12/02/2026", feb()), None);
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(resolve("31/02", feb()), None);
        assert_eq!(resolve("31/04", feb()), None);
        assert_eq!(resolve("10/13", feb()), None);
        assert_eq!(resolve("00/05", feb()), None);
    }

    #[test]
    fn leap_day_follows_reference_year() {
        assert_eq!(resolve("29/02", feb()), None);
        assert_eq!(resolve("29/02", ymd(2028, 3, 1)), Some(ymd(2028, 2, 29)));
    }

    #[test]
    fn january_carries_late_months_back() {
        assert_eq!(resolve("15/12", jan()), Some(ymd(2025, 12, 15)));
        assert_eq!(resolve("02/10", jan()), Some(ymd(2025, 10, 2)));
    }

    #[test]
    fn january_keeps_early_months() {
        assert_eq!(resolve("05/01", jan()), Some(ymd(2026, 1, 5)));
        assert_eq!(resolve("15/09", jan()), Some(ymd(2026, 9, 15)));
    }

    #[test]
    fn no_carry_back_outside_january() {
        assert_eq!(resolve("15/12", feb()), Some(ymd(2026, 12, 15)));
    }

    #[test]
    fn same_input_same_output() {
        assert_eq!(resolve("08/02", feb()), resolve("08/02", feb()));
    }
}
