//! Date conversion between the picker form (`YYYY-MM-DD`) and the stored form.
//!
//! Experience dates are stored as `YYYY-MM` (or the sentinel `Present` for an
//! ongoing role); education dates are stored as a bare year. Conversions never
//! fail: unreadable display input passes through to storage untouched, and
//! unreadable stored input shows as an empty picker.

use chrono::{DateTime, Datelike, NaiveDate};

/// Stored end date of an ongoing experience.
pub const PRESENT: &str = "Present";

const PICKER_FORMAT: &str = "%Y-%m-%d";
const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 3000;

/// Parses the date shapes found in stored or hand-entered data.
fn parse_loose(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, PICKER_FORMAT) {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }
    // "YYYY-MM"
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{value}-01"), PICKER_FORMAT) {
        return Some(date);
    }
    // "Jan 2020" / "January 2020"
    if let Ok(date) = NaiveDate::parse_from_str(&format!("01 {value}"), "%d %b %Y") {
        return Some(date);
    }
    None
}

/// A four-digit year in the accepted range, taken from the leading digits.
fn leading_year(value: &str) -> Option<i32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let year = digits.parse::<i32>().ok()?;
    (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
}

fn is_bare_year(value: &str) -> bool {
    let value = value.trim();
    value.len() == 4 && value.chars().all(|c| c.is_ascii_digit())
}

/// Stored experience date → picker value. `Present` and unreadable input
/// become empty.
pub fn month_for_display(stored: &str) -> String {
    let stored = stored.trim();
    if stored.is_empty() || stored.eq_ignore_ascii_case(PRESENT) {
        return String::new();
    }
    if let Some(date) = parse_loose(stored) {
        return date.format(PICKER_FORMAT).to_string();
    }
    match leading_year(stored) {
        Some(year) if is_bare_year(stored) => format!("{year}-01-01"),
        _ => String::new(),
    }
}

/// Picker value → stored experience date (`YYYY-MM`, a bare year, or
/// `Present` when the role is ongoing).
pub fn month_for_storage(display: &str, currently_working: bool) -> String {
    if currently_working {
        return PRESENT.to_string();
    }
    let display = display.trim();
    if display.is_empty() {
        return String::new();
    }
    if is_bare_year(display) {
        return display.to_string();
    }
    match parse_loose(display) {
        Some(date) => format!("{:04}-{:02}", date.year(), date.month()),
        None => display.to_string(),
    }
}

/// Stored education year → picker value.
pub fn year_for_display(stored: &str) -> String {
    match leading_year(stored) {
        Some(year) => format!("{year}-01-01"),
        None => String::new(),
    }
}

/// Picker value → stored education year.
pub fn year_for_storage(display: &str) -> String {
    let display = display.trim();
    if display.is_empty() {
        return String::new();
    }
    if let Some(date) = parse_loose(display) {
        return date.year().to_string();
    }
    match leading_year(display) {
        Some(year) if is_bare_year(display) => year.to_string(),
        _ => display.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_display_from_storage_shapes() {
        assert_eq!(month_for_display("2020-03"), "2020-03-01");
        assert_eq!(month_for_display("2020-03-15"), "2020-03-15");
        assert_eq!(month_for_display("Jan 2020"), "2020-01-01");
        assert_eq!(month_for_display("2019"), "2019-01-01");
        assert_eq!(month_for_display("2021-06-01T00:00:00Z"), "2021-06-01");
    }

    #[test]
    fn test_month_display_present_and_garbage_are_empty() {
        assert_eq!(month_for_display("Present"), "");
        assert_eq!(month_for_display("present"), "");
        assert_eq!(month_for_display("someday"), "");
        assert_eq!(month_for_display(""), "");
    }

    #[test]
    fn test_month_storage() {
        assert_eq!(month_for_storage("2020-03-01", false), "2020-03");
        assert_eq!(month_for_storage("", false), "");
        assert_eq!(month_for_storage("2019", false), "2019");
        assert_eq!(month_for_storage("next spring", false), "next spring");
    }

    #[test]
    fn test_month_storage_currently_working_is_present() {
        assert_eq!(month_for_storage("2024-02-01", true), PRESENT);
        assert_eq!(month_for_storage("", true), PRESENT);
        assert_eq!(month_for_storage("garbage", true), PRESENT);
    }

    #[test]
    fn test_month_round_trip_is_lossless() {
        for stored in ["2018-01", "2020-12", "1999-07"] {
            assert_eq!(month_for_storage(&month_for_display(stored), false), stored);
        }
    }

    #[test]
    fn test_year_display() {
        assert_eq!(year_for_display("2013"), "2013-01-01");
        assert_eq!(year_for_display("2019-05"), "2019-01-01");
        assert_eq!(year_for_display("999"), "");
        assert_eq!(year_for_display("4000"), "");
        assert_eq!(year_for_display("n/a"), "");
    }

    #[test]
    fn test_year_storage() {
        assert_eq!(year_for_storage("2017-09-01"), "2017");
        assert_eq!(year_for_storage("2017"), "2017");
        assert_eq!(year_for_storage("soon"), "soon");
        assert_eq!(year_for_storage(""), "");
    }

    #[test]
    fn test_year_round_trip_is_lossless() {
        for stored in ["2013", "2017", "1990"] {
            assert_eq!(year_for_storage(&year_for_display(stored)), stored);
        }
    }
}
