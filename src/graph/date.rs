//! Year and date extraction from record DATE values
//!
//! Record dates are free text: `12 MAR 1851`, `MAR 1851`, `1851`,
//! `ABT 1851`, `BET 1850 AND 1852`. Qualifiers are dropped and the first
//! concrete date wins.

use chrono::{Datelike, NaiveDate};
use regex_lite::Regex;
use std::sync::LazyLock;

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("valid year pattern"));

const QUALIFIERS: &[&str] = &["ABT", "ABOUT", "BEF", "AFT", "EST", "CAL", "BET", "FROM", "TO", "CIRCA", "C."];

/// Parse a record date into a calendar date.
///
/// Day-less dates resolve to the first of the month, year-only dates to
/// 1 January.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = strip_qualifiers(raw);
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(&cleaned, "%d %b %Y") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("1 {}", cleaned), "%d %b %Y") {
        return Some(date);
    }
    if let Ok(year) = cleaned.parse::<i32>() {
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    let year = YEAR
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Parse just the year of a record date
pub fn parse_year(raw: &str) -> Option<i32> {
    parse_date(raw).map(|d| d.year())
}

/// Whole years between two dates; negative when `end` precedes `start`
pub fn years_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let mut years = end.year() - start.year();
    if years > 0 && (end.month(), end.day()) < (start.month(), start.day()) {
        years -= 1;
    } else if years < 0 && (end.month(), end.day()) > (start.month(), start.day()) {
        years += 1;
    }
    years
}

fn strip_qualifiers(raw: &str) -> String {
    // "BET x AND y" keeps only x
    let upper = raw.trim().to_uppercase();
    let first_part = upper.split(" AND ").next().unwrap_or("");
    first_part
        .split_whitespace()
        .filter(|w| !QUALIFIERS.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_date() {
        let d = parse_date("12 MAR 1851").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (1851, 3, 12));
    }

    #[test]
    fn month_and_year() {
        let d = parse_date("Mar 1851").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (1851, 3, 1));
    }

    #[test]
    fn qualified_years() {
        assert_eq!(parse_year("ABT 1851"), Some(1851));
        assert_eq!(parse_year("BET 1850 AND 1852"), Some(1850));
        assert_eq!(parse_year("bef 3 JAN 1900"), Some(1900));
    }

    #[test]
    fn year_buried_in_text() {
        assert_eq!(parse_year("Q2 1871 (registered)"), Some(1871));
    }

    #[test]
    fn no_year() {
        assert_eq!(parse_year("unknown"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn years_between_handles_birthdays() {
        let birth = NaiveDate::from_ymd_opt(1850, 6, 1).unwrap();
        let death = NaiveDate::from_ymd_opt(1900, 5, 31).unwrap();
        assert_eq!(years_between(birth, death), 49);

        let early = NaiveDate::from_ymd_opt(1840, 1, 1).unwrap();
        assert_eq!(years_between(birth, early), -10);
    }
}
