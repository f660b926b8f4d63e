//! Date and time handling for the API's wire formats.
//!
//! The API speaks `dd-mm-yyyy` dates and 12-hour `h:mm am|pm` times. Screens
//! work with chrono's naive local types; nothing here knows about time zones
//! because the browser renders everything in local time anyway.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

const WIRE_DATE: &str = "%d-%m-%Y";
const ISO_DATE: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Meridiem {
    Am,
    Pm,
}

/// Finds the first `dd-mm-yyyy` token in `text`.
///
/// Text before the date is allowed ("Mon, 05-03-2024"), as is a trailing time.
pub fn parse_wire_date(text: &str) -> Option<NaiveDate> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .map(|token| {
            token
                .trim_start_matches(|c: char| !c.is_ascii_digit())
                .trim_end_matches(|c: char| !c.is_ascii_digit())
        })
        .find_map(date_from_token)
}

fn date_from_token(token: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = token.split('-').collect();
    let [day, month, year]: [&str; 3] = parts.try_into().ok()?;
    let well_formed = |s: &str, max_len: usize| {
        !s.is_empty() && s.len() <= max_len && s.chars().all(|c| c.is_ascii_digit())
    };
    if !well_formed(day, 2) || !well_formed(month, 2) || year.len() != 4 || !well_formed(year, 4)
    {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Parses `H:MM`, `H:MM:SS` or either with an `am`/`pm` suffix.
pub fn parse_wire_time(text: &str) -> Option<NaiveTime> {
    let lower = text.trim().to_ascii_lowercase();
    let (clock, meridiem) = if let Some(rest) = lower.strip_suffix("pm") {
        (rest.trim_end(), Some(Meridiem::Pm))
    } else if let Some(rest) = lower.strip_suffix("am") {
        (rest.trim_end(), Some(Meridiem::Am))
    } else {
        (lower.as_str(), None)
    };

    let mut parts = clock.split(':');
    let mut hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = parts.next()?.trim().parse().ok()?;
    let second: u32 = match parts.next() {
        Some(s) => s.trim().parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    let max_hour = if meridiem.is_some() { 12 } else { 23 };
    if hour > max_hour {
        return None;
    }
    match meridiem {
        Some(Meridiem::Pm) if hour != 12 => hour += 12,
        Some(Meridiem::Am) if hour == 12 => hour = 0,
        _ => {}
    }
    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Combines a wire date with an optional wire time.
///
/// A missing or empty time means midnight; an unreadable time is a failure.
pub fn parse_wire_datetime(date: &str, time: Option<&str>) -> Option<NaiveDateTime> {
    let day = parse_wire_date(date)?;
    let clock = match time.map(str::trim) {
        None | Some("") => NaiveTime::MIN,
        Some(t) => parse_wire_time(t)?,
    };
    Some(day.and_time(clock))
}

/// Parses the unsettled-bills format `dd-mm-yyyy[ h:mm am|pm]`.
///
/// The time part is optional; when absent or unreadable the hour is 0.
pub fn parse_combined_datetime(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    let (date_part, time_part) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));
    let day = parse_wire_date(date_part)?;
    let clock = parse_wire_time(time_part).unwrap_or(NaiveTime::MIN);
    Some(day.and_time(clock))
}

/// Time for the bill preview: `07:30 PM` when readable, the raw text otherwise.
pub fn display_time(raw: &str) -> String {
    match parse_wire_time(raw) {
        Some(time) => time.format("%I:%M %p").to_string(),
        None => raw.to_string(),
    }
}

/// `dd-mm-yyyy`, the format both the API and the calendar query use.
pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE).to_string()
}

/// `yyyy-mm-dd`, the format of date inputs and stored preferences.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), ISO_DATE).ok()
}

/// Human readable, e.g. "05 Mar 2024".
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Invalid Month",
    }
}

pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// First and last day of the given month.
pub fn month_window(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next) = next_month(year, month);
    let last = NaiveDate::from_ymd_opt(next_year, next, 1)? - Duration::days(1);
    Some((first, last))
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    month_window(year, month)
        .map(|(_, last)| last.day())
        .unwrap_or(30)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_wire_date_round_trip() {
        for day in 1..=28u32 {
            for month in 1..=12u32 {
                let wire = format!("{:02}-{:02}-2024", day, month);
                let parsed = parse_wire_datetime(&wire, Some("07:45 pm")).unwrap();
                assert_eq!(format_wire_date(parsed.date()), wire);
            }
        }
    }

    #[test]
    fn test_am_pm_conversion() {
        assert_eq!(parse_wire_time("12:00 am").unwrap().hour(), 0);
        assert_eq!(parse_wire_time("12:00 pm").unwrap().hour(), 12);
        assert_eq!(parse_wire_time("01:30 pm").unwrap().hour(), 13);
        assert_eq!(parse_wire_time("01:30 PM").unwrap().minute(), 30);
        assert_eq!(parse_wire_time("9:05AM").unwrap().hour(), 9);
        assert_eq!(parse_wire_time("18:20").unwrap().hour(), 18);
        assert_eq!(parse_wire_time("18:20:15").unwrap().second(), 15);
    }

    #[test]
    fn test_bad_times_are_rejected() {
        assert!(parse_wire_time("").is_none());
        assert!(parse_wire_time("7").is_none());
        assert!(parse_wire_time("25:00").is_none());
        assert!(parse_wire_time("13:00 pm").is_none());
        assert!(parse_wire_time("ab:cd").is_none());
    }

    #[test]
    fn test_oversized_hours_are_rejected() {
        assert!(parse_wire_time("4294967290:00 pm").is_none());
        assert!(parse_wire_time("4294967295:00 am").is_none());
        assert!(parse_wire_time("24:00").is_none());
        assert_eq!(display_time("4294967295:00 pm"), "4294967295:00 pm");
    }

    #[test]
    fn test_datetime_defaults_to_midnight() {
        let parsed = parse_wire_datetime("15-08-2024", None).unwrap();
        assert_eq!(parsed.hour(), 0);
        let parsed = parse_wire_datetime("15-08-2024", Some("  ")).unwrap();
        assert_eq!(parsed.minute(), 0);
        assert!(parse_wire_datetime("15-08-2024", Some("later")).is_none());
        assert!(parse_wire_datetime("31-02-2024", None).is_none());
        assert!(parse_wire_datetime("2024-08-15", None).is_none());
    }

    #[test]
    fn test_date_embedded_in_text() {
        assert_eq!(
            parse_wire_date("Thu, 15-08-2024"),
            NaiveDate::from_ymd_opt(2024, 8, 15)
        );
        assert_eq!(
            parse_wire_date("Date:5-8-2024 10:00 am"),
            NaiveDate::from_ymd_opt(2024, 8, 5)
        );
        assert_eq!(parse_wire_date("no date here"), None);
    }

    #[test]
    fn test_date_with_trailing_punctuation() {
        let expected = NaiveDate::from_ymd_opt(2024, 8, 15);
        assert_eq!(parse_wire_date("15-08-2024."), expected);
        assert_eq!(parse_wire_date("(15-08-2024)"), expected);
        assert_eq!(parse_wire_date("on 15-08-2024, evening"), expected);
    }

    #[test]
    fn test_combined_datetime_tolerates_missing_time() {
        let with_time = parse_combined_datetime("03-01-2025 6:15 pm").unwrap();
        assert_eq!((with_time.hour(), with_time.minute()), (18, 15));
        let without = parse_combined_datetime("03-01-2025").unwrap();
        assert_eq!(without.hour(), 0);
        let garbage_time = parse_combined_datetime("03-01-2025 soon").unwrap();
        assert_eq!(garbage_time.hour(), 0);
        assert!(parse_combined_datetime("soon").is_none());
    }

    #[test]
    fn test_display_time_falls_back_to_raw() {
        assert_eq!(display_time("7:30 pm"), "07:30 PM");
        assert_eq!(display_time("Evening"), "Evening");
        assert_eq!(display_time(""), "");
    }

    #[test]
    fn test_month_navigation() {
        assert_eq!(previous_month(2025, 1), (2024, 12));
        assert_eq!(next_month(2025, 12), (2026, 1));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        let (first, last) = month_window(2025, 4).unwrap();
        assert_eq!(format_wire_date(first), "01-04-2025");
        assert_eq!(format_wire_date(last), "30-04-2025");
    }

    #[test]
    fn test_iso_dates() {
        let date = parse_iso_date("2025-03-09").unwrap();
        assert_eq!(format_iso_date(date), "2025-03-09");
        assert_eq!(format_display_date(date), "09 Mar 2025");
        assert!(parse_iso_date("09-03-2025").is_none());
    }
}
