//! Calendar domain logic: turning booking rows into calendar events and
//! filtering them for display.
//!
//! The month view fetches one window of bookings, derives events once, and
//! then recomputes the visible set from scratch whenever the search text or
//! status bucket changes. Nothing here is incremental; the data volumes are a
//! few hundred events at most.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::datetime::{days_in_month, parse_wire_date, parse_wire_datetime};
use crate::wire::lenient_string;

/// Every derived event carries the same category.
pub const EVENT_CATEGORY: &str = "booking";

const CONFIRMED_MARKER: &str = "CONFIRMED";
const WAITLISTED_MARKER: &str = "WAITLISTED";

/// One row of the calendar endpoint's `result2` array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawBooking {
    #[serde(deserialize_with = "lenient_string")]
    pub quotation_event_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub party_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub event_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub event_end_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub time_from: String,
    #[serde(deserialize_with = "lenient_string")]
    pub time_to: String,
    /// The API spells it this way.
    #[serde(deserialize_with = "lenient_string")]
    pub vanue_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub event_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: String,
    pub priority: Priority,
    pub category: String,
    pub description: String,
}

impl CalendarEvent {
    /// Whether the event covers any part of `date`.
    pub fn falls_on(&self, date: NaiveDate) -> bool {
        let end = if self.end < self.start { self.start } else { self.end };
        self.start.date() <= date && date <= end.date()
    }

    fn title_has(&self, marker: &str) -> bool {
        self.title.to_uppercase().contains(marker)
    }
}

/// `high` for CONFIRMED, `medium` for WAITLISTED, `low` otherwise.
/// CONFIRMED is checked first.
pub fn classify_priority(title: &str) -> Priority {
    let upper = title.to_uppercase();
    if upper.contains(CONFIRMED_MARKER) {
        Priority::High
    } else if upper.contains(WAITLISTED_MARKER) {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Builds one event, or `None` when the start cannot be read.
///
/// The end uses `EventEndDate` when it parses (else the start date) with
/// `TimeTo`; if that fails the event ends when it starts.
pub fn derive_event(raw: &RawBooking) -> Option<CalendarEvent> {
    let start = parse_wire_datetime(&raw.event_date, Some(&raw.time_from))?;

    let end_date = if parse_wire_date(&raw.event_end_date).is_some() {
        raw.event_end_date.as_str()
    } else {
        raw.event_date.as_str()
    };
    let end = match raw.time_to.trim() {
        "" => start,
        time_to => parse_wire_datetime(end_date, Some(time_to)).unwrap_or(start),
    };

    Some(CalendarEvent {
        id: raw.quotation_event_id.clone(),
        title: raw.party_name.clone(),
        start,
        end,
        location: raw.vanue_name.clone(),
        priority: classify_priority(&raw.party_name),
        category: EVENT_CATEGORY.to_string(),
        description: raw.event_name.clone(),
    })
}

pub fn derive_events(rows: &[RawBooking]) -> Vec<CalendarEvent> {
    let events: Vec<CalendarEvent> = rows.iter().filter_map(derive_event).collect();
    if events.len() < rows.len() {
        log::warn!(
            "Dropped {} booking(s) with unreadable dates",
            rows.len() - events.len()
        );
    }
    events
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusBucket {
    #[default]
    All,
    Confirmed,
    Waitlisted,
    Tentative,
}

impl StatusBucket {
    pub const ALL: [StatusBucket; 4] = [
        StatusBucket::All,
        StatusBucket::Confirmed,
        StatusBucket::Waitlisted,
        StatusBucket::Tentative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusBucket::All => "all",
            StatusBucket::Confirmed => "confirmed",
            StatusBucket::Waitlisted => "waitlisted",
            StatusBucket::Tentative => "tentative",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusBucket::All => "All",
            StatusBucket::Confirmed => "Confirmed",
            StatusBucket::Waitlisted => "Waitlisted",
            StatusBucket::Tentative => "Tentative",
        }
    }
}

impl fmt::Display for StatusBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(StatusBucket::All),
            "confirmed" => Ok(StatusBucket::Confirmed),
            "waitlisted" => Ok(StatusBucket::Waitlisted),
            "tentative" => Ok(StatusBucket::Tentative),
            other => Err(format!("Unknown status bucket: {}", other)),
        }
    }
}

// Both the derived priority and the raw title marker are checked. Older
// records carry the marker in the title without a matching status.
fn is_confirmed(event: &CalendarEvent) -> bool {
    event.priority == Priority::High || event.title_has(CONFIRMED_MARKER)
}

fn is_waitlisted(event: &CalendarEvent) -> bool {
    event.priority == Priority::Medium || event.title_has(WAITLISTED_MARKER)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub query: String,
    pub status: StatusBucket,
}

impl EventFilter {
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        self.matches_query(event) && self.matches_status(event)
    }

    fn matches_query(&self, event: &CalendarEvent) -> bool {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [&event.title, &event.location, &event.description]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }

    fn matches_status(&self, event: &CalendarEvent) -> bool {
        match self.status {
            StatusBucket::All => true,
            StatusBucket::Confirmed => is_confirmed(event),
            StatusBucket::Waitlisted => is_waitlisted(event),
            StatusBucket::Tentative => !is_confirmed(event) && !is_waitlisted(event),
        }
    }

    /// Recomputes the visible set from the full base set.
    pub fn apply(&self, events: &[CalendarEvent]) -> Vec<CalendarEvent> {
        events.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}

/// What clicking a day should do.
#[derive(Debug, Clone, PartialEq)]
pub enum DayClick {
    /// Nothing visible on that day: offer to create a booking.
    CreateBooking(NaiveDate),
    ShowDay(NaiveDate),
}

pub fn day_click(visible: &[CalendarEvent], date: NaiveDate) -> DayClick {
    if visible.iter().any(|e| e.falls_on(date)) {
        DayClick::ShowDay(date)
    } else {
        DayClick::CreateBooking(date)
    }
}

/// Colours for an event chip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityStyle {
    pub background: &'static str,
    pub border: &'static str,
}

impl PriorityStyle {
    pub fn for_priority(priority: Priority) -> Self {
        match priority {
            Priority::High => Self {
                background: "#d1fae5",
                border: "#059669",
            },
            Priority::Medium => Self {
                background: "#fef3c7",
                border: "#d97706",
            },
            Priority::Low => Self {
                background: "#e0e7ff",
                border: "#4f46e5",
            },
        }
    }

    pub fn css(&self) -> String {
        format!(
            "background-color: {}; border-left: 3px solid {};",
            self.background, self.border
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridDay {
    pub date: NaiveDate,
    pub events: Vec<CalendarEvent>,
}

/// A month laid out for a Sunday-first grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// 0 = Sunday; number of empty cells before day 1.
    pub first_day_of_week: u32,
    pub days: Vec<GridDay>,
}

impl MonthGrid {
    pub fn build(year: i32, month: u32, visible: &[CalendarEvent]) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let days = (1..=days_in_month(year, month))
            .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
            .map(|date| GridDay {
                date,
                events: visible.iter().filter(|e| e.falls_on(date)).cloned().collect(),
            })
            .collect();
        Some(Self {
            year,
            month,
            first_day_of_week: first.weekday().num_days_from_sunday(),
            days,
        })
    }

    pub fn event_count(&self) -> usize {
        self.days.iter().map(|d| d.events.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use serde_json::json;

    fn raw(id: &str, party: &str, date: &str, from: &str, to: &str) -> RawBooking {
        RawBooking {
            quotation_event_id: id.to_string(),
            party_name: party.to_string(),
            event_date: date.to_string(),
            time_from: from.to_string(),
            time_to: to.to_string(),
            vanue_name: "Crystal Hall".to_string(),
            event_name: "Wedding".to_string(),
            ..RawBooking::default()
        }
    }

    fn sample_events() -> Vec<CalendarEvent> {
        derive_events(&[
            raw("1", "Mehta CONFIRMED", "05-06-2025", "7:00 pm", "11:00 pm"),
            raw("2", "Rao WAITLISTED", "05-06-2025", "12:00 pm", "3:00 pm"),
            raw("3", "Iyer", "10-06-2025", "", ""),
            raw("4", "Khan CONFIRMED WAITLISTED", "12-06-2025", "9:00 am", "1:00 pm"),
        ])
    }

    #[test]
    fn test_priority_classification() {
        assert_eq!(classify_priority("Mehta - CONFIRMED"), Priority::High);
        assert_eq!(classify_priority("Rao (WAITLISTED)"), Priority::Medium);
        assert_eq!(classify_priority("Iyer"), Priority::Low);
        assert_eq!(classify_priority("WAITLISTED then CONFIRMED"), Priority::High);
    }

    #[test]
    fn test_derive_event_times() {
        let events = sample_events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].start.hour(), 19);
        assert_eq!(events[0].end.hour(), 23);
        assert_eq!(events[0].category, EVENT_CATEGORY);
        assert_eq!(events[0].location, "Crystal Hall");
        // No time at all: midnight, zero duration.
        assert_eq!(events[2].start, events[2].end);
        assert_eq!(events[2].start.hour(), 0);
    }

    #[test]
    fn test_bad_end_time_collapses_to_start() {
        let event = derive_event(&raw("9", "Das", "01-07-2025", "6:00 pm", "whenever")).unwrap();
        assert_eq!(event.end, event.start);
    }

    #[test]
    fn test_end_date_used_for_multi_day_events() {
        let mut booking = raw("9", "Das", "01-07-2025", "6:00 pm", "10:00 am");
        booking.event_end_date = "02-07-2025".to_string();
        let event = derive_event(&booking).unwrap();
        assert_eq!(event.end.date(), NaiveDate::from_ymd_opt(2025, 7, 2).unwrap());
        assert!(event.falls_on(NaiveDate::from_ymd_opt(2025, 7, 2).unwrap()));
    }

    #[test]
    fn test_unparseable_rows_are_dropped() {
        let events = derive_events(&[
            raw("1", "Ok", "01-07-2025", "", ""),
            raw("2", "Bad date", "2025/07/01", "", ""),
            raw("3", "Bad time", "01-07-2025", "noonish", ""),
        ]);
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn test_raw_booking_deserializes_numeric_ids() {
        let booking: RawBooking = serde_json::from_value(json!({
            "QuotationEventId": 42,
            "PartyName": "Gupta",
            "EventDate": "03-03-2025",
            "VanueName": "Terrace"
        }))
        .unwrap();
        assert_eq!(booking.quotation_event_id, "42");
        assert_eq!(booking.vanue_name, "Terrace");
        assert_eq!(booking.time_to, "");
    }

    #[test]
    fn test_status_buckets() {
        let events = sample_events();
        let ids = |status: StatusBucket| {
            EventFilter { query: String::new(), status }
                .apply(&events)
                .into_iter()
                .map(|e| e.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(StatusBucket::All), vec!["1", "2", "3", "4"]);
        assert_eq!(ids(StatusBucket::Confirmed), vec!["1", "4"]);
        // Khan is high priority but still carries the legacy WAITLISTED marker.
        assert_eq!(ids(StatusBucket::Waitlisted), vec!["2", "4"]);
        assert_eq!(ids(StatusBucket::Tentative), vec!["3"]);
    }

    #[test]
    fn test_text_filter_is_case_insensitive() {
        let events = sample_events();
        let filter = EventFilter { query: "crystal".to_string(), status: StatusBucket::All };
        assert_eq!(filter.apply(&events).len(), 4);
        let filter = EventFilter { query: "mEhTa".to_string(), status: StatusBucket::All };
        assert_eq!(filter.apply(&events).len(), 1);
        let filter = EventFilter { query: "wedding".to_string(), status: StatusBucket::Tentative };
        assert_eq!(filter.apply(&events).len(), 1);
        let filter = EventFilter { query: "nobody".to_string(), status: StatusBucket::All };
        assert!(filter.apply(&events).is_empty());
    }

    #[test]
    fn test_day_click() {
        let events = sample_events();
        let busy = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
        let free = NaiveDate::from_ymd_opt(2025, 6, 6).unwrap();
        assert_eq!(day_click(&events, busy), DayClick::ShowDay(busy));
        assert_eq!(day_click(&events, free), DayClick::CreateBooking(free));
        // A filtered-out day counts as empty.
        let confirmed = EventFilter {
            query: String::new(),
            status: StatusBucket::Confirmed,
        }
        .apply(&events);
        let iyer_day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        assert_eq!(day_click(&confirmed, iyer_day), DayClick::CreateBooking(iyer_day));
    }

    #[test]
    fn test_month_grid() {
        let events = sample_events();
        let grid = MonthGrid::build(2025, 6, &events).unwrap();
        // 1 June 2025 is a Sunday.
        assert_eq!(grid.first_day_of_week, 0);
        assert_eq!(grid.days.len(), 30);
        assert_eq!(grid.days[4].events.len(), 2);
        assert_eq!(grid.event_count(), 4);
        assert!(MonthGrid::build(2025, 13, &events).is_none());
    }

    #[test]
    fn test_status_bucket_parsing() {
        assert_eq!("Confirmed".parse::<StatusBucket>(), Ok(StatusBucket::Confirmed));
        assert_eq!("".parse::<StatusBucket>(), Ok(StatusBucket::All));
        assert!("cancelled".parse::<StatusBucket>().is_err());
        assert_eq!(PriorityStyle::for_priority(Priority::High).border, "#059669");
    }
}
