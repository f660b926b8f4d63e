use std::str::FromStr;

use yew::prelude::*;
use shared::calendar::{CalendarEvent, EventFilter, StatusBucket};
use shared::datetime::{month_window, next_month, previous_month};
use shared::DateRange;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, MouseEvent};
use crate::services::api::ApiClient;
use crate::services::date_utils::current_month;

#[derive(Clone, PartialEq)]
pub enum CalendarLoad {
    Loading,
    Loaded(Vec<CalendarEvent>),
    Error(String),
}

#[derive(Clone, PartialEq)]
pub struct CalendarState {
    pub year: i32,
    pub month: u32,
    pub load: CalendarLoad,
    pub filter: EventFilter,
}

impl CalendarState {
    /// The loaded events that pass the current filter, recomputed in full.
    pub fn visible_events(&self) -> Vec<CalendarEvent> {
        match &self.load {
            CalendarLoad::Loaded(events) => self.filter.apply(events),
            _ => Vec::new(),
        }
    }
}

pub struct UseCalendarResult {
    pub state: CalendarState,
    pub actions: UseCalendarActions,
}

#[derive(Clone)]
pub struct UseCalendarActions {
    pub prev_month: Callback<MouseEvent>,
    pub next_month: Callback<MouseEvent>,
    pub on_query_change: Callback<InputEvent>,
    pub on_status_change: Callback<Event>,
    pub refresh_calendar: Callback<()>,
}

/// Bookings for the displayed month. Refetches when the month or the hotel
/// changes; search and status filtering never refetch.
#[hook]
pub fn use_calendar(api_client: &ApiClient, hotel_id: Option<String>) -> UseCalendarResult {
    let displayed = use_state(current_month);
    let load = use_state(|| CalendarLoad::Loading);
    let filter = use_state(EventFilter::default);
    let refresh_count = use_state(|| 0u32);

    let refresh_calendar = {
        let refresh_count = refresh_count.clone();
        Callback::from(move |_| refresh_count.set(*refresh_count + 1))
    };

    let prev_month = {
        let displayed = displayed.clone();
        Callback::from(move |_: MouseEvent| {
            let (year, month) = *displayed;
            displayed.set(previous_month(year, month));
        })
    };

    let next_month = {
        let displayed = displayed.clone();
        Callback::from(move |_: MouseEvent| {
            let (year, month) = *displayed;
            displayed.set(next_month(year, month));
        })
    };

    let on_query_change = {
        let filter = filter.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            filter.set(EventFilter {
                query: input.value(),
                status: filter.status,
            });
        })
    };

    let on_status_change = {
        let filter = filter.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let status = StatusBucket::from_str(&select.value()).unwrap_or_default();
            filter.set(EventFilter {
                query: filter.query.clone(),
                status,
            });
        })
    };

    use_effect_with((*displayed, hotel_id, *refresh_count), {
        let api_client = api_client.clone();
        let load = load.clone();
        move |((year, month), hotel_id, _)| {
            let window = month_window(*year, *month);
            match (window, hotel_id) {
                (Some((from, to)), Some(_)) => {
                    load.set(CalendarLoad::Loading);
                    spawn_local(async move {
                        match api_client.get_calendar_events(DateRange { from, to }).await {
                            Ok(events) => {
                                log::debug!(target: "calendar", "Loaded {} events", events.len());
                                load.set(CalendarLoad::Loaded(events));
                            }
                            Err(e) => {
                                log::error!(target: "calendar", "Failed to fetch bookings: {}", e);
                                load.set(CalendarLoad::Error(e.to_string()));
                            }
                        }
                    });
                }
                (None, _) => load.set(CalendarLoad::Error("Invalid month".to_string())),
                (_, None) => load.set(CalendarLoad::Error("No hotel selected".to_string())),
            }
            || ()
        }
    });

    let (year, month) = *displayed;
    UseCalendarResult {
        state: CalendarState {
            year,
            month,
            load: (*load).clone(),
            filter: (*filter).clone(),
        },
        actions: UseCalendarActions {
            prev_month,
            next_month,
            on_query_change,
            on_status_change,
            refresh_calendar,
        },
    }
}
