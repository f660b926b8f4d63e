use yew::prelude::*;
use web_sys::HtmlInputElement;
use shared::{DateRange, DateRangeState, RangeKeys};
use crate::services::date_utils::{from_input_value, today};
use crate::services::storage::Preferences;

pub struct UseDateRangeResult {
    pub state: DateRangeState,
    pub actions: UseDateRangeActions,
}

#[derive(Clone, PartialEq)]
pub struct UseDateRangeActions {
    pub on_from_change: Callback<Event>,
    pub on_to_change: Callback<Event>,
}

/// From/to pickers for a list screen, remembered under `keys` when given.
#[hook]
pub fn use_date_range(preferences: &Preferences, keys: Option<RangeKeys>) -> UseDateRangeResult {
    let state = {
        let preferences = preferences.clone();
        use_state(move || {
            let today = today();
            let range = match keys {
                Some(keys) => preferences.date_range(keys, today),
                None => DateRange::single_day(today),
            };
            DateRangeState::new(range)
        })
    };

    let apply = {
        let state = state.clone();
        let preferences = preferences.clone();
        move |next: DateRangeState| {
            match (keys, next.fetch_range()) {
                (Some(keys), Some(range)) => preferences.save_date_range(keys, range),
                (_, None) => log::debug!(target: "date-range", "Rejected crossing pick, keeping {:?}", next.range()),
                _ => {}
            }
            state.set(next);
        }
    };

    let on_from_change = {
        let state = state.clone();
        let apply = apply.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(date) = from_input_value(&input.value()) {
                apply(state.pick_from(date));
            }
        })
    };

    let on_to_change = {
        let state = state.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(date) = from_input_value(&input.value()) {
                apply(state.pick_to(date));
            }
        })
    };

    UseDateRangeResult {
        state: (*state).clone(),
        actions: UseDateRangeActions {
            on_from_change,
            on_to_change,
        },
    }
}
