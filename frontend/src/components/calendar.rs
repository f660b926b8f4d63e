use chrono::{Datelike, NaiveDate};
use yew::prelude::*;
use shared::calendar::{day_click, CalendarEvent, DayClick, MonthGrid, PriorityStyle, StatusBucket};
use shared::datetime::{format_display_date, month_name};
use crate::hooks::use_calendar::{use_calendar, CalendarLoad};
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct CalendarProps {
    pub api_client: ApiClient,
    pub hotel_id: Option<String>,
    /// An empty day was clicked.
    pub on_create_booking: Callback<NaiveDate>,
}

fn event_chip(event: &CalendarEvent) -> Html {
    let style = PriorityStyle::for_priority(event.priority);
    let tooltip = format!(
        "{}\n{} - {}\n{}\n{}",
        event.title,
        event.start.format("%I:%M %p"),
        event.end.format("%I:%M %p"),
        event.location,
        event.description
    );
    html! {
        <div class={classes!("event-chip", event.priority.as_str())} style={style.css()} title={tooltip}>
            <span class="event-time">{event.start.format("%I:%M %p").to_string()}</span>
            <span class="event-title">{&event.title}</span>
        </div>
    }
}

#[function_component(Calendar)]
pub fn calendar(props: &CalendarProps) -> Html {
    let calendar = use_calendar(&props.api_client, props.hotel_id.clone());
    let selected_day = use_state(|| Option::<NaiveDate>::None);
    let state = &calendar.state;
    let actions = &calendar.actions;

    let visible = state.visible_events();

    let on_day_click = {
        let visible = visible.clone();
        let selected_day = selected_day.clone();
        let on_create_booking = props.on_create_booking.clone();
        Callback::from(move |date: NaiveDate| match day_click(&visible, date) {
            DayClick::ShowDay(date) => selected_day.set(Some(date)),
            DayClick::CreateBooking(date) => {
                selected_day.set(None);
                on_create_booking.emit(date);
            }
        })
    };

    let body = match &state.load {
        CalendarLoad::Loading => html! { <div class="loading">{"Loading calendar..."}</div> },
        CalendarLoad::Error(message) => html! {
            <div class="form-message error">
                {message}
                <button class="btn btn-secondary" onclick={{
                    let refresh = actions.refresh_calendar.clone();
                    Callback::from(move |_: MouseEvent| refresh.emit(()))
                }}>{"Retry"}</button>
            </div>
        },
        CalendarLoad::Loaded(_) => match MonthGrid::build(state.year, state.month, &visible) {
            Some(grid) => {
                let mut calendar_days = Vec::new();

                for _ in 0..grid.first_day_of_week {
                    calendar_days.push(html! {
                        <div class="calendar-day empty"></div>
                    });
                }

                for day in &grid.days {
                    let date = day.date;
                    let onclick = {
                        let on_day_click = on_day_click.clone();
                        Callback::from(move |_: MouseEvent| on_day_click.emit(date))
                    };
                    let class = if day.events.is_empty() {
                        "calendar-day"
                    } else {
                        "calendar-day booked"
                    };
                    calendar_days.push(html! {
                        <div class={class} {onclick}>
                            <div class="day-header">
                                <div class="day-number">{date.day()}</div>
                                {if !day.events.is_empty() {
                                    html! { <div class="day-count">{day.events.len()}</div> }
                                } else { html! {} }}
                            </div>
                            <div class="day-events">
                                {for day.events.iter().map(event_chip)}
                            </div>
                        </div>
                    });
                }

                html! {
                    <>
                        <div class="calendar-weekdays">
                            <div class="weekday">{"Sun"}</div>
                            <div class="weekday">{"Mon"}</div>
                            <div class="weekday">{"Tue"}</div>
                            <div class="weekday">{"Wed"}</div>
                            <div class="weekday">{"Thu"}</div>
                            <div class="weekday">{"Fri"}</div>
                            <div class="weekday">{"Sat"}</div>
                        </div>
                        <div class="calendar-grid">
                            {for calendar_days}
                        </div>
                        <div class="calendar-footer">
                            {format!("{} booking(s) shown", grid.event_count())}
                        </div>
                    </>
                }
            }
            None => html! { <div class="form-message error">{"Invalid month"}</div> },
        },
    };

    let day_panel = match *selected_day {
        Some(date) => {
            let events: Vec<&CalendarEvent> = visible.iter().filter(|e| e.falls_on(date)).collect();
            let on_close = {
                let selected_day = selected_day.clone();
                Callback::from(move |_: MouseEvent| selected_day.set(None))
            };
            html! {
                <aside class="day-panel">
                    <div class="day-panel-header">
                        <h3>{format_display_date(date)}</h3>
                        <button class="btn btn-secondary" onclick={on_close}>{"Close"}</button>
                    </div>
                    <ul class="day-panel-events">
                        {for events.iter().map(|event| html! {
                            <li style={PriorityStyle::for_priority(event.priority).css()}>
                                <strong>{&event.title}</strong>
                                <div>{format!("{} - {}", event.start.format("%I:%M %p"), event.end.format("%I:%M %p"))}</div>
                                <div>{&event.location}</div>
                                <div class="muted">{&event.description}</div>
                            </li>
                        })}
                    </ul>
                </aside>
            }
        }
        None => html! {},
    };

    html! {
        <section class="calendar-section">
            <div class="calendar-toolbar">
                <button class="btn btn-secondary" onclick={actions.prev_month.clone()}>{"‹"}</button>
                <h2>{format!("{} {}", month_name(state.month), state.year)}</h2>
                <button class="btn btn-secondary" onclick={actions.next_month.clone()}>{"›"}</button>
                <input
                    type="search"
                    placeholder="Search party, venue, event..."
                    value={state.filter.query.clone()}
                    oninput={actions.on_query_change.clone()}
                />
                <select onchange={actions.on_status_change.clone()}>
                    {for StatusBucket::ALL.iter().map(|bucket| html! {
                        <option value={bucket.as_str()} selected={*bucket == state.filter.status}>
                            {bucket.label()}
                        </option>
                    })}
                </select>
            </div>
            <div class="calendar">
                {body}
            </div>
            {day_panel}
        </section>
    }
}
