use yew::prelude::*;
use shared::DateRangeState;
use crate::hooks::use_date_range::UseDateRangeActions;
use crate::services::date_utils::input_value;

#[derive(Properties, PartialEq)]
pub struct DateRangePickerProps {
    pub state: DateRangeState,
    pub actions: UseDateRangeActions,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component(DateRangePicker)]
pub fn date_range_picker(props: &DateRangePickerProps) -> Html {
    html! {
        <div class="date-range-picker">
            <div class="form-group">
                <label for="from-date">{"From"}</label>
                <input
                    type="date"
                    id="from-date"
                    value={input_value(props.state.from())}
                    onchange={props.actions.on_from_change.clone()}
                    disabled={props.disabled}
                />
            </div>
            <div class="form-group">
                <label for="to-date">{"To"}</label>
                <input
                    type="date"
                    id="to-date"
                    value={input_value(props.state.to())}
                    onchange={props.actions.on_to_change.clone()}
                    disabled={props.disabled}
                />
            </div>
            {if let Some(error) = props.state.error() {
                html! { <div class="form-message error">{error.to_string()}</div> }
            } else { html! {} }}
        </div>
    }
}
