use std::rc::Rc;

use chrono::NaiveDate;
use yew::prelude::*;
use shared::datetime::format_display_date;
use shared::{BillRecord, DeletedKind, Session};

mod components;
mod hooks;
mod services;

use components::bill_list::BillList;
use components::bill_preview::{BillPreview, PreviewTarget};
use components::calendar::Calendar;
use components::deleted_list::DeletedList;
use components::header::Header;
use components::items_list::ItemsList;
use components::login_form::LoginForm;
use components::receipt_form::{ReceiptForm, ReceiptTarget};
use components::unsettled_bills::UnsettledBills;
use services::api::ApiClient;
use services::logging::Logger;
use services::storage::Preferences;

/// Top-level screens.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Calendar,
    Bills,
    Unsettled,
    Items,
    Deleted(DeletedKind),
    BillPreview(PreviewTarget),
    Receipt(ReceiptTarget),
}

impl Screen {
    /// The navigation entry a screen is shown under.
    pub fn section(&self) -> Screen {
        match self {
            Screen::BillPreview(_) | Screen::Receipt(_) => Screen::Bills,
            other => other.clone(),
        }
    }
}

#[function_component(App)]
fn app() -> Html {
    let api_client: Rc<ApiClient> = use_memo((), |_| ApiClient::new(Preferences::new()));
    let session = {
        let api_client = api_client.clone();
        use_state(move || api_client.preferences().session())
    };
    let screen = use_state(|| Screen::Calendar);
    let booking_prompt = use_state(|| Option::<NaiveDate>::None);

    let on_login = {
        let session = session.clone();
        let screen = screen.clone();
        Callback::from(move |signed_in: Session| {
            session.set(Some(signed_in));
            screen.set(Screen::Calendar);
        })
    };

    let on_logout = {
        let api_client = api_client.clone();
        let session = session.clone();
        Callback::from(move |_| {
            api_client.preferences().clear_session();
            log::info!(target: "app", "Signed out");
            session.set(None);
        })
    };

    let on_navigate = {
        let screen = screen.clone();
        let booking_prompt = booking_prompt.clone();
        Callback::from(move |next: Screen| {
            booking_prompt.set(None);
            screen.set(next);
        })
    };

    let Some(current_session) = (*session).clone() else {
        return html! {
            <div class="app">
                <main class="main">
                    <div class="container">
                        <LoginForm api_client={(*api_client).clone()} {on_login} />
                    </div>
                </main>
            </div>
        };
    };

    let to_bills = {
        let screen = screen.clone();
        Callback::from(move |_| screen.set(Screen::Bills))
    };

    let on_preview = {
        let screen = screen.clone();
        Callback::from(move |bill: BillRecord| screen.set(Screen::BillPreview(PreviewTarget::from_bill(&bill))))
    };

    let on_receipt = {
        let screen = screen.clone();
        Callback::from(move |bill: BillRecord| screen.set(Screen::Receipt(ReceiptTarget::from_bill(&bill))))
    };

    let on_create_booking = {
        let booking_prompt = booking_prompt.clone();
        Callback::from(move |date: NaiveDate| booking_prompt.set(Some(date)))
    };

    let client = (*api_client).clone();
    let body = match &*screen {
        Screen::Calendar => html! {
            <Calendar api_client={client} hotel_id={Some(current_session.hotel_id.clone())} {on_create_booking} />
        },
        Screen::Bills => html! { <BillList api_client={client} {on_preview} {on_receipt} /> },
        Screen::Unsettled => html! { <UnsettledBills api_client={client} /> },
        Screen::Items => html! { <ItemsList api_client={client} /> },
        Screen::Deleted(kind) => html! {
            <DeletedList key={kind.to_string()} api_client={client} kind={*kind} />
        },
        Screen::BillPreview(target) => html! {
            <BillPreview
                api_client={client}
                target={target.clone()}
                hotel_name={current_session.hotel_name.clone()}
                on_back={to_bills}
            />
        },
        Screen::Receipt(target) => html! {
            <ReceiptForm api_client={client} target={target.clone()} on_back={to_bills} />
        },
    };

    let prompt = match *booking_prompt {
        Some(date) => {
            let on_dismiss = {
                let booking_prompt = booking_prompt.clone();
                Callback::from(move |_: MouseEvent| booking_prompt.set(None))
            };
            html! {
                <div class="form-message info booking-prompt">
                    {format!("No bookings on {}. Create a booking for this date?", format_display_date(date))}
                    <button class="btn btn-secondary" onclick={on_dismiss}>{"Dismiss"}</button>
                </div>
            }
        }
        None => html! {},
    };

    html! {
        <div class="app">
            <Header
                session={current_session.clone()}
                current={(*screen).clone()}
                {on_navigate}
                {on_logout}
            />
            <main class="main">
                <div class="container">
                    {prompt}
                    {body}
                </div>
            </main>
        </div>
    }
}

fn main() {
    Logger::init();
    yew::Renderer::<App>::new().render();
}
