use yew::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use shared::money::format_inr;
use shared::receipt::{LookupOption, ReceiptDraft};
use shared::{BillRecord, Endpoint};
use crate::services::api::ApiClient;
use crate::services::date_utils::{from_input_value, input_value, today};

/// The bill a receipt is being entered against.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptTarget {
    pub quotation_id: String,
    pub quotation_no: String,
    pub party_name: String,
    pub balance: f64,
}

impl ReceiptTarget {
    pub fn from_bill(bill: &BillRecord) -> Self {
        Self {
            quotation_id: bill.quotation_id.clone(),
            quotation_no: bill.quotation_no.clone(),
            party_name: bill.party_name.clone(),
            balance: bill.balance(),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ReceiptFormProps {
    pub api_client: ApiClient,
    pub target: ReceiptTarget,
    pub on_back: Callback<()>,
}

#[derive(Clone, Default, PartialEq)]
struct Lookups {
    ledgers: Vec<LookupOption>,
    accounts: Vec<LookupOption>,
    paymodes: Vec<LookupOption>,
}

fn event_value(e: &Event) -> String {
    let Some(target) = e.target() else {
        return String::new();
    };
    if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else if let Some(area) = target.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else {
        String::new()
    }
}

fn lookup_select(id: &str, label: &str, options: &[LookupOption], selected: &str, onchange: Callback<Event>, disabled: bool) -> Html {
    html! {
        <div class="form-group">
            <label for={id.to_string()}>{label.to_string()}</label>
            <select id={id.to_string()} {onchange} {disabled}>
                <option value="" selected={selected.is_empty()}>{"Select..."}</option>
                {for options.iter().map(|option| html! {
                    <option value={option.id.clone()} selected={option.id == selected}>{&option.name}</option>
                })}
            </select>
        </div>
    }
}

/// Records a payment against a bill.
#[function_component(ReceiptForm)]
pub fn receipt_form(props: &ReceiptFormProps) -> Html {
    let draft = {
        let quotation_id = props.target.quotation_id.clone();
        use_state(move || ReceiptDraft::new(quotation_id, today()))
    };
    let lookups = use_state(Lookups::default);
    let lookup_error = use_state(|| Option::<String>::None);
    let submitting = use_state(|| false);
    let form_error = use_state(|| Option::<String>::None);
    let form_success = use_state(|| false);

    // Dropdown contents, once per mount
    {
        let api_client = props.api_client.clone();
        let lookups = lookups.clone();
        let lookup_error = lookup_error.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let ledgers = api_client.get_lookup(Endpoint::LedgerList).await;
                let accounts = api_client.get_lookup(Endpoint::AccountList).await;
                let paymodes = api_client.get_lookup(Endpoint::PaymodeList).await;
                match (ledgers, accounts, paymodes) {
                    (Ok(ledgers), Ok(accounts), Ok(paymodes)) => lookups.set(Lookups {
                        ledgers,
                        accounts,
                        paymodes,
                    }),
                    (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                        log::error!(target: "receipt", "Failed to load receipt lookups: {}", e);
                        lookup_error.set(Some(format!("Could not load form options: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    let field = |apply: fn(&mut ReceiptDraft, String)| {
        let draft = draft.clone();
        let form_success = form_success.clone();
        Callback::from(move |e: Event| {
            let mut next = (*draft).clone();
            apply(&mut next, event_value(&e));
            draft.set(next);
            form_success.set(false);
        })
    };

    let on_date_change = field(|d, value| {
        if let Some(date) = from_input_value(&value) {
            d.date = date;
        }
    });
    let on_ledger_change = field(|d, value| d.ledger_id = value);
    let on_account_change = field(|d, value| d.account_id = value);
    let on_paymode_change = field(|d, value| d.paymode_id = value);
    let on_amount_change = field(|d, value| d.amount = value);
    let on_discount_change = field(|d, value| d.discount = value);
    let on_tds_change = field(|d, value| d.tds = value);
    let on_note_change = field(|d, value| d.note = value);

    let on_submit = {
        let api_client = props.api_client.clone();
        let draft = draft.clone();
        let submitting = submitting.clone();
        let form_error = form_error.clone();
        let form_success = form_success.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(login_id) = api_client.preferences().login_id() else {
                form_error.set(Some("Session expired, please sign in again".to_string()));
                return;
            };
            let request = match draft.validate(&login_id) {
                Ok(request) => request,
                Err(e) => {
                    form_error.set(Some(e.to_string()));
                    return;
                }
            };

            let api_client = api_client.clone();
            let draft = draft.clone();
            let submitting = submitting.clone();
            let form_error = form_error.clone();
            let form_success = form_success.clone();
            submitting.set(true);
            form_error.set(None);
            form_success.set(false);

            spawn_local(async move {
                match api_client.save_receipt(request).await {
                    Ok(()) => {
                        log::info!(target: "receipt", "Saved receipt for {}", draft.quotation_id);
                        draft.set(ReceiptDraft {
                            amount: String::new(),
                            discount: String::new(),
                            tds: String::new(),
                            note: String::new(),
                            ..(*draft).clone()
                        });
                        form_success.set(true);
                    }
                    Err(e) => {
                        log::error!(target: "receipt", "Failed to save receipt: {}", e);
                        form_error.set(Some(e.to_string()));
                    }
                }
                submitting.set(false);
            });
        })
    };

    let on_back = {
        let on_back = props.on_back.clone();
        Callback::from(move |_: MouseEvent| on_back.emit(()))
    };

    let target = &props.target;
    let disabled = *submitting;

    html! {
        <section class="receipt-section">
            <div class="list-toolbar">
                <button class="btn btn-secondary" onclick={on_back}>{"Back"}</button>
                <h2>{format!("Receipt for {}", target.quotation_no)}</h2>
            </div>
            <div class="receipt-bill">
                <span>{&target.party_name}</span>
                <span>{format!("Balance: {}", format_inr(target.balance))}</span>
            </div>

            {if let Some(error) = lookup_error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}
            {if let Some(error) = form_error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}
            {if *form_success {
                html! { <div class="form-message success">{"Receipt saved"}</div> }
            } else { html! {} }}

            <form class="receipt-form" onsubmit={on_submit}>
                <div class="form-group">
                    <label for="receipt-date">{"Date"}</label>
                    <input
                        type="date"
                        id="receipt-date"
                        value={input_value(draft.date)}
                        onchange={on_date_change}
                        {disabled}
                    />
                </div>
                {lookup_select("receipt-ledger", "Ledger", &lookups.ledgers, &draft.ledger_id, on_ledger_change, disabled)}
                {lookup_select("receipt-account", "Account", &lookups.accounts, &draft.account_id, on_account_change, disabled)}
                {lookup_select("receipt-paymode", "Payment mode", &lookups.paymodes, &draft.paymode_id, on_paymode_change, disabled)}
                <div class="form-group">
                    <label for="receipt-amount">{"Amount"}</label>
                    <input
                        type="number"
                        id="receipt-amount"
                        step="0.01"
                        min="0"
                        value={draft.amount.clone()}
                        onchange={on_amount_change}
                        {disabled}
                    />
                </div>
                <div class="form-group">
                    <label for="receipt-discount">{"Discount"}</label>
                    <input
                        type="number"
                        id="receipt-discount"
                        step="0.01"
                        min="0"
                        placeholder="0"
                        value={draft.discount.clone()}
                        onchange={on_discount_change}
                        {disabled}
                    />
                </div>
                <div class="form-group">
                    <label for="receipt-tds">{"TDS"}</label>
                    <input
                        type="number"
                        id="receipt-tds"
                        step="0.01"
                        min="0"
                        placeholder="0"
                        value={draft.tds.clone()}
                        onchange={on_tds_change}
                        {disabled}
                    />
                </div>
                <div class="form-group">
                    <label for="receipt-note">{"Note"}</label>
                    <textarea
                        id="receipt-note"
                        value={draft.note.clone()}
                        onchange={on_note_change}
                        {disabled}
                    />
                </div>
                <button type="submit" class="btn btn-primary" {disabled}>
                    {if disabled { "Saving..." } else { "Save receipt" }}
                </button>
            </form>
        </section>
    }
}
