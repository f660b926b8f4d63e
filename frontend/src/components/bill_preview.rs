use yew::prelude::*;
use web_sys::HtmlInputElement;
use wasm_bindgen_futures::spawn_local;
use shared::billing::{event_tax_total, BillDetail, BillSummary};
use shared::export::{phone_digits, share_message, validate_phone};
use shared::money::format_inr;
use shared::{BillRecord, SummaryFallbacks};
use crate::hooks::use_bill_preview::{use_bill_preview, PreviewLoad};
use crate::services::api::ApiClient;
use crate::services::pdf::{RenderedInvoice, ShareOutcome};

const PRINT_ELEMENT_ID: &str = "bill-print";

/// Which bill to preview, plus the list-row figures used when the print
/// payload leaves totals out.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewTarget {
    pub quotation_id: String,
    pub bill_id: String,
    pub quotation_no: String,
    pub party_name: String,
    pub fallbacks: SummaryFallbacks,
}

impl PreviewTarget {
    pub fn from_bill(bill: &BillRecord) -> Self {
        Self {
            quotation_id: bill.quotation_id.clone(),
            bill_id: bill.invoice_id.clone(),
            quotation_no: bill.quotation_no.clone(),
            party_name: bill.party_name.clone(),
            fallbacks: SummaryFallbacks {
                grand_total: Some(bill.bill_amount),
                received: Some(bill.received_amount),
            },
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct BillPreviewProps {
    pub api_client: ApiClient,
    pub target: PreviewTarget,
    pub hotel_name: String,
    pub on_back: Callback<()>,
}

fn money_row(label: &str, amount: f64) -> Html {
    html! {
        <tr>
            <td>{label.to_string()}</td>
            <td class="amount">{format_inr(amount)}</td>
        </tr>
    }
}

fn invoice_document(hotel_name: &str, detail: &BillDetail, summary: &BillSummary) -> Html {
    let header = &detail.header;
    html! {
        <div id={PRINT_ELEMENT_ID} class="bill-print">
            <div class="bill-title">
                <h2>{hotel_name.to_string()}</h2>
                <h3>{"TAX INVOICE"}</h3>
            </div>

            <div class="bill-header">
                <div>
                    <div><strong>{"Invoice No: "}</strong>{&header.invoice_no}</div>
                    <div><strong>{"Date: "}</strong>{format!("{} {}", header.invoice_date, header.invoice_time)}</div>
                    <div><strong>{"Function: "}</strong>{&header.function_name}</div>
                    <div><strong>{"Venue: "}</strong>{&header.venue}</div>
                    <div>
                        <strong>{"Function date: "}</strong>
                        {format!("{} {} - {}", header.function_date, header.time_from, header.time_to)}
                    </div>
                </div>
                <div>
                    <div><strong>{"Party: "}</strong>{&header.party_name}</div>
                    <div><strong>{"Billing company: "}</strong>{&header.billing_company}</div>
                    <div><strong>{"GST No: "}</strong>{&header.gst_no}</div>
                    <div class="muted">{&header.address}</div>
                </div>
            </div>

            {for detail.events.iter().map(|event| html! {
                <div class="bill-event">
                    <div class="bill-event-header">
                        <strong>{&event.name}</strong>
                        <span>{format!("{} | {} | {} - {}", event.date, event.venue, event.time_from, event.time_to)}</span>
                        {if event.min_pax > 0.0 {
                            html! { <span>{format!("Min pax: {}", event.min_pax)}</span> }
                        } else { html! {} }}
                    </div>
                    <table class="bill-items">
                        <thead>
                            <tr>
                                <th>{"Item"}</th>
                                <th>{"Qty"}</th>
                                <th>{"Rate"}</th>
                                <th>{"Amount"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            {for event.items.iter().map(|item| html! {
                                <tr>
                                    <td>{&item.name}</td>
                                    <td>{item.quantity.to_string()}</td>
                                    <td class="amount">{format_inr(item.rate)}</td>
                                    <td class="amount">{format_inr(item.amount)}</td>
                                </tr>
                            })}
                        </tbody>
                    </table>
                    {if event.taxes.is_empty() { html! {} } else {
                        html! {
                            <div class="bill-taxes">
                                {for event.taxes.iter().map(|tax| html! {
                                    <span>{format!("{} @ {}%: {}", tax.name, tax.percent, format_inr(tax.amount))}</span>
                                })}
                                <span><strong>{format!("Tax total: {}", format_inr(event_tax_total(event)))}</strong></span>
                            </div>
                        }
                    }}
                </div>
            })}

            <div class="bill-groups">
                <h4>{"Summary by category"}</h4>
                <table>
                    <tbody>
                        {for summary.groups.iter().map(|group| {
                            let name = if group.name.is_empty() { "Other" } else { group.name.as_str() };
                            money_row(name, group.subtotal)
                        })}
                    </tbody>
                </table>
            </div>

            <table class="bill-totals">
                <tbody>
                    {money_row("Sub total", summary.sub_total)}
                    {money_row("Discount", summary.discount)}
                    {money_row("Tax", summary.tax)}
                    {money_row("Other charges", summary.other_charges)}
                    {money_row("Settlement discount", summary.settlement_discount)}
                    {money_row("Round off", summary.round_off)}
                    <tr class="grand-total">
                        <td>{"Grand total"}</td>
                        <td class="amount">{format_inr(summary.grand_total)}</td>
                    </tr>
                    {money_row("Advance received", summary.advance_received)}
                    {money_row("Balance", summary.remaining_balance)}
                </tbody>
            </table>
            <div class="amount-in-words">{&summary.amount_in_words}</div>
        </div>
    }
}

/// Printable invoice with PDF download and WhatsApp share.
#[function_component(BillPreview)]
pub fn bill_preview(props: &BillPreviewProps) -> Html {
    let target = &props.target;
    let load = use_bill_preview(
        &props.api_client,
        target.quotation_id.clone(),
        target.bill_id.clone(),
        target.fallbacks,
    );
    let phone = use_state(String::new);
    let busy = use_state(|| false);
    let message = use_state(|| Option::<Result<String, String>>::None);

    let on_back = {
        let on_back = props.on_back.clone();
        Callback::from(move |_: MouseEvent| on_back.emit(()))
    };

    let on_phone_change = {
        let phone = phone.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let digits = phone_digits(&input.value());
            input.set_value(&digits);
            phone.set(digits);
        })
    };

    let (invoice_no, party_name, grand_total) = match &load {
        PreviewLoad::Loaded { detail, summary } => {
            let number = if detail.header.invoice_no.is_empty() {
                target.quotation_no.clone()
            } else {
                detail.header.invoice_no.clone()
            };
            let party = if detail.header.party_name.is_empty() {
                target.party_name.clone()
            } else {
                detail.header.party_name.clone()
            };
            (number, party, summary.grand_total)
        }
        _ => (target.quotation_no.clone(), target.party_name.clone(), 0.0),
    };

    let on_download = {
        let busy = busy.clone();
        let message = message.clone();
        let invoice_no = invoice_no.clone();
        Callback::from(move |_: MouseEvent| {
            let busy = busy.clone();
            let message = message.clone();
            let invoice_no = invoice_no.clone();
            busy.set(true);
            message.set(None);
            spawn_local(async move {
                let result = match RenderedInvoice::render(PRINT_ELEMENT_ID, &invoice_no).await {
                    Ok(invoice) => invoice.download().map(|_| invoice.file_name().to_string()),
                    Err(e) => Err(e),
                };
                match result {
                    Ok(file_name) => message.set(Some(Ok(format!("Downloaded {}", file_name)))),
                    Err(e) => {
                        log::error!(target: "bill-preview", "PDF download failed: {:#}", e);
                        message.set(Some(Err(format!("{:#}", e))));
                    }
                }
                busy.set(false);
            });
        })
    };

    let on_share = {
        let busy = busy.clone();
        let message = message.clone();
        let phone = phone.clone();
        let hotel_name = props.hotel_name.clone();
        let invoice_no = invoice_no.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let digits = match validate_phone(&phone) {
                Ok(digits) => digits,
                Err(e) => {
                    message.set(Some(Err(e.to_string())));
                    return;
                }
            };
            let text = share_message(&party_name, &invoice_no, grand_total, &hotel_name);
            let invoice_no = invoice_no.clone();
            let busy = busy.clone();
            let message = message.clone();
            busy.set(true);
            message.set(None);
            spawn_local(async move {
                let result = match RenderedInvoice::render(PRINT_ELEMENT_ID, &invoice_no).await {
                    Ok(invoice) => invoice.share(&digits, &text).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(ShareOutcome::Native) => message.set(Some(Ok("Shared".to_string()))),
                    Ok(ShareOutcome::WhatsAppLink) => message.set(Some(Ok(
                        "WhatsApp opened; attach the downloaded PDF".to_string(),
                    ))),
                    Err(e) => {
                        log::error!(target: "bill-preview", "Share failed: {:#}", e);
                        message.set(Some(Err(format!("{:#}", e))));
                    }
                }
                busy.set(false);
            });
        })
    };

    let loaded = matches!(load, PreviewLoad::Loaded { .. });

    html! {
        <section class="bill-preview-section">
            <div class="list-toolbar">
                <button class="btn btn-secondary" onclick={on_back}>{"Back"}</button>
                <h2>{format!("Bill {}", invoice_no)}</h2>
                <button class="btn btn-primary" onclick={on_download} disabled={!loaded || *busy}>
                    {"Download PDF"}
                </button>
                <form class="share-form" onsubmit={on_share}>
                    <input
                        type="tel"
                        placeholder="10-digit mobile number"
                        value={(*phone).clone()}
                        oninput={on_phone_change}
                        disabled={!loaded || *busy}
                    />
                    <button type="submit" class="btn btn-success" disabled={!loaded || *busy}>
                        {"Share on WhatsApp"}
                    </button>
                </form>
            </div>

            {match message.as_ref() {
                Some(Ok(text)) => html! { <div class="form-message success">{text}</div> },
                Some(Err(text)) => html! { <div class="form-message error">{text}</div> },
                None => html! {},
            }}

            {match &load {
                PreviewLoad::Loading => html! { <div class="loading">{"Loading bill..."}</div> },
                PreviewLoad::Error(error) => html! { <div class="form-message error">{error}</div> },
                PreviewLoad::Loaded { detail, summary } => invoice_document(&props.hotel_name, detail, summary),
            }}
        </section>
    }
}
