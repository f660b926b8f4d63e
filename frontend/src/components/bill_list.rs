use yew::prelude::*;
use web_sys::HtmlSelectElement;
use wasm_bindgen_futures::spawn_local;
use shared::listing::{distinct_statuses, filter_bills, BillListSummary, StatusFilter};
use shared::money::format_inr;
use shared::{BillRecord, RangeKeys, RecordState};
use super::date_range_picker::DateRangePicker;
use super::delete_reason_modal::DeleteReasonModal;
use super::search_bar::SearchBar;
use crate::hooks::use_record_list::{use_record_list, ListAction};
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct BillListProps {
    pub api_client: ApiClient,
    pub on_preview: Callback<BillRecord>,
    pub on_receipt: Callback<BillRecord>,
}

#[derive(Properties, PartialEq)]
struct SummaryStripProps {
    summary: BillListSummary,
}

#[function_component(SummaryStrip)]
fn summary_strip(props: &SummaryStripProps) -> Html {
    let s = &props.summary;
    html! {
        <div class="summary-strip">
            <div class="summary-item"><span>{"Bills"}</span><strong>{s.count}</strong></div>
            <div class="summary-item"><span>{"Total"}</span><strong>{format_inr(s.total)}</strong></div>
            <div class="summary-item"><span>{"Received"}</span><strong>{format_inr(s.received)}</strong></div>
            <div class="summary-item"><span>{"Discount"}</span><strong>{format_inr(s.discount)}</strong></div>
            <div class="summary-item"><span>{"TDS"}</span><strong>{format_inr(s.tds)}</strong></div>
            <div class="summary-item"><span>{"Balance"}</span><strong>{format_inr(s.balance)}</strong></div>
            <div class="summary-item"><span>{"Average"}</span><strong>{format_inr(s.average)}</strong></div>
            <div class="summary-breakdown">
                {for s.by_status.iter().map(|b| html! {
                    <span class="status-pill">
                        {format!("{}: {} / {}", b.status, b.count, format_inr(b.total))}
                    </span>
                })}
            </div>
        </div>
    }
}

#[function_component(BillList)]
pub fn bill_list(props: &BillListProps) -> Html {
    let list = use_record_list(&props.api_client, Some(RangeKeys::BILL_LIST), |client, range| async move {
        client.get_bills(range).await
    });
    let query = use_state(String::new);
    let status = use_state(StatusFilter::default);
    let deleting = use_state(|| Option::<BillRecord>::None);
    let action_error = use_state(|| Option::<String>::None);

    let visible = list.records.list.visible();
    let statuses = distinct_statuses(&visible);
    let filtered = filter_bills(&visible, &query, &status);
    let summary = BillListSummary::compute(&filtered);

    let on_query_change = {
        let query = query.clone();
        Callback::from(move |value: String| query.set(value))
    };

    let on_status_change = {
        let status = status.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            status.set(StatusFilter::from_selection(&select.value()));
        })
    };

    let on_confirm_delete = {
        let api_client = props.api_client.clone();
        let records = list.records.clone();
        let deleting = deleting.clone();
        let action_error = action_error.clone();
        Callback::from(move |reason: String| {
            let Some(record) = (*deleting).clone() else {
                return;
            };
            deleting.set(None);
            let key = record.quotation_id.clone();
            if records.list.state_of(&key) != Some(RecordState::Committed) {
                return;
            }
            records.dispatch(ListAction::BeginDelete(key.clone()));
            action_error.set(None);

            let api_client = api_client.clone();
            let records = records.clone();
            let action_error = action_error.clone();
            spawn_local(async move {
                match api_client.delete_bill(&key, &reason).await {
                    Ok(()) => {
                        log::info!(target: "bill-list", "Deleted bill {}", key);
                        records.dispatch(ListAction::Commit(key));
                    }
                    Err(e) => {
                        log::warn!(target: "bill-list", "Delete of {} failed, restoring: {}", key, e);
                        records.dispatch(ListAction::RollbackDelete(key));
                        action_error.set(Some(format!("Could not delete {}: {}", record.quotation_no, e)));
                    }
                }
            });
        })
    };

    let on_close_modal = {
        let deleting = deleting.clone();
        Callback::from(move |_| deleting.set(None))
    };

    let on_refresh = {
        let refresh = list.refresh.clone();
        Callback::from(move |_: MouseEvent| refresh.emit(()))
    };

    html! {
        <section class="list-section bills-section">
            <div class="list-toolbar">
                <h2>{"Bills"}</h2>
                <DateRangePicker state={list.range.state.clone()} actions={list.range.actions.clone()} />
                <SearchBar value={(*query).clone()} on_change={on_query_change} placeholder="Search party, number, company..." />
                <select onchange={on_status_change}>
                    <option value="all" selected={*status == StatusFilter::All}>{"All statuses"}</option>
                    {for statuses.iter().map(|s| html! {
                        <option value={s.clone()} selected={status.selection().eq_ignore_ascii_case(s)}>{s}</option>
                    })}
                </select>
                <button class="btn btn-secondary" onclick={on_refresh} disabled={list.loading}>{"Refresh"}</button>
            </div>

            {if let Some(error) = list.error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}
            {if let Some(error) = action_error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <SummaryStrip summary={summary} />

            {if list.loading {
                html! { <div class="loading">{"Loading bills..."}</div> }
            } else if filtered.is_empty() {
                html! { <div class="empty">{"No bills in this range"}</div> }
            } else {
                html! {
                    <div class="table-container">
                        <table class="records-table">
                            <thead>
                                <tr>
                                    <th>{"No."}</th>
                                    <th>{"Date"}</th>
                                    <th>{"Party"}</th>
                                    <th>{"Function"}</th>
                                    <th>{"Status"}</th>
                                    <th>{"Company"}</th>
                                    <th>{"Amount"}</th>
                                    <th>{"Received"}</th>
                                    <th>{"Balance"}</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                {for filtered.iter().map(|bill| {
                                    let on_preview = {
                                        let on_preview = props.on_preview.clone();
                                        let bill = bill.clone();
                                        Callback::from(move |_: MouseEvent| on_preview.emit(bill.clone()))
                                    };
                                    let on_receipt = {
                                        let on_receipt = props.on_receipt.clone();
                                        let bill = bill.clone();
                                        Callback::from(move |_: MouseEvent| on_receipt.emit(bill.clone()))
                                    };
                                    let on_delete = {
                                        let deleting = deleting.clone();
                                        let bill = bill.clone();
                                        Callback::from(move |_: MouseEvent| deleting.set(Some(bill.clone())))
                                    };
                                    let balance = bill.balance();
                                    html! {
                                        <tr key={bill.quotation_id.clone()}>
                                            <td>{&bill.quotation_no}</td>
                                            <td>{&bill.quotation_date}</td>
                                            <td>{&bill.party_name}</td>
                                            <td>{&bill.function_name}</td>
                                            <td><span class="status-pill">{bill.status.to_uppercase()}</span></td>
                                            <td>{&bill.billing_company}</td>
                                            <td class="amount">{format_inr(bill.bill_amount)}</td>
                                            <td class="amount">{format_inr(bill.received_amount)}</td>
                                            <td class={classes!("amount", (balance > 0.0).then_some("due"))}>{format_inr(balance)}</td>
                                            <td class="row-actions">
                                                <button class="btn btn-small" onclick={on_preview}>{"Print"}</button>
                                                <button class="btn btn-small" onclick={on_receipt}>{"Receipt"}</button>
                                                <button class="btn btn-small btn-danger" onclick={on_delete}>{"Delete"}</button>
                                            </td>
                                        </tr>
                                    }
                                })}
                            </tbody>
                        </table>
                    </div>
                }
            }}

            <DeleteReasonModal
                subject={(*deleting).as_ref().map(|b| format!("bill {} ({})", b.quotation_no, b.party_name))}
                on_confirm={on_confirm_delete}
                on_close={on_close_modal}
            />
        </section>
    }
}
