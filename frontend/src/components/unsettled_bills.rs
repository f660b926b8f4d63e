use yew::prelude::*;
use shared::listing::filter_by_query;
use shared::money::{format_inr, round2};
use shared::RangeKeys;
use super::date_range_picker::DateRangePicker;
use super::search_bar::SearchBar;
use crate::hooks::use_record_list::use_record_list;
use crate::services::api::ApiClient;
use crate::services::date_utils::today;

#[derive(Properties, PartialEq)]
pub struct UnsettledBillsProps {
    pub api_client: ApiClient,
}

#[function_component(UnsettledBills)]
pub fn unsettled_bills(props: &UnsettledBillsProps) -> Html {
    let list = use_record_list(&props.api_client, Some(RangeKeys::UNSETTLED_BILLS), |client, range| async move {
        client.get_unsettled_bills(range).await
    });
    let query = use_state(String::new);

    let today = today();
    let visible = list.records.list.visible();
    let filtered = filter_by_query(&visible, &query);
    let outstanding = round2(filtered.iter().map(|b| b.balance()).sum());
    let overdue_count = filtered.iter().filter(|b| b.is_overdue(today)).count();

    let on_query_change = {
        let query = query.clone();
        Callback::from(move |value: String| query.set(value))
    };

    let on_refresh = {
        let refresh = list.refresh.clone();
        Callback::from(move |_: MouseEvent| refresh.emit(()))
    };

    html! {
        <section class="list-section unsettled-section">
            <div class="list-toolbar">
                <h2>{"Unsettled Bills"}</h2>
                <DateRangePicker state={list.range.state.clone()} actions={list.range.actions.clone()} />
                <SearchBar value={(*query).clone()} on_change={on_query_change} />
                <button class="btn btn-secondary" onclick={on_refresh} disabled={list.loading}>{"Refresh"}</button>
            </div>

            {if let Some(error) = list.error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <div class="summary-strip">
                <div class="summary-item"><span>{"Bills"}</span><strong>{filtered.len()}</strong></div>
                <div class="summary-item"><span>{"Outstanding"}</span><strong>{format_inr(outstanding)}</strong></div>
                <div class="summary-item"><span>{"Overdue"}</span><strong>{overdue_count}</strong></div>
            </div>

            {if list.loading {
                html! { <div class="loading">{"Loading unsettled bills..."}</div> }
            } else if filtered.is_empty() {
                html! { <div class="empty">{"Everything is settled"}</div> }
            } else {
                html! {
                    <div class="table-container">
                        <table class="records-table">
                            <thead>
                                <tr>
                                    <th>{"No."}</th>
                                    <th>{"Invoice"}</th>
                                    <th>{"Party"}</th>
                                    <th>{"Function"}</th>
                                    <th>{"Function date"}</th>
                                    <th>{"Company"}</th>
                                    <th>{"Amount"}</th>
                                    <th>{"Received"}</th>
                                    <th>{"Balance"}</th>
                                </tr>
                            </thead>
                            <tbody>
                                {for filtered.iter().map(|bill| {
                                    let overdue = bill.is_overdue(today);
                                    html! {
                                        <tr key={bill.quotation_id.clone()} class={classes!(overdue.then_some("overdue"))}>
                                            <td>{&bill.quotation_no}</td>
                                            <td>{&bill.invoice_id}</td>
                                            <td>{&bill.party_name}</td>
                                            <td>{&bill.function_name}</td>
                                            <td>
                                                {&bill.function_date}
                                                {if overdue {
                                                    html! { <span class="badge overdue">{"Overdue"}</span> }
                                                } else { html! {} }}
                                            </td>
                                            <td>{&bill.billing_company}</td>
                                            <td class="amount">{format_inr(bill.bill_amount)}</td>
                                            <td class="amount">{format_inr(bill.received_amount)}</td>
                                            <td class="amount due">{format_inr(bill.balance())}</td>
                                        </tr>
                                    }
                                })}
                            </tbody>
                        </table>
                    </div>
                }
            }}
        </section>
    }
}
