use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use shared::listing::filter_by_query;
use shared::money::format_inr;
use shared::{DeletedEntry, DeletedKind, RangeKeys, RecordState};
use super::date_range_picker::DateRangePicker;
use super::search_bar::SearchBar;
use crate::hooks::use_record_list::{use_record_list, ListAction};
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct DeletedListProps {
    pub api_client: ApiClient,
    pub kind: DeletedKind,
}

fn range_keys(kind: DeletedKind) -> Option<RangeKeys> {
    match kind {
        DeletedKind::Bills => Some(RangeKeys::DELETED_BILLS),
        DeletedKind::Quotations => Some(RangeKeys::DELETED_QUOTATIONS),
        DeletedKind::Companies => None,
    }
}

/// Soft-deleted records of one kind, each with a Restore action.
///
/// Mount with a `key` per kind so switching kinds starts a fresh list.
#[function_component(DeletedList)]
pub fn deleted_list(props: &DeletedListProps) -> Html {
    let kind = props.kind;
    let list = use_record_list(&props.api_client, range_keys(kind), move |client, range| async move {
        client.get_deleted(kind, range).await
    });
    let query = use_state(String::new);
    let action_error = use_state(|| Option::<String>::None);
    let notice = use_state(|| Option::<String>::None);

    let visible = list.records.list.visible();
    let filtered = filter_by_query(&visible, &query);

    let on_query_change = {
        let query = query.clone();
        Callback::from(move |value: String| query.set(value))
    };

    let on_restore = {
        let api_client = props.api_client.clone();
        let records = list.records.clone();
        let action_error = action_error.clone();
        let notice = notice.clone();
        Callback::from(move |entry: DeletedEntry| {
            let key = entry.id.clone();
            if records.list.state_of(&key) != Some(RecordState::Committed) {
                return;
            }
            records.dispatch(ListAction::BeginRestore(key.clone()));
            action_error.set(None);
            notice.set(None);

            let api_client = api_client.clone();
            let records = records.clone();
            let action_error = action_error.clone();
            let notice = notice.clone();
            spawn_local(async move {
                match api_client.restore(kind, &key).await {
                    Ok(()) => {
                        log::info!(target: "deleted-list", "Restored {} {}", kind, key);
                        records.dispatch(ListAction::Commit(key));
                        notice.set(Some(format!("{} restored", entry.title)));
                    }
                    Err(e) => {
                        log::warn!(target: "deleted-list", "Restore of {} failed: {}", key, e);
                        records.dispatch(ListAction::RollbackRestore(key));
                        action_error.set(Some(format!("Could not restore {}: {}", entry.title, e)));
                    }
                }
            });
        })
    };

    let on_refresh = {
        let refresh = list.refresh.clone();
        Callback::from(move |_: MouseEvent| refresh.emit(()))
    };

    let is_company = kind == DeletedKind::Companies;

    html! {
        <section class="list-section deleted-section">
            <div class="list-toolbar">
                <h2>{kind.title()}</h2>
                {if kind.uses_date_range() {
                    html! { <DateRangePicker state={list.range.state.clone()} actions={list.range.actions.clone()} /> }
                } else { html! {} }}
                <SearchBar value={(*query).clone()} on_change={on_query_change} />
                <button class="btn btn-secondary" onclick={on_refresh} disabled={list.loading}>{"Refresh"}</button>
            </div>

            {if let Some(error) = list.error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}
            {if let Some(error) = action_error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}
            {if let Some(message) = notice.as_ref() {
                html! { <div class="form-message success">{message}</div> }
            } else { html! {} }}

            {if list.loading {
                html! { <div class="loading">{"Loading..."}</div> }
            } else if filtered.is_empty() {
                html! { <div class="empty">{"Nothing deleted here"}</div> }
            } else {
                html! {
                    <div class="table-container">
                        <table class="records-table">
                            <thead>
                                <tr>
                                    <th>{if is_company { "Contact" } else { "No." }}</th>
                                    <th>{"Date"}</th>
                                    <th>{if is_company { "Company" } else { "Party" }}</th>
                                    <th>{if is_company { "GST No." } else { "Function" }}</th>
                                    <th>{if is_company { "Address" } else { "Company" }}</th>
                                    {if is_company { html! {} } else { html! { <th>{"Amount"}</th> } }}
                                    <th>{"Reason"}</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                {for filtered.iter().map(|entry| {
                                    let restoring = list.records.list.state_of(&entry.id) == Some(RecordState::PendingRestore);
                                    let onclick = {
                                        let on_restore = on_restore.clone();
                                        let entry = entry.clone();
                                        Callback::from(move |_: MouseEvent| on_restore.emit(entry.clone()))
                                    };
                                    html! {
                                        <tr key={entry.id.clone()}>
                                            <td>{&entry.number}</td>
                                            <td>{&entry.date}</td>
                                            <td>{&entry.title}</td>
                                            <td>{&entry.subtitle}</td>
                                            <td>{&entry.company}</td>
                                            {if is_company { html! {} } else {
                                                html! { <td class="amount">{entry.amount.map(format_inr).unwrap_or_default()}</td> }
                                            }}
                                            <td class="muted">{&entry.reason}</td>
                                            <td class="row-actions">
                                                <button class="btn btn-small" {onclick} disabled={restoring}>
                                                    {if restoring { "Restoring..." } else { "Restore" }}
                                                </button>
                                            </td>
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
