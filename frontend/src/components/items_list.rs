use yew::prelude::*;
use shared::listing::filter_by_query;
use shared::money::format_inr;
use super::search_bar::SearchBar;
use crate::hooks::use_record_list::use_record_list;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct ItemsListProps {
    pub api_client: ApiClient,
}

#[function_component(ItemsList)]
pub fn items_list(props: &ItemsListProps) -> Html {
    let list = use_record_list(&props.api_client, None, |client, _| async move {
        client.get_items().await
    });
    let query = use_state(String::new);

    let visible = list.records.list.visible();
    let filtered = filter_by_query(&visible, &query);

    let on_query_change = {
        let query = query.clone();
        Callback::from(move |value: String| query.set(value))
    };

    let on_refresh = {
        let refresh = list.refresh.clone();
        Callback::from(move |_: MouseEvent| refresh.emit(()))
    };

    html! {
        <section class="list-section items-section">
            <div class="list-toolbar">
                <h2>{"Items"}</h2>
                <SearchBar value={(*query).clone()} on_change={on_query_change} placeholder="Search item or category..." />
                <button class="btn btn-secondary" onclick={on_refresh} disabled={list.loading}>{"Refresh"}</button>
            </div>

            {if let Some(error) = list.error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            {if list.loading {
                html! { <div class="loading">{"Loading items..."}</div> }
            } else if filtered.is_empty() {
                html! { <div class="empty">{"No items found"}</div> }
            } else {
                html! {
                    <div class="table-container">
                        <table class="records-table">
                            <thead>
                                <tr>
                                    <th>{"Item"}</th>
                                    <th>{"Category"}</th>
                                    <th>{"Sub-category"}</th>
                                    <th>{"Unit"}</th>
                                    <th>{"Rate"}</th>
                                </tr>
                            </thead>
                            <tbody>
                                {for filtered.iter().map(|item| html! {
                                    <tr key={item.item_id.clone()}>
                                        <td>{&item.item_name}</td>
                                        <td>{&item.category}</td>
                                        <td>{&item.sub_category}</td>
                                        <td>{&item.unit}</td>
                                        <td class="amount">{format_inr(item.rate)}</td>
                                    </tr>
                                })}
                            </tbody>
                        </table>
                    </div>
                }
            }}
        </section>
    }
}
