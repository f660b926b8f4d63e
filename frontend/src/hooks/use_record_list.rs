//! The fetch/filter/act cycle every list screen shares.
//!
//! A list is fetched whenever its date range becomes valid or changes, and on
//! manual refresh. Responses for a range the screen has since moved away from
//! are dropped. Optimistic deletes and restores go through [`ListAction`] so
//! that async completions always act on the latest list.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use shared::listing::Keyed;
use shared::{ApiError, DateRange, RangeKeys, TrackedList};
use crate::hooks::use_date_range::{use_date_range, UseDateRangeResult};
use crate::services::api::ApiClient;

pub enum ListAction<T> {
    Replace(Vec<T>),
    BeginDelete(String),
    BeginRestore(String),
    Commit(String),
    RollbackDelete(String),
    RollbackRestore(String),
}

#[derive(Debug, PartialEq)]
pub struct ListStore<T> {
    pub list: TrackedList<T>,
}

impl<T> Default for ListStore<T> {
    fn default() -> Self {
        Self {
            list: TrackedList::default(),
        }
    }
}

impl<T: Keyed + Clone + 'static> Reducible for ListStore<T> {
    type Action = ListAction<T>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let list = match action {
            ListAction::Replace(records) => self.list.replace_all(records),
            ListAction::BeginDelete(key) => match self.list.begin_delete(&key) {
                Some(list) => list,
                None => return self,
            },
            ListAction::BeginRestore(key) => match self.list.begin_restore(&key) {
                Some(list) => list,
                None => return self,
            },
            ListAction::Commit(key) => self.list.commit(&key),
            ListAction::RollbackDelete(key) => self.list.rollback_delete(&key),
            ListAction::RollbackRestore(key) => self.list.rollback_restore(&key),
        };
        Rc::new(Self { list })
    }
}

pub struct UseRecordListResult<T: Keyed + Clone + 'static> {
    pub range: UseDateRangeResult,
    pub records: UseReducerHandle<ListStore<T>>,
    pub loading: bool,
    pub error: Option<String>,
    pub refresh: Callback<()>,
}

#[hook]
pub fn use_record_list<T, F, Fut>(
    api_client: &ApiClient,
    keys: Option<RangeKeys>,
    fetch: F,
) -> UseRecordListResult<T>
where
    T: Keyed + Clone + 'static,
    F: FnOnce(ApiClient, DateRange) -> Fut + 'static,
    Fut: Future<Output = Result<Vec<T>, ApiError>> + 'static,
{
    let range = use_date_range(api_client.preferences(), keys);
    let records = use_reducer(ListStore::<T>::default);
    let loading = use_state(|| false);
    let error = use_state(|| Option::<String>::None);
    let refresh_count = use_state(|| 0u32);
    let requested: Rc<RefCell<Option<DateRange>>> = use_mut_ref(|| None);

    let refresh = {
        let refresh_count = refresh_count.clone();
        Callback::from(move |_| refresh_count.set(*refresh_count + 1))
    };

    use_effect_with((range.state.fetch_range(), *refresh_count), {
        let api_client = api_client.clone();
        let records = records.clone();
        let loading = loading.clone();
        let error = error.clone();
        move |(fetch_range, _)| {
            if let Some(fetch_range) = *fetch_range {
                *requested.borrow_mut() = Some(fetch_range);
                loading.set(true);
                spawn_local(async move {
                    let result = fetch(api_client, fetch_range).await;
                    if *requested.borrow() != Some(fetch_range) {
                        log::debug!(target: "record-list", "Dropping response for superseded range {:?}", fetch_range);
                        return;
                    }
                    match result {
                        Ok(rows) => {
                            log::debug!(target: "record-list", "Loaded {} rows", rows.len());
                            records.dispatch(ListAction::Replace(rows));
                            error.set(None);
                        }
                        Err(e) => {
                            log::error!(target: "record-list", "Failed to load list: {}", e);
                            records.dispatch(ListAction::Replace(Vec::new()));
                            error.set(Some(e.to_string()));
                        }
                    }
                    loading.set(false);
                });
            }
            || ()
        }
    });

    UseRecordListResult {
        range,
        records,
        loading: *loading,
        error: (*error).clone(),
        refresh,
    }
}
