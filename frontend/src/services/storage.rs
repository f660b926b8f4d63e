use std::ops::Deref;
use std::rc::Rc;

use gloo::storage::{LocalStorage, Storage};
use shared::{AppContext, MemoryStore, PreferenceStore};

/// Browser local storage, or memory when the browser refuses it
/// (private windows, disabled storage).
#[derive(Debug)]
pub enum BrowserStore {
    Local,
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn detect() -> Self {
        let available = web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .is_some();
        if available {
            BrowserStore::Local
        } else {
            log::warn!(target: "storage", "Local storage unavailable, preferences will not persist");
            BrowserStore::Memory(MemoryStore::new())
        }
    }
}

// Values are stored as plain strings, not JSON, so the raw handle is used.
impl PreferenceStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            BrowserStore::Local => LocalStorage::raw().get_item(key).ok().flatten(),
            BrowserStore::Memory(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) {
        match self {
            BrowserStore::Local => {
                if LocalStorage::raw().set_item(key, value).is_err() {
                    log::warn!(target: "storage", "Failed to store {}", key);
                }
            }
            BrowserStore::Memory(store) => store.set(key, value),
        }
    }

    fn remove(&self, key: &str) {
        match self {
            BrowserStore::Local => {
                let _ = LocalStorage::raw().remove_item(key);
            }
            BrowserStore::Memory(store) => store.remove(key),
        }
    }
}

/// Shared handle to the application context.
#[derive(Clone)]
pub struct Preferences(Rc<AppContext<BrowserStore>>);

impl Preferences {
    pub fn new() -> Self {
        Self(Rc::new(AppContext::new(BrowserStore::detect())))
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Preferences {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Preferences {
    type Target = AppContext<BrowserStore>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{DateRange, RangeKeys};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_local_store_round_trip() {
        let store = BrowserStore::detect();
        store.set("banquet_test_key", "42");
        assert_eq!(store.get("banquet_test_key").as_deref(), Some("42"));
        store.remove("banquet_test_key");
        assert_eq!(store.get("banquet_test_key"), None);
    }

    #[wasm_bindgen_test]
    fn test_date_range_survives_new_handle() {
        let day = chrono::NaiveDate::from_ymd_opt(2025, 4, 9).unwrap();
        let range = DateRange::single_day(day);
        Preferences::new().save_date_range(RangeKeys::BILL_LIST, range);
        let today = chrono::NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        assert_eq!(Preferences::new().date_range(RangeKeys::BILL_LIST, today), range);
        let raw = LocalStorage::raw().get_item("billList_fromDate").ok().flatten();
        assert_eq!(raw.as_deref(), Some("2025-04-09"));
    }
}
