//! Durable preferences: the signed-in session and the last date range used
//! on each list screen.
//!
//! Everything goes through [`AppContext`], which names each value instead of
//! letting callers read raw keys. Values are overwritten, never merged, and
//! never expire.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::datetime::{format_iso_date, parse_iso_date};
use crate::listing::DateRange;

pub const KEY_USER: &str = "user";
pub const KEY_USER_ID: &str = "user_id";
pub const KEY_LOGIN_ID: &str = "login_id";
pub const KEY_HOTEL_ID: &str = "hotel_id";
pub const KEY_HOTEL_NAME: &str = "hotel_name";
pub const KEY_USER_NAME: &str = "user_name";
pub const KEY_USER_ROLE: &str = "user_role";

const SESSION_KEYS: [&str; 7] = [
    KEY_USER,
    KEY_USER_ID,
    KEY_LOGIN_ID,
    KEY_HOTEL_ID,
    KEY_HOTEL_NAME,
    KEY_USER_NAME,
    KEY_USER_ROLE,
];

/// Key-value storage that outlives a page load.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store for tests and for browsers without local storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

/// Storage keys for one screen's remembered date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeKeys {
    pub from: &'static str,
    pub to: &'static str,
}

impl RangeKeys {
    pub const BILL_LIST: RangeKeys = RangeKeys {
        from: "billList_fromDate",
        to: "billList_toDate",
    };
    pub const DELETED_BILLS: RangeKeys = RangeKeys {
        from: "deletedBillList_fromDate",
        to: "deletedBillList_toDate",
    };
    pub const DELETED_QUOTATIONS: RangeKeys = RangeKeys {
        from: "deletedQuot_fromDate",
        to: "deletedQuot_toDate",
    };
    pub const UNSETTLED_BILLS: RangeKeys = RangeKeys {
        from: "unsettledBills_fromDate",
        to: "unsettledBills_toDate",
    };
}

/// A verified login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: String,
    pub user_id: String,
    pub login_id: String,
    pub hotel_id: String,
    pub hotel_name: String,
    pub user_name: String,
    pub user_role: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppContext<S> {
    store: S,
}

impl<S: PreferenceStore> AppContext<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        self.store
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn hotel_id(&self) -> Option<String> {
        self.non_empty(KEY_HOTEL_ID)
    }

    pub fn hotel_name(&self) -> Option<String> {
        self.non_empty(KEY_HOTEL_NAME)
    }

    pub fn user_name(&self) -> Option<String> {
        self.non_empty(KEY_USER_NAME)
    }

    pub fn user_role(&self) -> Option<String> {
        self.non_empty(KEY_USER_ROLE)
    }

    pub fn login_id(&self) -> Option<String> {
        self.non_empty(KEY_LOGIN_ID)
    }

    /// The stored session, if someone is signed in to a hotel.
    pub fn session(&self) -> Option<Session> {
        let hotel_id = self.hotel_id()?;
        let get = |key: &str| self.store.get(key).unwrap_or_default();
        Some(Session {
            user: get(KEY_USER),
            user_id: get(KEY_USER_ID),
            login_id: get(KEY_LOGIN_ID),
            hotel_id,
            hotel_name: get(KEY_HOTEL_NAME),
            user_name: get(KEY_USER_NAME),
            user_role: get(KEY_USER_ROLE),
        })
    }

    pub fn save_session(&self, session: &Session) {
        let values = [
            session.user.as_str(),
            session.user_id.as_str(),
            session.login_id.as_str(),
            session.hotel_id.as_str(),
            session.hotel_name.as_str(),
            session.user_name.as_str(),
            session.user_role.as_str(),
        ];
        for (key, value) in SESSION_KEYS.iter().zip(values) {
            self.store.set(key, value);
        }
        log::info!("Saved session for hotel {}", session.hotel_id);
    }

    /// Signs out. Remembered date ranges are kept.
    pub fn clear_session(&self) {
        for key in SESSION_KEYS {
            self.store.remove(key);
        }
    }

    /// The remembered range for a screen, falling back to `today..today`
    /// when nothing usable is stored.
    pub fn date_range(&self, keys: RangeKeys, today: NaiveDate) -> DateRange {
        let read = |key: &str| self.store.get(key).as_deref().and_then(parse_iso_date);
        match (read(keys.from), read(keys.to)) {
            (Some(from), Some(to)) if from <= to => DateRange { from, to },
            _ => DateRange::single_day(today),
        }
    }

    pub fn save_date_range(&self, keys: RangeKeys, range: DateRange) {
        self.store.set(keys.from, &format_iso_date(range.from));
        self.store.set(keys.to, &format_iso_date(range.to));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    fn session() -> Session {
        Session {
            user: "asha".into(),
            user_id: "7".into(),
            login_id: "7".into(),
            hotel_id: "12".into(),
            hotel_name: "Palm Court".into(),
            user_name: "Asha".into(),
            user_role: "admin".into(),
        }
    }

    #[test]
    fn test_session_round_trip_and_clear() {
        let ctx = AppContext::new(MemoryStore::new());
        assert_eq!(ctx.session(), None);
        ctx.save_session(&session());
        assert_eq!(ctx.session(), Some(session()));
        assert_eq!(ctx.hotel_id().as_deref(), Some("12"));
        assert_eq!(ctx.user_role().as_deref(), Some("admin"));

        ctx.save_date_range(RangeKeys::BILL_LIST, DateRange::single_day(day(3)));
        ctx.clear_session();
        assert_eq!(ctx.session(), None);
        assert_eq!(ctx.login_id(), None);
        assert_eq!(ctx.date_range(RangeKeys::BILL_LIST, day(20)), DateRange::single_day(day(3)));
    }

    #[test]
    fn test_blank_hotel_id_is_no_session() {
        let ctx = AppContext::new(MemoryStore::new());
        ctx.store().set(KEY_HOTEL_ID, "  ");
        assert_eq!(ctx.hotel_id(), None);
        assert_eq!(ctx.session(), None);
    }

    #[test]
    fn test_date_range_per_screen() {
        let ctx = AppContext::new(MemoryStore::new());
        let today = day(15);
        assert_eq!(ctx.date_range(RangeKeys::DELETED_BILLS, today), DateRange::single_day(today));

        let range = DateRange { from: day(1), to: day(10) };
        ctx.save_date_range(RangeKeys::DELETED_BILLS, range);
        assert_eq!(ctx.store().get("deletedBillList_fromDate").as_deref(), Some("2025-08-01"));
        assert_eq!(ctx.date_range(RangeKeys::DELETED_BILLS, today), range);
        assert_eq!(
            ctx.date_range(RangeKeys::DELETED_QUOTATIONS, today),
            DateRange::single_day(today)
        );

        // Overwrite, not merge.
        ctx.save_date_range(RangeKeys::DELETED_BILLS, DateRange::single_day(day(2)));
        assert_eq!(ctx.date_range(RangeKeys::DELETED_BILLS, today), DateRange::single_day(day(2)));
    }

    #[test]
    fn test_corrupt_range_falls_back_to_today() {
        let ctx = AppContext::new(MemoryStore::new());
        ctx.store().set(RangeKeys::UNSETTLED_BILLS.from, "2025-08-20");
        ctx.store().set(RangeKeys::UNSETTLED_BILLS.to, "2025-08-01");
        assert_eq!(
            ctx.date_range(RangeKeys::UNSETTLED_BILLS, day(5)),
            DateRange::single_day(day(5))
        );
        ctx.store().set(RangeKeys::UNSETTLED_BILLS.to, "garbage");
        assert_eq!(
            ctx.date_range(RangeKeys::UNSETTLED_BILLS, day(5)),
            DateRange::single_day(day(5))
        );
    }
}
