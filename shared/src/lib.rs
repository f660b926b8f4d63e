//! Domain types and logic for the banquet desk, independent of the browser.

pub mod api;
pub mod billing;
pub mod calendar;
pub mod context;
pub mod datetime;
pub mod error;
pub mod export;
pub mod listing;
pub mod money;
pub mod receipt;
pub mod records;
pub mod session;
pub mod wire;
pub mod words;

pub use api::{ApiConfig, ApiRequest, Endpoint, Method};
pub use billing::{BillDetail, BillSummary, SummaryFallbacks};
pub use calendar::{CalendarEvent, EventFilter, Priority, StatusBucket};
pub use context::{AppContext, MemoryStore, PreferenceStore, RangeKeys, Session};
pub use error::{ApiError, ValidationError};
pub use listing::{DateRange, DateRangeState, RecordState, TrackedList};
pub use records::{BillRecord, DeletedEntry, DeletedKind, Item, UnsettledBill};
