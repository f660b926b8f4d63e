//! Shared behaviour of the list screens: date-range guarding, client-side
//! search and status filters, the optimistic delete/restore bookkeeping, and
//! the bill summary strip.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::records::BillRecord;

/// Shortest accepted delete reason, counted in characters after trimming.
pub const MIN_DELETE_REASON_LEN: usize = 3;

/// Records that can be addressed by id.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Records the search box can match against.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

/// Case-insensitive substring match against any search field.
/// An empty query matches everything.
pub fn matches_query<T: Searchable>(record: &T, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
        || record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
}

pub fn filter_by_query<T: Searchable + Clone>(records: &[T], query: &str) -> Vec<T> {
    records
        .iter()
        .filter(|record| matches_query(*record, query))
        .cloned()
        .collect()
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn single_day(day: NaiveDate) -> Self {
        Self { from: day, to: day }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// The from/to pickers of a list screen.
///
/// Picking a bound that crosses the other snaps the picked bound back onto
/// the other one and records an error. While the error stands there is no
/// range to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRangeState {
    from: NaiveDate,
    to: NaiveDate,
    error: Option<ValidationError>,
}

impl DateRangeState {
    pub fn new(range: DateRange) -> Self {
        let to = if range.to < range.from { range.from } else { range.to };
        Self {
            from: range.from,
            to,
            error: None,
        }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            from: self.from,
            to: self.to,
        }
    }

    pub fn pick_from(&self, date: NaiveDate) -> Self {
        if date > self.to {
            Self {
                from: self.to,
                to: self.to,
                error: Some(ValidationError::InvalidDateRange),
            }
        } else {
            Self {
                from: date,
                to: self.to,
                error: None,
            }
        }
    }

    pub fn pick_to(&self, date: NaiveDate) -> Self {
        if date < self.from {
            Self {
                from: self.from,
                to: self.from,
                error: Some(ValidationError::InvalidDateRange),
            }
        } else {
            Self {
                from: self.from,
                to: date,
                error: None,
            }
        }
    }

    /// The range to request, or `None` while the pickers are in error.
    pub fn fetch_range(&self) -> Option<DateRange> {
        match self.error {
            Some(_) => None,
            None => Some(self.range()),
        }
    }
}

/// Bill status dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

impl StatusFilter {
    /// `"all"` or blank selects everything.
    pub fn from_selection(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            StatusFilter::All
        } else {
            StatusFilter::Only(value.to_string())
        }
    }

    pub fn matches(&self, status: &str) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted.trim().eq_ignore_ascii_case(status.trim()),
        }
    }

    pub fn selection(&self) -> String {
        match self {
            StatusFilter::All => "all".to_string(),
            StatusFilter::Only(status) => status.clone(),
        }
    }
}

/// Distinct statuses in first-seen order, upper-cased for the dropdown.
pub fn distinct_statuses(records: &[BillRecord]) -> Vec<String> {
    let mut statuses: Vec<String> = Vec::new();
    for record in records {
        let status = record.status.trim().to_uppercase();
        if !status.is_empty() && !statuses.contains(&status) {
            statuses.push(status);
        }
    }
    statuses
}

/// Search, then status.
pub fn filter_bills(records: &[BillRecord], query: &str, status: &StatusFilter) -> Vec<BillRecord> {
    records
        .iter()
        .filter(|record| matches_query(*record, query) && status.matches(&record.status))
        .cloned()
        .collect()
}

pub fn validate_delete_reason(reason: &str) -> Result<String, ValidationError> {
    let trimmed = reason.trim();
    if trimmed.chars().count() < MIN_DELETE_REASON_LEN {
        return Err(ValidationError::DeleteReasonTooShort {
            min: MIN_DELETE_REASON_LEN,
        });
    }
    Ok(trimmed.to_string())
}

/// Where a listed record stands with respect to an in-flight action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Committed,
    /// Hidden while the delete request is in flight.
    PendingDelete,
    /// Still shown, marked busy, while the restore request is in flight.
    PendingRestore,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tracked<T> {
    pub record: T,
    pub state: RecordState,
}

/// Returns a pending record to the committed state.
pub fn rollback<T>(tracked: Tracked<T>) -> Tracked<T> {
    Tracked {
        record: tracked.record,
        state: RecordState::Committed,
    }
}

/// A fetched collection plus the state of each record's pending action.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedList<T> {
    entries: Vec<Tracked<T>>,
}

impl<T> Default for TrackedList<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T: Keyed + Clone> TrackedList<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            entries: records
                .into_iter()
                .map(|record| Tracked {
                    record,
                    state: RecordState::Committed,
                })
                .collect(),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.record.key() == key)
    }

    /// Swaps in a fresh fetch. Records with an action in flight keep their
    /// state, and a pending delete stays hidden even if the server still
    /// lists it.
    pub fn replace_all(&self, records: Vec<T>) -> Self {
        let mut entries: Vec<Tracked<T>> = Vec::with_capacity(records.len());
        for record in records {
            if entries.iter().any(|e| e.record.key() == record.key()) {
                continue;
            }
            let state = self
                .state_of(record.key())
                .unwrap_or(RecordState::Committed);
            entries.push(Tracked { record, state });
        }
        for pending in &self.entries {
            let missing = !entries.iter().any(|e| e.record.key() == pending.record.key());
            if pending.state == RecordState::PendingDelete && missing {
                entries.push(pending.clone());
            }
        }
        Self { entries }
    }

    pub fn state_of(&self, key: &str) -> Option<RecordState> {
        self.position(key).map(|i| self.entries[i].state)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.position(key).map(|i| &self.entries[i].record)
    }

    /// Everything except pending deletes, in list order.
    pub fn visible(&self) -> Vec<T> {
        self.entries
            .iter()
            .filter(|e| e.state != RecordState::PendingDelete)
            .map(|e| e.record.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state != RecordState::PendingDelete)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn transition(&self, key: &str, from: RecordState, to: RecordState) -> Option<Self> {
        let index = self.position(key)?;
        if self.entries[index].state != from {
            return None;
        }
        let mut next = self.clone();
        next.entries[index].state = to;
        Some(next)
    }

    /// Hides the record ahead of the delete request. `None` if it is not
    /// present or already busy.
    pub fn begin_delete(&self, key: &str) -> Option<Self> {
        self.transition(key, RecordState::Committed, RecordState::PendingDelete)
    }

    /// Marks the record busy ahead of the restore request.
    pub fn begin_restore(&self, key: &str) -> Option<Self> {
        self.transition(key, RecordState::Committed, RecordState::PendingRestore)
    }

    /// The server accepted the action: the record leaves this list.
    pub fn commit(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.entries
            .retain(|e| e.record.key() != key || e.state == RecordState::Committed);
        next
    }

    /// The server refused a delete: the record comes back at the end of the
    /// list. Calling it again, or for a record that is not pending, is a no-op.
    pub fn rollback_delete(&self, key: &str) -> Self {
        let mut next = self.clone();
        if let Some(index) = next.position(key) {
            if next.entries[index].state == RecordState::PendingDelete {
                let tracked = next.entries.remove(index);
                next.entries.push(rollback(tracked));
            }
        }
        next
    }

    /// The server refused a restore: the record stays where it is.
    pub fn rollback_restore(&self, key: &str) -> Self {
        let mut next = self.clone();
        if let Some(index) = next.position(key) {
            if next.entries[index].state == RecordState::PendingRestore {
                let tracked = next.entries.remove(index);
                next.entries.insert(index, rollback(tracked));
            }
        }
        next
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusBreakdown {
    pub status: String,
    pub count: usize,
    pub total: f64,
    pub balance: f64,
}

/// Totals strip over the rows currently shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillListSummary {
    pub count: usize,
    pub total: f64,
    pub received: f64,
    pub discount: f64,
    pub tds: f64,
    pub balance: f64,
    pub average: f64,
    pub by_status: Vec<StatusBreakdown>,
}

impl BillListSummary {
    pub fn compute(records: &[BillRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            let balance = record.balance();
            summary.count += 1;
            summary.total += record.bill_amount;
            summary.received += record.received_amount;
            summary.discount += record.discount;
            summary.tds += record.tds;
            summary.balance += balance;

            let status = match record.status.trim() {
                "" => "UNKNOWN".to_string(),
                s => s.to_uppercase(),
            };
            match summary.by_status.iter_mut().find(|b| b.status == status) {
                Some(bucket) => {
                    bucket.count += 1;
                    bucket.total += record.bill_amount;
                    bucket.balance += balance;
                }
                None => summary.by_status.push(StatusBreakdown {
                    status,
                    count: 1,
                    total: record.bill_amount,
                    balance,
                }),
            }
        }
        if summary.count > 0 {
            summary.average = summary.total / summary.count as f64;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn bill(id: &str, party: &str, status: &str, amount: f64, received: f64) -> BillRecord {
        BillRecord {
            quotation_id: id.to_string(),
            quotation_no: format!("Q-{}", id),
            party_name: party.to_string(),
            function_name: "Reception".to_string(),
            status: status.to_string(),
            billing_company: "Sunrise Banquets".to_string(),
            bill_amount: amount,
            received_amount: received,
            ..BillRecord::default()
        }
    }

    fn sample() -> Vec<BillRecord> {
        vec![
            bill("1", "Agarwal", "Confirmed", 1000.0, 400.0),
            bill("2", "Bose", "TENTATIVE", 500.0, 0.0),
            bill("3", "Chopra", "confirmed", 1500.0, 1500.0),
        ]
    }

    #[test]
    fn test_invalid_to_date_blocks_fetch_until_fixed() {
        let mut fetches = Vec::new();
        let mut last_requested = None;
        let mut observe = |state: &DateRangeState| {
            let wanted = state.fetch_range();
            if wanted != last_requested {
                if let Some(range) = wanted {
                    fetches.push(range);
                }
                last_requested = wanted;
            }
        };

        let state = DateRangeState::new(DateRange::single_day(day(10)));
        observe(&state);
        let state = state.pick_to(day(5));
        assert_eq!(state.error(), Some(&ValidationError::InvalidDateRange));
        assert_eq!(state.fetch_range(), None);
        assert_eq!(state.to(), day(10));
        observe(&state);

        let state = state.pick_to(day(12));
        assert_eq!(state.error(), None);
        observe(&state);

        assert_eq!(
            fetches,
            vec![
                DateRange::single_day(day(10)),
                DateRange {
                    from: day(10),
                    to: day(12)
                }
            ]
        );
    }

    #[test]
    fn test_from_date_after_to_date_is_rejected() {
        let state = DateRangeState::new(DateRange { from: day(1), to: day(3) });
        let state = state.pick_from(day(4));
        assert_eq!(state.from(), day(3));
        assert!(state.fetch_range().is_none());
        let state = state.pick_from(day(2));
        assert_eq!(state.fetch_range(), Some(DateRange { from: day(2), to: day(3) }));
    }

    #[test]
    fn test_search_is_a_pure_subset() {
        let records = sample();
        for query in ["", "a", "BOSE", "q-3", "sunrise", "reception", "zzz", "  chopra  "] {
            let filtered = filter_by_query(&records, query);
            assert!(filtered.iter().all(|r| records.contains(r)));
            let needle = query.trim().to_lowercase();
            assert!(filtered.iter().all(|r| r
                .search_fields()
                .iter()
                .any(|f| f.to_lowercase().contains(&needle))));
        }
        assert_eq!(filter_by_query(&records, "bose").len(), 1);
        assert_eq!(filter_by_query(&records, "").len(), 3);
    }

    #[test]
    fn test_status_filter_is_case_insensitive() {
        let records = sample();
        let confirmed = filter_bills(&records, "", &StatusFilter::from_selection("CONFIRMED"));
        assert_eq!(confirmed.len(), 2);
        let all = filter_bills(&records, "", &StatusFilter::from_selection("all"));
        assert_eq!(all.len(), 3);
        let none = filter_bills(&records, "bose", &StatusFilter::Only("confirmed".into()));
        assert!(none.is_empty());
        assert_eq!(distinct_statuses(&records), vec!["CONFIRMED", "TENTATIVE"]);
    }

    #[test]
    fn test_delete_reason_rules() {
        assert!(validate_delete_reason("").is_err());
        assert!(validate_delete_reason("  ab  ").is_err());
        assert_eq!(validate_delete_reason(" dup ").unwrap(), "dup");
    }

    #[test]
    fn test_rejected_delete_restores_the_same_records() {
        let list = TrackedList::new(sample());
        let pending = list.begin_delete("1").unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending.state_of("1"), Some(RecordState::PendingDelete));

        let rolled_back = pending.rollback_delete("1");
        let mut ids: Vec<String> = rolled_back
            .visible()
            .into_iter()
            .map(|r| r.quotation_id)
            .collect();
        // Reinserted at the end.
        assert_eq!(ids, vec!["2", "3", "1"]);
        ids.sort();
        assert_eq!(ids, vec!["1", "2", "3"]);

        // Retrying and failing again never duplicates.
        let again = rolled_back
            .begin_delete("1")
            .unwrap()
            .rollback_delete("1")
            .rollback_delete("1");
        assert_eq!(again.len(), 3);
        assert!(list.begin_delete("missing").is_none());
        assert!(pending.begin_delete("1").is_none());
    }

    #[test]
    fn test_accepted_delete_drops_the_record() {
        let list = TrackedList::new(sample());
        let done = list.begin_delete("2").unwrap().commit("2");
        assert_eq!(done.len(), 2);
        assert!(done.get("2").is_none());
        // Committing a record that is not pending leaves it alone.
        assert_eq!(done.commit("1").len(), 2);
    }

    #[test]
    fn test_stale_fetch_does_not_resurrect_pending_delete() {
        let list = TrackedList::new(sample()).begin_delete("3").unwrap();
        let refreshed = list.replace_all(sample());
        assert_eq!(refreshed.len(), 2);
        assert_eq!(refreshed.state_of("3"), Some(RecordState::PendingDelete));
        // The server dropped it in the meantime: still rollback-able.
        let without = list.replace_all(sample().into_iter().take(2).collect());
        assert_eq!(without.rollback_delete("3").len(), 3);
    }

    #[test]
    fn test_restore_removes_only_after_success() {
        let list = TrackedList::new(sample());
        let restoring = list.begin_restore("2").unwrap();
        assert_eq!(restoring.len(), 3);
        assert_eq!(restoring.state_of("2"), Some(RecordState::PendingRestore));
        let failed = restoring.rollback_restore("2");
        assert_eq!(failed.visible(), list.visible());
        let restored = restoring.commit("2");
        assert_eq!(restored.len(), 2);
    }

    #[test]
    fn test_summary_over_filtered_rows() {
        let records = sample();
        let summary = BillListSummary::compute(&records);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total, 3000.0);
        assert_eq!(summary.received, 1900.0);
        assert_eq!(summary.balance, 1100.0);
        assert_eq!(summary.average, 1000.0);
        assert_eq!(summary.by_status.len(), 2);
        assert_eq!(summary.by_status[0].status, "CONFIRMED");
        assert_eq!(summary.by_status[0].count, 2);

        let filtered = filter_bills(&records, "bose", &StatusFilter::All);
        assert_eq!(BillListSummary::compute(&filtered).total, 500.0);
        assert_eq!(BillListSummary::compute(&[]).average, 0.0);
    }
}
