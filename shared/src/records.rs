//! Row types for the list screens, normalized from the API's wire shapes.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use crate::datetime::parse_combined_datetime;
use crate::listing::{Keyed, Searchable};
use crate::money::round2;
use crate::wire::{first_number, first_text, lenient_f64, lenient_opt_f64, lenient_string};

/// Days after the function date before an unpaid balance counts as overdue.
pub const OVERDUE_AFTER_DAYS: i64 = 30;

/// One row of the bill list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BillRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub quotation_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub quotation_no: String,
    #[serde(deserialize_with = "lenient_string")]
    pub quotation_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub party_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub function_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(deserialize_with = "lenient_string")]
    pub invoice_id: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub bill_amount: f64,
    #[serde(deserialize_with = "lenient_string")]
    pub billing_company: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub received_amount: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub discount: f64,
    #[serde(rename = "TDS", deserialize_with = "lenient_f64")]
    pub tds: f64,
    #[serde(deserialize_with = "lenient_opt_f64")]
    pub balance: Option<f64>,
}

impl BillRecord {
    /// The supplied balance, or bill amount less received, to the paisa.
    pub fn balance(&self) -> f64 {
        self.balance
            .unwrap_or_else(|| round2(self.bill_amount - self.received_amount))
    }
}

impl Keyed for BillRecord {
    fn key(&self) -> &str {
        &self.quotation_id
    }
}

impl Searchable for BillRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.party_name.as_str(),
            self.quotation_no.as_str(),
            self.function_name.as_str(),
            self.billing_company.as_str(),
            self.invoice_id.as_str(),
        ]
    }
}

/// Which deleted-records screen a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeletedKind {
    Bills,
    Quotations,
    Companies,
}

impl DeletedKind {
    pub fn title(&self) -> &'static str {
        match self {
            DeletedKind::Bills => "Deleted Bills",
            DeletedKind::Quotations => "Deleted Quotations",
            DeletedKind::Companies => "Deleted Companies",
        }
    }

    /// Companies are listed without a date range.
    pub fn uses_date_range(&self) -> bool {
        !matches!(self, DeletedKind::Companies)
    }
}

impl fmt::Display for DeletedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A soft-deleted bill, quotation or company in one shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeletedEntry {
    pub id: String,
    pub number: String,
    pub date: String,
    /// Party name, or company name for companies.
    pub title: String,
    /// Function name, or GST number for companies.
    pub subtitle: String,
    /// Billing company, or address for companies.
    pub company: String,
    pub amount: Option<f64>,
    pub reason: String,
}

impl DeletedEntry {
    pub fn from_wire(kind: DeletedKind, row: &Value) -> Self {
        let reason = first_text(row, &["CancelReason", "DeleteReason", "Reason"]);
        match kind {
            DeletedKind::Bills | DeletedKind::Quotations => Self {
                id: first_text(row, &["QuotationId", "QuotId"]),
                number: first_text(row, &["QuotationNo", "InvoiceNo"]),
                date: first_text(row, &["QuotationDate", "FunctionDate"]),
                title: first_text(row, &["PartyName"]),
                subtitle: first_text(row, &["FunctionName"]),
                company: first_text(row, &["BillingCompany"]),
                amount: first_number(row, &["BillAmount", "TotalAmount"]),
                reason,
            },
            DeletedKind::Companies => Self {
                id: first_text(row, &["CompanyId", "CompId"]),
                number: first_text(row, &["ContactNo", "MobileNo"]),
                date: first_text(row, &["DeletedDate", "CreatedDate"]),
                title: first_text(row, &["CompanyName"]),
                subtitle: first_text(row, &["GSTNo", "GstNo"]),
                company: first_text(row, &["Address"]),
                amount: None,
                reason,
            },
        }
    }

    /// Rows without an id cannot be restored, so they are not listed.
    pub fn from_rows(kind: DeletedKind, rows: &[Value]) -> Vec<Self> {
        rows.iter()
            .map(|row| Self::from_wire(kind, row))
            .filter(|entry| !entry.id.is_empty())
            .collect()
    }
}

impl Keyed for DeletedEntry {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Searchable for DeletedEntry {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.number.as_str(),
            self.subtitle.as_str(),
            self.company.as_str(),
        ]
    }
}

/// A bill with money still owed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UnsettledBill {
    #[serde(deserialize_with = "lenient_string")]
    pub quotation_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub quotation_no: String,
    #[serde(deserialize_with = "lenient_string")]
    pub invoice_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub party_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub function_name: String,
    /// `dd-mm-yyyy[ h:mm am|pm]`
    #[serde(deserialize_with = "lenient_string")]
    pub function_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub billing_company: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub bill_amount: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub received_amount: f64,
    #[serde(deserialize_with = "lenient_opt_f64")]
    pub balance: Option<f64>,
}

impl UnsettledBill {
    pub fn balance(&self) -> f64 {
        self.balance
            .unwrap_or_else(|| round2(self.bill_amount - self.received_amount))
    }

    pub fn function_datetime(&self) -> Option<NaiveDateTime> {
        parse_combined_datetime(&self.function_date)
    }

    /// Balance outstanding and the function was more than 30 days ago.
    ///
    /// Measured from the function date, not an invoice due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        let Some(function_date) = self.function_datetime() else {
            return false;
        };
        self.balance() > 0.0 && function_date.date() + Duration::days(OVERDUE_AFTER_DAYS) < today
    }
}

impl Keyed for UnsettledBill {
    fn key(&self) -> &str {
        &self.quotation_id
    }
}

impl Searchable for UnsettledBill {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.party_name.as_str(),
            self.quotation_no.as_str(),
            self.function_name.as_str(),
            self.billing_company.as_str(),
            self.invoice_id.as_str(),
        ]
    }
}

/// A catalogue item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Item {
    #[serde(deserialize_with = "lenient_string")]
    pub item_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub item_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(deserialize_with = "lenient_string")]
    pub sub_category: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub rate: f64,
    #[serde(deserialize_with = "lenient_string")]
    pub unit: String,
}

impl Keyed for Item {
    fn key(&self) -> &str {
        &self.item_id
    }
}

impl Searchable for Item {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.item_name.as_str(), self.category.as_str(), self.sub_category.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::decode_rows;
    use serde_json::json;

    #[test]
    fn test_bill_record_from_wire() {
        let rows = vec![json!({
            "QuotationId": 17,
            "QuotationNo": "Q-17",
            "PartyName": "Verma",
            "Status": "Confirmed",
            "BillAmount": "25000.50",
            "ReceivedAmount": 10000,
            "TDS": "250",
            "Discount": null
        })];
        let bills: Vec<BillRecord> = decode_rows(rows);
        assert_eq!(bills[0].quotation_id, "17");
        assert_eq!(bills[0].tds, 250.0);
        assert_eq!(bills[0].discount, 0.0);
        assert_eq!(bills[0].balance(), 15000.5);
    }

    #[test]
    fn test_balance_invariant_without_explicit_balance() {
        for (bill, received) in [(100.0, 33.333), (0.1, 0.3), (99999.99, 0.0), (10.0, 25.0)] {
            let record = BillRecord {
                bill_amount: bill,
                received_amount: received,
                ..BillRecord::default()
            };
            assert_eq!(record.balance(), round2(bill - received));
        }
        let explicit = BillRecord {
            bill_amount: 100.0,
            received_amount: 10.0,
            balance: Some(0.0),
            ..BillRecord::default()
        };
        assert_eq!(explicit.balance(), 0.0);
    }

    #[test]
    fn test_deleted_entries_by_kind() {
        let bill = json!({
            "QuotationId": "5",
            "PartyName": "Nair",
            "BillAmount": "900",
            "CancelReason": "duplicate"
        });
        let entry = DeletedEntry::from_wire(DeletedKind::Bills, &bill);
        assert_eq!(entry.title, "Nair");
        assert_eq!(entry.amount, Some(900.0));
        assert_eq!(entry.reason, "duplicate");

        let company = json!({
            "CompanyId": 3,
            "CompanyName": "Acme Events",
            "GSTNo": "27ABCDE1234F1Z5"
        });
        let entry = DeletedEntry::from_wire(DeletedKind::Companies, &company);
        assert_eq!(entry.id, "3");
        assert_eq!(entry.subtitle, "27ABCDE1234F1Z5");
        assert_eq!(entry.amount, None);

        let rows = vec![company, json!({ "CompanyName": "No id" })];
        assert_eq!(DeletedEntry::from_rows(DeletedKind::Companies, &rows).len(), 1);
        assert!(!DeletedKind::Companies.uses_date_range());
    }

    #[test]
    fn test_overdue_uses_function_date_plus_thirty_days() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let bill = |date: &str, balance: f64| UnsettledBill {
            function_date: date.to_string(),
            balance: Some(balance),
            ..UnsettledBill::default()
        };
        assert!(bill("28-02-2025 7:00 pm", 500.0).is_overdue(today));
        // Exactly thirty days is not yet overdue.
        assert!(!bill("01-03-2025", 500.0).is_overdue(today));
        assert!(!bill("01-01-2025", 0.0).is_overdue(today));
        assert!(!bill("someday", 500.0).is_overdue(today));
    }
}
