//! Bill/invoice aggregation for the print preview.
//!
//! The print endpoint returns a header row plus a list of events, each with
//! its own line items and tax lines. `BillDetail::from_wire` normalizes that
//! payload once; `summarize` derives every figure the invoice shows. Server
//! totals are trusted only while they agree with the items they were built
//! from: a disagreement of more than one rupee means the computed value wins.

use serde::Serialize;
use serde_json::Value;

use crate::datetime::display_time;
use crate::money::round2;
use crate::wire::{extract_rows, first_number, first_text};
use crate::words::amount_in_words;

/// Largest server/client disagreement that still keeps the server figure.
pub const RECONCILE_TOLERANCE: f64 = 1.0;

const SUB_TOTAL_KEYS: &[&str] = &["SubtotalAll", "SubTotalAll", "SubTotal"];
const RECEIVED_KEYS: &[&str] = &["ReceivedAmount", "AdvanceAmount"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub name: String,
    /// Sub-category, falling back to category, falling back to "".
    pub group: String,
    pub quantity: f64,
    pub rate: f64,
    pub amount: f64,
}

impl LineItem {
    fn from_wire(row: &Value) -> Self {
        let quantity = first_number(row, &["Quantity", "Qty"]).unwrap_or(0.0);
        let rate = first_number(row, &["Rate"]).unwrap_or(0.0);
        Self {
            name: first_text(row, &["ItemName"]),
            group: first_text(row, &["SubCategory", "Category"]),
            quantity,
            rate,
            amount: quantity * rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxLine {
    pub name: String,
    pub percent: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillEvent {
    pub name: String,
    pub date: String,
    pub venue: String,
    pub min_pax: f64,
    pub time_from: String,
    pub time_to: String,
    pub items: Vec<LineItem>,
    pub taxes: Vec<TaxLine>,
}

impl BillEvent {
    fn from_wire(event: &Value) -> Self {
        let items = extract_rows(event, "items_arr")
            .iter()
            .map(LineItem::from_wire)
            .collect();
        let taxes = extract_rows(event, "tax_arr")
            .iter()
            .map(|row| TaxLine {
                name: first_text(row, &["TaxName"]),
                percent: first_number(row, &["TaxPer", "TaxPercent"]).unwrap_or(0.0),
                amount: first_number(row, &["TaxAmount"]).unwrap_or(0.0),
            })
            .collect();
        Self {
            name: first_text(event, &["EventName", "FunctionName"]),
            date: first_text(event, &["EventDate"]),
            venue: first_text(event, &["VenueName", "VanueName"]),
            min_pax: first_number(event, &["MinPax"]).unwrap_or(0.0),
            time_from: display_time(&first_text(event, &["TimeFrom"])),
            time_to: display_time(&first_text(event, &["TimeTo"])),
            items,
            taxes,
        }
    }
}

/// Header of the print payload, already resolved to one field per fact.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BillHeader {
    pub invoice_no: String,
    pub invoice_date: String,
    pub invoice_time: String,
    pub party_name: String,
    pub billing_company: String,
    pub gst_no: String,
    pub address: String,
    pub venue: String,
    pub function_name: String,
    pub function_date: String,
    pub time_from: String,
    pub time_to: String,
    pub sub_total: Option<f64>,
    pub discount: f64,
    pub tax: f64,
    pub other_charges: f64,
    pub settlement_discount: f64,
    pub round_off: f64,
    pub grand_total: Option<f64>,
    pub received: Option<f64>,
}

impl BillHeader {
    pub fn from_wire(row: &Value) -> Self {
        Self {
            invoice_no: first_text(row, &["InvoiceNo", "BillNo", "QuotationNo"]),
            invoice_date: first_text(row, &["InvoiceDate", "BillDate", "QuotationDate"]),
            invoice_time: display_time(&first_text(row, &["InvoiceTime", "BillTime"])),
            party_name: first_text(row, &["PartyName"]),
            billing_company: first_text(row, &["BillingCompany", "CompanyName"]),
            gst_no: first_text(row, &["GSTNo", "GstNo"]),
            address: first_text(row, &["Address", "PartyAddress"]),
            venue: first_text(row, &["VenueName", "VanueName"]),
            function_name: first_text(row, &["FunctionName", "EventName"]),
            function_date: first_text(row, &["FunctionDate", "EventDate"]),
            time_from: display_time(&first_text(row, &["TimeFrom"])),
            time_to: display_time(&first_text(row, &["TimeTo"])),
            sub_total: first_number(row, SUB_TOTAL_KEYS),
            discount: first_number(row, &["Discount"]).unwrap_or(0.0),
            tax: first_number(row, &["TaxAmount", "Tax", "TotalTax"]).unwrap_or(0.0),
            other_charges: first_number(row, &["OtherCharges", "OtherCharge"]).unwrap_or(0.0),
            settlement_discount: first_number(row, &["SettlementDiscount", "SettDiscount"])
                .unwrap_or(0.0),
            round_off: first_number(row, &["RoundOff", "Roundoff"]).unwrap_or(0.0),
            grand_total: first_number(row, &["BillAmount"]),
            received: first_number(row, RECEIVED_KEYS),
        }
    }
}

/// One print payload, normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BillDetail {
    pub header: BillHeader,
    pub events: Vec<BillEvent>,
}

impl BillDetail {
    /// Normalizes `{result: [header], events: [...]}`. Missing parts read as empty.
    pub fn from_wire(body: &Value) -> Self {
        let header = extract_rows(body, "result")
            .first()
            .map(BillHeader::from_wire)
            .unwrap_or_default();
        let events = extract_rows(body, "events")
            .iter()
            .map(BillEvent::from_wire)
            .collect();
        Self { header, events }
    }
}

/// Values the caller already knows from the list row the preview was opened from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryFallbacks {
    pub grand_total: Option<f64>,
    pub received: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemGroup {
    pub name: String,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillSummary {
    pub groups: Vec<ItemGroup>,
    pub calculated_sub_total: f64,
    pub sub_total: f64,
    pub sub_total_recalculated: bool,
    pub discount: f64,
    pub tax: f64,
    pub other_charges: f64,
    pub settlement_discount: f64,
    pub round_off: f64,
    pub calculated_grand_total: f64,
    pub grand_total: f64,
    pub grand_total_recalculated: bool,
    pub advance_received: f64,
    pub remaining_balance: f64,
    pub amount_in_words: String,
}

/// Picks the figure to show: the reported one, unless it is missing or off by
/// more than [`RECONCILE_TOLERANCE`].
pub fn reconcile(reported: Option<f64>, computed: f64) -> f64 {
    match reported {
        Some(value) if (value - computed).abs() <= RECONCILE_TOLERANCE => value,
        Some(value) => {
            log::debug!(
                "Reported total {} disagrees with computed {}; using computed",
                value,
                computed
            );
            computed
        }
        None => computed,
    }
}

/// Groups items by sub-category in first-seen order.
pub fn group_items<'a>(items: impl IntoIterator<Item = &'a LineItem>) -> Vec<ItemGroup> {
    let mut groups: Vec<ItemGroup> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|g| g.name == item.group) {
            Some(group) => {
                group.subtotal += item.amount;
                group.items.push(item.clone());
            }
            None => groups.push(ItemGroup {
                name: item.group.clone(),
                items: vec![item.clone()],
                subtotal: item.amount,
            }),
        }
    }
    groups
}

/// Derives the full invoice summary. Never fails; missing figures read as 0.
pub fn summarize(detail: &BillDetail, fallbacks: &SummaryFallbacks) -> BillSummary {
    let header = &detail.header;
    let groups = group_items(detail.events.iter().flat_map(|event| event.items.iter()));

    let calculated_sub_total: f64 = groups.iter().map(|g| g.subtotal).sum();
    let sub_total = reconcile(header.sub_total, calculated_sub_total);

    let calculated_grand_total = sub_total - header.discount + header.tax + header.other_charges
        - header.settlement_discount
        + header.round_off;
    let reported_grand_total = header.grand_total.or(fallbacks.grand_total);
    let grand_total = reconcile(reported_grand_total, calculated_grand_total);

    let advance_received = header.received.or(fallbacks.received).unwrap_or(0.0);
    let advance_received = if advance_received.is_finite() { advance_received } else { 0.0 };

    BillSummary {
        groups,
        calculated_sub_total,
        sub_total,
        sub_total_recalculated: sub_total != header.sub_total.unwrap_or(f64::NAN),
        discount: header.discount,
        tax: header.tax,
        other_charges: header.other_charges,
        settlement_discount: header.settlement_discount,
        round_off: header.round_off,
        calculated_grand_total,
        grand_total,
        grand_total_recalculated: grand_total != reported_grand_total.unwrap_or(f64::NAN),
        advance_received,
        remaining_balance: round2(grand_total - advance_received),
        amount_in_words: amount_in_words(grand_total),
    }
}

/// Convenience for raw payloads: normalize, then summarize.
pub fn summarize_wire(body: &Value, fallbacks: &SummaryFallbacks) -> (BillDetail, BillSummary) {
    let detail = BillDetail::from_wire(body);
    let summary = summarize(&detail, fallbacks);
    (detail, summary)
}

/// Sum of an event's tax lines, for the per-event breakdown.
pub fn event_tax_total(event: &BillEvent) -> f64 {
    event.taxes.iter().map(|t| t.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(name: &str, group: &str, quantity: f64, rate: f64) -> LineItem {
        LineItem {
            name: name.to_string(),
            group: group.to_string(),
            quantity,
            rate,
            amount: quantity * rate,
        }
    }

    fn detail_with(items: Vec<LineItem>, header: BillHeader) -> BillDetail {
        BillDetail {
            header,
            events: vec![BillEvent {
                name: "Reception".into(),
                date: "12-12-2024".into(),
                venue: "Grand Hall".into(),
                min_pax: 100.0,
                time_from: "07:00 PM".into(),
                time_to: "11:00 PM".into(),
                items,
                taxes: Vec::new(),
            }],
        }
    }

    #[test]
    fn test_computed_grand_total_beats_divergent_server_total() {
        let header = BillHeader {
            sub_total: Some(1000.0),
            discount: 100.0,
            tax: 180.0,
            grand_total: Some(1075.0),
            ..BillHeader::default()
        };
        let detail = detail_with(vec![item("Veg Plate", "Food", 10.0, 100.0)], header);
        let summary = summarize(&detail, &SummaryFallbacks::default());
        assert_eq!(summary.calculated_grand_total, 1080.0);
        assert_eq!(summary.grand_total, 1080.0);
        assert!(summary.grand_total_recalculated);
    }

    #[test]
    fn test_reported_value_kept_within_tolerance() {
        assert_eq!(reconcile(Some(1079.0), 1080.0), 1079.0);
        assert_eq!(reconcile(Some(1081.0), 1080.0), 1081.0);
        assert_eq!(reconcile(Some(1080.5), 1080.0), 1080.5);
        assert_eq!(reconcile(Some(1078.99), 1080.0), 1080.0);
        assert_eq!(reconcile(None, 1080.0), 1080.0);
    }

    #[test]
    fn test_sub_total_reconciled_against_items() {
        let header = BillHeader {
            sub_total: Some(500.0),
            ..BillHeader::default()
        };
        let detail = detail_with(
            vec![item("Plate", "Food", 10.0, 100.0), item("Decor", "Decoration", 1.0, 250.0)],
            header,
        );
        let summary = summarize(&detail, &SummaryFallbacks::default());
        assert_eq!(summary.calculated_sub_total, 1250.0);
        assert_eq!(summary.sub_total, 1250.0);
        assert!(summary.sub_total_recalculated);
        assert_eq!(summary.grand_total, 1250.0);
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let items = vec![
            item("Paneer", "Starters", 2.0, 50.0),
            item("Cake", "Desserts", 1.0, 500.0),
            item("Tikka", "Starters", 3.0, 60.0),
        ];
        let groups = group_items(items.iter());
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Starters", "Desserts"]);
        assert_eq!(groups[0].subtotal, 280.0);
        assert_eq!(groups[0].items.len(), 2);
    }

    #[test]
    fn test_balance_may_go_negative() {
        let header = BillHeader {
            received: Some(1500.0),
            ..BillHeader::default()
        };
        let detail = detail_with(vec![item("Hall", "", 1.0, 1000.0)], header);
        let summary = summarize(&detail, &SummaryFallbacks::default());
        assert_eq!(summary.remaining_balance, -500.0);
        assert_eq!(summary.amount_in_words, "ONE THOUSAND ONLY");
    }

    #[test]
    fn test_fallbacks_used_when_header_is_silent() {
        let detail = detail_with(vec![item("Hall", "", 1.0, 1000.0)], BillHeader::default());
        let fallbacks = SummaryFallbacks {
            grand_total: Some(1000.5),
            received: Some(400.0),
        };
        let summary = summarize(&detail, &fallbacks);
        assert_eq!(summary.grand_total, 1000.5);
        assert_eq!(summary.advance_received, 400.0);
        assert_eq!(summary.remaining_balance, 600.5);
    }

    #[test]
    fn test_wire_payload_is_normalized() {
        let body = json!({
            "result": [{
                "InvoiceNo": "INV-12",
                "PartyName": "Sharma Family",
                "SubTotalAll": "2,000",
                "SubTotal": "1500",
                "Discount": "",
                "TaxAmount": "360",
                "RoundOff": "-0.4",
                "BillAmount": "2359.6",
                "AdvanceAmount": 1000,
                "TimeFrom": "7:00 pm"
            }],
            "events": [{
                "VenueName": "Lawn",
                "MinPax": "150",
                "TimeTo": "late",
                "items_arr": [
                    { "ItemName": "Buffet", "Quantity": "10", "Rate": "150", "Category": "Food" },
                    {
                        "ItemName": "DJ",
                        "Quantity": 1,
                        "Rate": "500",
                        "SubCategory": "Music",
                        "Category": "Extras"
                    }
                ],
                "tax_arr": [{ "TaxName": "GST", "TaxPer": "18", "TaxAmount": "360" }]
            }]
        });
        let (detail, summary) = summarize_wire(&body, &SummaryFallbacks::default());
        assert_eq!(detail.header.invoice_no, "INV-12");
        assert_eq!(detail.header.time_from, "07:00 PM");
        assert_eq!(detail.events[0].time_to, "late");
        assert_eq!(detail.events[0].items[1].group, "Music");
        assert_eq!(event_tax_total(&detail.events[0]), 360.0);
        assert_eq!(summary.sub_total, 2000.0);
        assert_eq!(summary.grand_total, 2359.6);
        assert_eq!(summary.advance_received, 1000.0);
        assert_eq!(summary.remaining_balance, 1359.6);
    }

    #[test]
    fn test_garbage_payload_degrades_to_zero() {
        let (detail, summary) = summarize_wire(&json!("error"), &SummaryFallbacks::default());
        assert!(detail.events.is_empty());
        assert_eq!(summary.grand_total, 0.0);
        assert_eq!(summary.amount_in_words, "ZERO");
    }
}
