//! Receipt entry against a bill.

use chrono::NaiveDate;
use serde_json::Value;

use crate::api::{ApiRequest, Endpoint};
use crate::datetime::format_iso_date;
use crate::error::ValidationError;
use crate::money::round2;
use crate::wire::first_text;

/// One choice in a receipt dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupOption {
    pub id: String,
    pub name: String,
}

impl LookupOption {
    /// Reads a lookup row; which keys hold the id and name depends on the
    /// list it came from.
    pub fn from_wire(endpoint: Endpoint, row: &Value) -> Self {
        let (id_keys, name_keys): (&[&str], &[&str]) = match endpoint {
            Endpoint::LedgerList => (
                &["LedgerId", "ledger_id", "Id"],
                &["LedgerName", "ledger_name", "Name"],
            ),
            Endpoint::AccountList => (
                &["AcId", "AccountId", "Id"],
                &["AcName", "AccountName", "Name"],
            ),
            Endpoint::PaymodeList => (
                &["PaymodeId", "PayModeId", "Id"],
                &["PaymodeName", "PayMode", "Name"],
            ),
            _ => (&["Id", "id"], &["Name", "name"]),
        };
        Self {
            id: first_text(row, id_keys),
            name: first_text(row, name_keys),
        }
    }

    pub fn from_rows(endpoint: Endpoint, rows: &[Value]) -> Vec<Self> {
        rows.iter()
            .map(|row| Self::from_wire(endpoint, row))
            .filter(|option| !option.id.is_empty())
            .collect()
    }
}

/// The receipt form as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptDraft {
    pub quotation_id: String,
    pub date: NaiveDate,
    pub ledger_id: String,
    pub account_id: String,
    pub paymode_id: String,
    pub amount: String,
    pub discount: String,
    pub tds: String,
    pub note: String,
}

impl ReceiptDraft {
    pub fn new(quotation_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            quotation_id: quotation_id.into(),
            date,
            ledger_id: String::new(),
            account_id: String::new(),
            paymode_id: String::new(),
            amount: String::new(),
            discount: String::new(),
            tds: String::new(),
            note: String::new(),
        }
    }

    /// Checks the form and builds the save request.
    pub fn validate(&self, login_id: &str) -> Result<ApiRequest, ValidationError> {
        let selected = |value: &str| !value.trim().is_empty() && value.trim() != "0";
        if !selected(&self.ledger_id) {
            return Err(ValidationError::MissingSelection("ledger"));
        }
        if !selected(&self.account_id) {
            return Err(ValidationError::MissingSelection("account"));
        }
        if !selected(&self.paymode_id) {
            return Err(ValidationError::MissingSelection("payment mode"));
        }

        let amount = parse_amount(&self.amount)?.ok_or(ValidationError::InvalidAmount)?;
        if amount <= 0.0 {
            return Err(ValidationError::InvalidAmount);
        }
        let discount = parse_amount(&self.discount)?.unwrap_or(0.0);
        let tds = parse_amount(&self.tds)?.unwrap_or(0.0);

        Ok(ApiRequest::post_form(
            Endpoint::SaveReceipt,
            vec![
                ("login_id", login_id.to_string()),
                ("str_date", format_iso_date(self.date)),
                ("str_ledger_id", self.ledger_id.trim().to_string()),
                ("str_amount", round2(amount).to_string()),
                ("str_ac_id", self.account_id.trim().to_string()),
                ("str_paymode_id", self.paymode_id.trim().to_string()),
                ("str_note", self.note.trim().to_string()),
                ("str_discount", round2(discount).to_string()),
                ("str_tds", round2(tds).to_string()),
                ("quot_id", self.quotation_id.clone()),
            ],
        )
        .for_hotel())
    }
}

/// Blank is `None`; anything else must be a finite, non-negative number.
fn parse_amount(input: &str) -> Result<Option<f64>, ValidationError> {
    let trimmed = input.trim().replace(',', "");
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(ValidationError::InvalidAmount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> ReceiptDraft {
        ReceiptDraft {
            ledger_id: "4".into(),
            account_id: "2".into(),
            paymode_id: "1".into(),
            amount: "5,000".into(),
            note: " advance ".into(),
            ..ReceiptDraft::new("88", NaiveDate::from_ymd_opt(2025, 9, 14).unwrap())
        }
    }

    #[test]
    fn test_valid_receipt_builds_form() {
        let request = draft().validate("7").unwrap();
        assert_eq!(request.endpoint, Endpoint::SaveReceipt);
        assert_eq!(request.hotel_param, Some("hotel_id"));
        assert_eq!(request.param("str_date"), Some("2025-09-14"));
        assert_eq!(request.param("str_amount"), Some("5000"));
        assert_eq!(request.param("str_discount"), Some("0"));
        assert_eq!(request.param("str_tds"), Some("0"));
        assert_eq!(request.param("str_note"), Some("advance"));
        assert_eq!(request.param("login_id"), Some("7"));
        assert_eq!(request.param("quot_id"), Some("88"));
    }

    #[test]
    fn test_selections_are_required() {
        let mut missing = draft();
        missing.account_id = "0".into();
        assert_eq!(missing.validate("7"), Err(ValidationError::MissingSelection("account")));
        missing.ledger_id.clear();
        assert_eq!(missing.validate("7"), Err(ValidationError::MissingSelection("ledger")));
    }

    #[test]
    fn test_amount_must_be_positive() {
        for bad in ["", "0", "-5", "abc", "NaN"] {
            let mut d = draft();
            d.amount = bad.into();
            assert_eq!(d.validate("7"), Err(ValidationError::InvalidAmount), "{bad:?}");
        }
        let mut d = draft();
        d.tds = "x".into();
        assert_eq!(d.validate("7"), Err(ValidationError::InvalidAmount));
    }

    #[test]
    fn test_lookup_options() {
        let rows = vec![
            json!({ "LedgerId": 4, "LedgerName": "Banquet Income" }),
            json!({ "LedgerName": "no id" }),
        ];
        let options = LookupOption::from_rows(Endpoint::LedgerList, &rows);
        assert_eq!(options, vec![LookupOption { id: "4".into(), name: "Banquet Income".into() }]);
        let paymode =
            LookupOption::from_wire(Endpoint::PaymodeList, &json!({ "Id": "2", "PayMode": "UPI" }));
        assert_eq!(paymode.name, "UPI");
    }
}
