//! Endpoint paths and request parameters for the banquet API.
//!
//! Each operation has a builder that returns an [`ApiRequest`]; the frontend
//! client only has to encode it and send it. Requests that name a hotel
//! parameter get the signed-in hotel id injected by the client.

use std::fmt;

use serde_json::Value;

use crate::datetime::format_wire_date;
use crate::listing::DateRange;
use crate::records::DeletedKind;

/// Same-origin deployment, overridden at build time with `BANQUET_API_URL`.
pub const DEFAULT_API_URL: &str = "/api";

/// Query/form parameter name for the hotel id.
pub const HOTEL_PARAM: &str = "hotel_id";
/// The deleted-companies list spells it differently.
pub const LEGACY_HOTEL_PARAM: &str = "hotelid";

pub const RESULT_KEY: &str = "result";
pub const CALENDAR_RESULT_KEY: &str = "result2";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: option_env!("BANQUET_API_URL")
                .unwrap_or(DEFAULT_API_URL)
                .to_string(),
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    BillList,
    BillAction,
    BillPrint,
    DeletedBillList,
    DeletedQuotationList,
    DeletedCompanyList,
    QuotationAction,
    CompanyAction,
    CalendarBookings,
    SaveReceipt,
    Login,
    ItemList,
    UnsettledBillList,
    LedgerList,
    AccountList,
    PaymodeList,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::BillList => "bill_list.php",
            Endpoint::BillAction => "bill_action.php",
            Endpoint::BillPrint => "bill_print.php",
            Endpoint::DeletedBillList => "deleted_bill_list.php",
            Endpoint::DeletedQuotationList => "deleted_quotation_list.php",
            Endpoint::DeletedCompanyList => "deleted_company_list.php",
            Endpoint::QuotationAction => "quotation_action.php",
            Endpoint::CompanyAction => "company_action.php",
            Endpoint::CalendarBookings => "calendar_bookings.php",
            Endpoint::SaveReceipt => "save_receipt.php",
            Endpoint::Login => "login.php",
            Endpoint::ItemList => "item_list.php",
            Endpoint::UnsettledBillList => "unsettled_bill_list.php",
            Endpoint::LedgerList => "ledger_list.php",
            Endpoint::AccountList => "account_list.php",
            Endpoint::PaymodeList => "paymode_list.php",
        }
    }

    /// Key holding the row array in this endpoint's list response.
    pub fn rows_key(&self) -> &'static str {
        match self {
            Endpoint::CalendarBookings => CALENDAR_RESULT_KEY,
            _ => RESULT_KEY,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    /// `application/x-www-form-urlencoded` body.
    PostForm,
}

pub type Params = Vec<(&'static str, String)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub method: Method,
    pub params: Params,
    /// Parameter the signed-in hotel id goes into, if any.
    pub hotel_param: Option<&'static str>,
}

impl ApiRequest {
    pub fn get(endpoint: Endpoint, params: Params) -> Self {
        Self {
            endpoint,
            method: Method::Get,
            params,
            hotel_param: None,
        }
    }

    pub fn post_form(endpoint: Endpoint, params: Params) -> Self {
        Self {
            endpoint,
            method: Method::PostForm,
            params,
            hotel_param: None,
        }
    }

    pub fn for_hotel(self) -> Self {
        self.for_hotel_as(HOTEL_PARAM)
    }

    pub fn for_hotel_as(mut self, name: &'static str) -> Self {
        self.hotel_param = Some(name);
        self
    }

    /// Adds the hotel id unless the caller already supplied one.
    pub fn inject_hotel(&mut self, hotel_id: &str) {
        let Some(name) = self.hotel_param else {
            return;
        };
        if !self.params.iter().any(|(k, _)| *k == name) {
            self.params.insert(0, (name, hotel_id.to_string()));
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// What a soft-delete action endpoint should do with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAction {
    Delete,
    Restore,
}

impl RecordAction {
    pub fn as_param(&self) -> &'static str {
        match self {
            RecordAction::Delete => "delete",
            RecordAction::Restore => "active",
        }
    }
}

fn range_params(range: DateRange) -> Params {
    vec![
        ("fromdate", format_wire_date(range.from)),
        ("todate", format_wire_date(range.to)),
    ]
}

pub fn bill_list_request(range: DateRange) -> ApiRequest {
    let mut params = range_params(range);
    params.extend([
        ("venue_id", "0".to_string()),
        ("comp_id", "0".to_string()),
        ("party_id", "0".to_string()),
    ]);
    ApiRequest::get(Endpoint::BillList, params).for_hotel()
}

pub fn bill_action_request(quotation_id: &str, action: RecordAction, reason: &str) -> ApiRequest {
    ApiRequest::get(
        Endpoint::BillAction,
        vec![
            ("quot_id", quotation_id.to_string()),
            ("action", action.as_param().to_string()),
            ("cancel_reason", reason.to_string()),
        ],
    )
}

pub fn bill_print_request(quotation_id: &str, bill_id: &str) -> ApiRequest {
    ApiRequest::get(
        Endpoint::BillPrint,
        vec![
            ("quot_id", quotation_id.to_string()),
            ("bill_id", bill_id.to_string()),
        ],
    )
    .for_hotel()
}

/// Companies are listed by `hotelid` with no range; the others by range.
pub fn deleted_list_request(kind: DeletedKind, range: DateRange) -> ApiRequest {
    match kind {
        DeletedKind::Bills => {
            ApiRequest::get(Endpoint::DeletedBillList, range_params(range)).for_hotel()
        }
        DeletedKind::Quotations => {
            ApiRequest::get(Endpoint::DeletedQuotationList, range_params(range)).for_hotel()
        }
        DeletedKind::Companies => {
            ApiRequest::get(Endpoint::DeletedCompanyList, Vec::new())
                .for_hotel_as(LEGACY_HOTEL_PARAM)
        }
    }
}

pub fn restore_request(kind: DeletedKind, id: &str) -> ApiRequest {
    match kind {
        DeletedKind::Bills => bill_action_request(id, RecordAction::Restore, ""),
        DeletedKind::Quotations => ApiRequest::get(
            Endpoint::QuotationAction,
            vec![
                ("quot_id", id.to_string()),
                ("action", RecordAction::Restore.as_param().to_string()),
            ],
        ),
        DeletedKind::Companies => ApiRequest::get(
            Endpoint::CompanyAction,
            vec![
                ("comp_id", id.to_string()),
                ("action", RecordAction::Restore.as_param().to_string()),
            ],
        ),
    }
}

pub fn calendar_request(range: DateRange) -> ApiRequest {
    let mut params = range_params(range);
    params.extend([("venue_id", "0".to_string()), ("status_id", "0".to_string())]);
    ApiRequest::get(Endpoint::CalendarBookings, params).for_hotel()
}

pub fn item_list_request() -> ApiRequest {
    ApiRequest::get(Endpoint::ItemList, Vec::new()).for_hotel()
}

pub fn unsettled_bills_request(range: DateRange) -> ApiRequest {
    ApiRequest::get(Endpoint::UnsettledBillList, range_params(range)).for_hotel()
}

/// Ledger, account and pay-mode lookups for the receipt form.
pub fn lookup_request(endpoint: Endpoint) -> ApiRequest {
    ApiRequest::get(endpoint, Vec::new()).for_hotel()
}

pub fn login_request(user_name: &str, password: &str) -> ApiRequest {
    ApiRequest::post_form(
        Endpoint::Login,
        vec![
            ("user_name", user_name.to_string()),
            ("password", password.to_string()),
        ],
    )
}

/// Whether an action endpoint accepted the request.
///
/// Any body containing `1` counts as success, unless it is a JSON object
/// whose `success` or `status` field is explicitly falsy. A `true`,
/// `"success"` or non-zero numeric flag is success on its own.
pub fn is_success_text(body: &str) -> bool {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        let flag = map.get("success").or_else(|| map.get("status"));
        match flag {
            Some(flag) if flag_is_falsy(flag) => return false,
            Some(flag) if flag_is_truthy(flag) => return true,
            _ => {}
        }
    }
    body.contains('1')
}

fn flag_is_falsy(flag: &Value) -> bool {
    match flag {
        Value::Bool(b) => !*b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => {
            let s = s.trim();
            s == "0" || s.eq_ignore_ascii_case("false") || s.eq_ignore_ascii_case("error")
        }
        _ => false,
    }
}

fn flag_is_truthy(flag: &Value) -> bool {
    match flag {
        Value::Bool(b) => *b,
        Value::Number(_) => true,
        Value::String(s) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("success")
        }
        _ => false,
    }
}
