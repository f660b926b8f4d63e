use gloo::net::http::{Request, Response};
use serde_json::Value;
use shared::api::{self, is_success_text, ApiRequest, Method, RecordAction};
use shared::calendar::{derive_events, RawBooking};
use shared::receipt::LookupOption;
use shared::wire::{decode_rows, extract_rows};
use shared::{
    ApiConfig, ApiError, BillDetail, BillRecord, CalendarEvent, DateRange, DeletedEntry,
    DeletedKind, Endpoint, Item, UnsettledBill,
};
use web_sys::UrlSearchParams;

use crate::services::storage::Preferences;

/// API client for the banquet PHP endpoints.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    config: ApiConfig,
    preferences: Preferences,
}

impl ApiClient {
    /// Client for the configured API host
    pub fn new(preferences: Preferences) -> Self {
        Self {
            config: ApiConfig::default(),
            preferences,
        }
    }

    /// Client for a custom base URL
    pub fn with_base_url(base_url: String, preferences: Preferences) -> Self {
        Self {
            config: ApiConfig::with_base_url(base_url),
            preferences,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    async fn send(&self, mut request: ApiRequest) -> Result<String, ApiError> {
        if request.hotel_param.is_some() {
            match self.preferences.hotel_id() {
                Some(hotel_id) => request.inject_hotel(&hotel_id),
                None => log::warn!(target: "api", "No hotel selected for {}", request.endpoint),
            }
        }

        let url = self.config.url(request.endpoint);
        log::debug!(target: "api", "{:?} {}", request.method, url);

        let response = match request.method {
            Method::Get => Request::get(&url)
                .query(request.params.iter().map(|(k, v)| (*k, v.as_str())))
                .send()
                .await,
            Method::PostForm => {
                let form = UrlSearchParams::new()
                    .map_err(|_| ApiError::Network("Could not build form body".to_string()))?;
                for (key, value) in &request.params {
                    form.append(key, value);
                }
                Request::post(&url)
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(form)
                    .map_err(|e| ApiError::Network(e.to_string()))?
                    .send()
                    .await
            }
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        read_text(response).await
    }

    async fn fetch_json(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let text = self.send(request).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn fetch_rows(&self, request: ApiRequest) -> Result<Vec<Value>, ApiError> {
        let key = request.endpoint.rows_key();
        let body = self.fetch_json(request).await?;
        Ok(extract_rows(&body, key))
    }

    /// Action endpoints answer with free text; see [`is_success_text`].
    async fn perform(&self, request: ApiRequest) -> Result<(), ApiError> {
        let endpoint = request.endpoint;
        let text = self.send(request).await?;
        if is_success_text(&text) {
            Ok(())
        } else {
            log::warn!(target: "api", "{} rejected: {}", endpoint, text);
            Err(ApiError::Rejected(text.trim().to_string()))
        }
    }

    pub async fn get_bills(&self, range: DateRange) -> Result<Vec<BillRecord>, ApiError> {
        let rows = self.fetch_rows(api::bill_list_request(range)).await?;
        Ok(decode_rows(rows))
    }

    pub async fn delete_bill(&self, quotation_id: &str, reason: &str) -> Result<(), ApiError> {
        self.perform(api::bill_action_request(quotation_id, RecordAction::Delete, reason))
            .await
    }

    pub async fn get_bill_detail(&self, quotation_id: &str, bill_id: &str) -> Result<BillDetail, ApiError> {
        let body = self
            .fetch_json(api::bill_print_request(quotation_id, bill_id))
            .await?;
        Ok(BillDetail::from_wire(&body))
    }

    pub async fn get_deleted(&self, kind: DeletedKind, range: DateRange) -> Result<Vec<DeletedEntry>, ApiError> {
        let rows = self.fetch_rows(api::deleted_list_request(kind, range)).await?;
        Ok(DeletedEntry::from_rows(kind, &rows))
    }

    pub async fn restore(&self, kind: DeletedKind, id: &str) -> Result<(), ApiError> {
        self.perform(api::restore_request(kind, id)).await
    }

    pub async fn get_calendar_events(&self, range: DateRange) -> Result<Vec<CalendarEvent>, ApiError> {
        let rows = self.fetch_rows(api::calendar_request(range)).await?;
        let bookings: Vec<RawBooking> = decode_rows(rows);
        Ok(derive_events(&bookings))
    }

    pub async fn get_items(&self) -> Result<Vec<Item>, ApiError> {
        let rows = self.fetch_rows(api::item_list_request()).await?;
        Ok(decode_rows(rows))
    }

    pub async fn get_unsettled_bills(&self, range: DateRange) -> Result<Vec<UnsettledBill>, ApiError> {
        let rows = self.fetch_rows(api::unsettled_bills_request(range)).await?;
        Ok(decode_rows(rows))
    }

    pub async fn get_lookup(&self, endpoint: Endpoint) -> Result<Vec<LookupOption>, ApiError> {
        let rows = self.fetch_rows(api::lookup_request(endpoint)).await?;
        Ok(LookupOption::from_rows(endpoint, &rows))
    }

    pub async fn save_receipt(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.perform(request).await
    }

    /// Raw login response; the caller verifies it against the typed
    /// credentials.
    pub async fn login(&self, user_name: &str, password: &str) -> Result<Value, ApiError> {
        self.fetch_json(api::login_request(user_name, password)).await
    }
}

async fn read_text(response: Response) -> Result<String, ApiError> {
    if response.ok() {
        response
            .text()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    } else {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ApiError::Status { status, body })
    }
}
