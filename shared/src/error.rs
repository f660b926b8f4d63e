use thiserror::Error;

/// Input problems caught before any request leaves the browser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("To date must be on or after the from date")]
    InvalidDateRange,
    #[error("Please enter a reason of at least {min} characters")]
    DeleteReasonTooShort { min: usize },
    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhone,
    #[error("Please select a {0}")]
    MissingSelection(&'static str),
    #[error("Please enter a valid amount")]
    InvalidAmount,
    #[error("Please enter both user name and password")]
    EmptyCredentials,
    #[error("Invalid user name or password")]
    CredentialMismatch,
}

/// Failures talking to the banquet API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("Request was not accepted: {0}")]
    Rejected(String),
}
