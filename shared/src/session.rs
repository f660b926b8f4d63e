//! Login verification.
//!
//! The login endpoint answers with candidate user rows; a session is only
//! trusted when a row echoes back exactly the credentials that were typed.

use serde_json::Value;

use crate::api::{Endpoint, RESULT_KEY};
use crate::context::Session;
use crate::error::ValidationError;
use crate::wire::{extract_rows, first_text, text};

/// Rejects blank input before anything is sent.
pub fn check_credentials(user_name: &str, password: &str) -> Result<(), ValidationError> {
    if user_name.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::EmptyCredentials);
    }
    Ok(())
}

/// Passwords compare exactly; numeric values are read as their digits.
fn password_matches(stored: &Value, password: &str) -> bool {
    match stored {
        Value::String(s) => s == password,
        Value::Number(_) => text(stored) == password,
        _ => false,
    }
}

pub fn verify_login(
    user_name: &str,
    password: &str,
    body: &Value,
) -> Result<Session, ValidationError> {
    check_credentials(user_name, password)?;
    let user_name = user_name.trim();
    let rows = extract_rows(body, RESULT_KEY);
    let row = rows
        .iter()
        .find(|row| {
            first_text(row, &["u_name"]) == user_name
                && row.get("u_pass").is_some_and(|stored| password_matches(stored, password))
        })
        .ok_or(ValidationError::CredentialMismatch)?;

    let hotel_id = first_text(row, &["hotel_id", "HotelId"]);
    if hotel_id.is_empty() {
        log::warn!("{} returned a user without a hotel", Endpoint::Login);
        return Err(ValidationError::CredentialMismatch);
    }
    let user_id = first_text(row, &["u_id", "user_id"]);
    let login_id = match first_text(row, &["login_id"]) {
        id if id.is_empty() => user_id.clone(),
        id => id,
    };
    let display_name = match first_text(row, &["UserName", "user_full_name"]) {
        name if name.is_empty() => user_name.to_string(),
        name => name,
    };

    Ok(Session {
        user: user_name.to_string(),
        user_id,
        login_id,
        hotel_id,
        hotel_name: first_text(row, &["hotel_name", "HotelName"]),
        user_name: display_name,
        user_role: first_text(row, &["UserRole", "user_role"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> Value {
        json!({ "result": [{
            "u_name": "asha",
            "u_pass": "s3cret",
            "u_id": 7,
            "hotel_id": "12",
            "hotel_name": "Palm Court",
            "UserRole": "admin"
        }]})
    }

    #[test]
    fn test_matching_row_becomes_session() {
        let session = verify_login(" asha ", "s3cret", &response()).unwrap();
        assert_eq!(session.hotel_id, "12");
        assert_eq!(session.login_id, "7");
        assert_eq!(session.user_id, "7");
        assert_eq!(session.user_name, "asha");
        assert_eq!(session.user_role, "admin");
    }

    #[test]
    fn test_explicit_login_id_wins() {
        let mut body = response();
        body["result"][0]["login_id"] = json!("31");
        assert_eq!(verify_login("asha", "s3cret", &body).unwrap().login_id, "31");
    }

    #[test]
    fn test_mismatch_is_rejected() {
        let mismatch = Err(ValidationError::CredentialMismatch);
        assert_eq!(verify_login("asha", "wrong", &response()), mismatch);
        assert_eq!(verify_login("ASHA", "s3cret", &response()), mismatch);
        assert_eq!(verify_login("asha", "s3cret", &json!({ "result": [] })), mismatch);
        assert_eq!(verify_login("asha", "s3cret", &json!("error")), mismatch);
    }

    #[test]
    fn test_numeric_password_matches() {
        let mut body = response();
        body["result"][0]["u_pass"] = json!(1234);
        assert_eq!(verify_login("asha", "1234", &body).unwrap().hotel_id, "12");
        assert_eq!(
            verify_login("asha", "12345", &body),
            Err(ValidationError::CredentialMismatch)
        );
    }

    #[test]
    fn test_blank_credentials() {
        assert_eq!(check_credentials("  ", "x"), Err(ValidationError::EmptyCredentials));
        assert_eq!(verify_login("asha", "", &response()), Err(ValidationError::EmptyCredentials));
    }
}
