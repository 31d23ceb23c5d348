//! Wire types exchanged between the client and the API gateway.
//!
//! JSON bodies use camelCase keys. Record creation for incidents, posts and
//! articles goes over multipart forms; the part names are fixed here so both
//! sides agree.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinates;
use crate::types::PrincipalKind;

/// Multipart part carrying the incident image.
pub const INCIDENT_IMAGE_FIELD: &str = "incidentImage";
/// Multipart part carrying the post media.
pub const POST_MEDIA_FIELD: &str = "media";
/// Multipart part carrying the article image.
pub const ARTICLE_IMAGE_FIELD: &str = "image";

// ─── Accounts ───

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by signup (201) and login (200).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: Uuid,
    pub kind: PrincipalKind,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    pub name: String,
    pub mobile: String,
}

// ─── Contacts ───

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub phone: String,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateContactRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// ─── Locations ───

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRequest {
    pub name: String,
    pub phone: String,
    pub location: Coordinates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub limit: Option<usize>,
}

// ─── Generic ───

/// Body of every error response, and of acknowledgements such as deletes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfoResponse {
    pub name: String,
    pub version: String,
    pub admin_registration_open: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_keys() {
        let json = serde_json::json!({
            "name": "Alice",
            "email": "a@x.com",
            "mobile": "9999999999",
            "password": "pw",
            "confirmPassword": "pw"
        });
        let req: SignupRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.confirm_password, "pw");
    }

    #[test]
    fn test_update_contact_skips_absent_fields() {
        let req = UpdateContactRequest {
            name: Some("Bob".into()),
            phone: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Bob" }));
    }
}
