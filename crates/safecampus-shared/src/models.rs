//! Public record models.
//!
//! These are the shapes the store hands out and the gateway serializes.
//! None of them carries a password hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::GeoPoint;
use crate::types::{ContactKind, Principal, PrincipalKind};

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// Public projection of a student or admin account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "userId")]
    pub id: Uuid,
    pub kind: PrincipalKind,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn principal(&self) -> Principal {
        Principal {
            kind: self.kind,
            id: self.id,
        }
    }
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

/// An emergency contact (owned by a student) or helpline number (owned by
/// an admin). Phone numbers are unique across both kinds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub kind: ContactKind,
    pub name: String,
    pub phone: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Incident
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: Uuid,
    pub description: String,
    /// Free-text location as typed by the reporter.
    pub location: String,
    pub reported_by: String,
    pub incident_date: DateTime<Utc>,
    /// Relative path of the attached image, e.g. `uploads/1700000000000.jpg`.
    pub image_path: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub description: String,
    pub media_path: String,
    pub author_id: String,
    /// Copied from the author's account when the post is created.
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Article
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_path: String,
    pub posted_by: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Location alert
// ---------------------------------------------------------------------------

/// One press of the emergency button. Never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationAlert {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub location: GeoPoint,
    pub created_at: DateTime<Utc>,
}

impl LocationAlert {
    pub fn map_link(&self) -> String {
        self.location.map_link()
    }
}

/// A location alert together with its distance from a query point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NearbyAlert {
    #[serde(flatten)]
    pub alert: LocationAlert,
    pub distance_m: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_json_has_no_password() {
        let account = Account {
            id: Uuid::new_v4(),
            kind: PrincipalKind::Student,
            name: "Alice".into(),
            email: "a@x.com".into(),
            mobile: "9999999999".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["mobile"], "9999999999");
        assert!(json.get("userId").is_some());
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }
}
