//! Insert and patch types accepted by the store.
//!
//! The public record structs live in `safecampus_shared::models` and are
//! re-exported here.

use chrono::{DateTime, Utc};

pub use safecampus_shared::models::{
    Account, Article, Contact, Incident, LocationAlert, NearbyAlert, Post,
};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// An account about to be stored. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password_hash: String,
}

/// An account row including its password hash. Never serialized.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub account: Account,
    pub password_hash: String,
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
}

// ---------------------------------------------------------------------------
// Incidents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewIncident {
    pub description: String,
    pub location: String,
    pub reported_by: String,
    pub incident_date: DateTime<Utc>,
    pub image_path: String,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct IncidentPatch {
    pub description: Option<String>,
    pub location: Option<String>,
    pub incident_date: Option<DateTime<Utc>>,
    pub image_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewPost {
    pub description: String,
    pub media_path: String,
    pub author_id: String,
    pub author_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub description: Option<String>,
    pub media_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    pub image_path: String,
    pub posted_by: String,
}

#[derive(Debug, Clone, Default)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_path: Option<String>,
}

/// Overwrite `field` when a replacement was supplied.
pub(crate) fn apply<T>(field: &mut T, replacement: Option<T>) {
    if let Some(value) = replacement {
        *field = value;
    }
}
