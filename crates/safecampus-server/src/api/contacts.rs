//! Emergency contacts (owned by students) and helpline numbers (curated by
//! admins). Both kinds share the contact store and its phone uniqueness.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use safecampus_shared::models::Contact;
use safecampus_shared::protocol::{ContactRequest, MessageResponse, UpdateContactRequest};
use safecampus_shared::types::{ContactKind, Principal};
use safecampus_store::ContactPatch;
use tracing::info;

use super::{parse_id, AppState};
use crate::auth::{require_admin, require_kind, require_owner_or_admin, Authenticated};
use crate::error::ServerError;
use crate::extract::ApiJson;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/contacts", post(create_emergency).get(list_emergency))
        .route("/api/contacts/owner/:id", get(list_emergency_by_owner))
        .route(
            "/api/contacts/:id",
            get(get_emergency).put(update_emergency).delete(delete_emergency),
        )
        .route("/api/helplines", post(create_helpline).get(list_helplines))
        .route(
            "/api/helplines/:id",
            get(get_helpline).put(update_helpline).delete(delete_helpline),
        )
}

fn not_found_message(kind: ContactKind) -> &'static str {
    match kind {
        ContactKind::Emergency => "Emergency contact not found",
        ContactKind::Helpline => "Helpline not found",
    }
}

/// Fetch a contact of the given kind; a contact of the other kind is
/// reported as missing.
async fn load(state: &AppState, kind: ContactKind, raw_id: &str) -> Result<Contact, ServerError> {
    let message = not_found_message(kind);
    let id = parse_id(raw_id, "Contact")?;
    let contact = state
        .with_db(move |db| Ok(db.get_contact(id)?))
        .await
        .map_err(|e| e.or_not_found(message))?;
    if contact.kind != kind {
        return Err(ServerError::NotFound(message.to_string()));
    }
    Ok(contact)
}

async fn create(
    state: &AppState,
    kind: ContactKind,
    principal: &Principal,
    req: ContactRequest,
) -> Result<Contact, ServerError> {
    let owner_id = principal.owner_id();
    let contact = state
        .with_db(move |db| Ok(db.create_contact(kind, req.name.trim(), req.phone.trim(), &owner_id)?))
        .await?;
    info!(id = %contact.id, kind = kind.as_str(), owner = %contact.owner_id, "contact created");
    Ok(contact)
}

async fn update(state: &AppState, contact: &Contact, req: UpdateContactRequest) -> Result<Contact, ServerError> {
    let id = contact.id;
    let message = not_found_message(contact.kind);
    let patch = ContactPatch {
        name: req.name.map(|n| n.trim().to_string()),
        phone: req.phone.map(|p| p.trim().to_string()),
    };
    state
        .with_db(move |db| Ok(db.update_contact(id, patch)?))
        .await
        .map_err(|e| e.or_not_found(message))
}

async fn delete(state: &AppState, contact: &Contact) -> Result<(), ServerError> {
    let id = contact.id;
    let message = not_found_message(contact.kind);
    state
        .with_db(move |db| Ok(db.delete_contact(id)?))
        .await
        .map_err(|e| e.or_not_found(message))?;
    info!(id = %id, kind = contact.kind.as_str(), "contact deleted");
    Ok(())
}

// ─── Emergency contacts ───

async fn create_emergency(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiJson(req): ApiJson<ContactRequest>,
) -> Result<(StatusCode, Json<Contact>), ServerError> {
    require_kind(&principal, ContactKind::Emergency.owner_kind())?;
    let contact = create(&state, ContactKind::Emergency, &principal, req).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn list_emergency(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
) -> Result<Json<Vec<Contact>>, ServerError> {
    require_admin(&principal)?;
    let contacts = state
        .with_db(|db| Ok(db.list_contacts(ContactKind::Emergency)?))
        .await?;
    Ok(Json(contacts))
}

async fn list_emergency_by_owner(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(owner_id): Path<String>,
) -> Result<Json<Vec<Contact>>, ServerError> {
    require_owner_or_admin(&principal, &owner_id)?;
    let contacts = state
        .with_db(move |db| Ok(db.list_contacts_by_owner(ContactKind::Emergency, &owner_id)?))
        .await?;
    Ok(Json(contacts))
}

async fn get_emergency(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ServerError> {
    let contact = load(&state, ContactKind::Emergency, &id).await?;
    require_owner_or_admin(&principal, &contact.owner_id)?;
    Ok(Json(contact))
}

async fn update_emergency(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateContactRequest>,
) -> Result<Json<Contact>, ServerError> {
    let contact = load(&state, ContactKind::Emergency, &id).await?;
    require_owner_or_admin(&principal, &contact.owner_id)?;
    Ok(Json(update(&state, &contact, req).await?))
}

async fn delete_emergency(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    let contact = load(&state, ContactKind::Emergency, &id).await?;
    require_owner_or_admin(&principal, &contact.owner_id)?;
    delete(&state, &contact).await?;
    Ok(Json(MessageResponse::new("Emergency contact deleted")))
}

// ─── Helplines ───

async fn create_helpline(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiJson(req): ApiJson<ContactRequest>,
) -> Result<(StatusCode, Json<Contact>), ServerError> {
    require_kind(&principal, ContactKind::Helpline.owner_kind())?;
    let contact = create(&state, ContactKind::Helpline, &principal, req).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn list_helplines(
    State(state): State<AppState>,
    Authenticated(_principal): Authenticated,
) -> Result<Json<Vec<Contact>>, ServerError> {
    let contacts = state
        .with_db(|db| Ok(db.list_contacts(ContactKind::Helpline)?))
        .await?;
    Ok(Json(contacts))
}

async fn get_helpline(
    State(state): State<AppState>,
    Authenticated(_principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ServerError> {
    Ok(Json(load(&state, ContactKind::Helpline, &id).await?))
}

async fn update_helpline(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateContactRequest>,
) -> Result<Json<Contact>, ServerError> {
    require_admin(&principal)?;
    let contact = load(&state, ContactKind::Helpline, &id).await?;
    Ok(Json(update(&state, &contact, req).await?))
}

async fn delete_helpline(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    require_admin(&principal)?;
    let contact = load(&state, ContactKind::Helpline, &id).await?;
    delete(&state, &contact).await?;
    Ok(Json(MessageResponse::new("Helpline deleted")))
}
