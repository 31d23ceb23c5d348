use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use safecampus_shared::models::Account;
use safecampus_shared::protocol::{AuthResponse, LoginRequest, SignupRequest, UpdateAccountRequest};
use safecampus_shared::types::{Principal, PrincipalKind};
use tracing::info;

use super::{parse_id, AppState};
use crate::auth::{require_admin, Authenticated};
use crate::error::ServerError;
use crate::extract::ApiJson;
use crate::identity;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/accounts/:kind", get(list_accounts))
        .route("/api/accounts/:kind/signup", post(signup))
        .route("/api/accounts/:kind/login", post(login))
        .route("/api/accounts/:kind/:id", get(get_account).put(update_account))
}

fn parse_kind(raw: &str) -> Result<PrincipalKind, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::NotFound(format!("Unknown account kind '{raw}'")))
}

fn auth_response(state: &AppState, account: &Account, message: &str) -> Result<AuthResponse, ServerError> {
    let token = state
        .tokens
        .issue(account.principal(), Utc::now())
        .map_err(|e| ServerError::Internal(format!("token issue failed: {e}")))?;
    Ok(AuthResponse {
        token,
        user_id: account.id,
        kind: account.kind,
        message: message.to_string(),
    })
}

async fn signup(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    let kind = parse_kind(&kind)?;
    if kind == PrincipalKind::Admin && !state.config.admin_registration_open {
        return Err(ServerError::Forbidden("Admin registration is closed".into()));
    }

    let account = identity::register(&state, kind, req).await?;

    let message = format!("{} registered successfully", kind.label());
    Ok((StatusCode::CREATED, Json(auth_response(&state, &account, &message)?)))
}

async fn login(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ServerError> {
    let kind = parse_kind(&kind)?;
    let account = identity::login(&state, kind, req).await?;

    info!(id = %account.id, kind = %kind, "login");
    Ok(Json(auth_response(&state, &account, "Login successful")?))
}

async fn list_accounts(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path(kind): Path<String>,
) -> Result<Json<Vec<Account>>, ServerError> {
    require_admin(&principal)?;
    let kind = parse_kind(&kind)?;
    let accounts = state
        .with_db(move |db| identity::list_accounts(db, kind))
        .await?;
    Ok(Json(accounts))
}

async fn get_account(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<Account>, ServerError> {
    let kind = parse_kind(&kind)?;
    let id = parse_id(&id, kind.label())?;
    if !principal.is_admin() && principal != (Principal { kind, id }) {
        return Err(ServerError::Forbidden("You can only view your own profile".into()));
    }

    let account = state
        .with_db(move |db| identity::get_account(db, kind, id))
        .await?;
    Ok(Json(account))
}

async fn update_account(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Path((kind, id)): Path<(String, String)>,
    ApiJson(req): ApiJson<UpdateAccountRequest>,
) -> Result<Json<Account>, ServerError> {
    let kind = parse_kind(&kind)?;
    let id = parse_id(&id, kind.label())?;
    if principal != (Principal { kind, id }) {
        return Err(ServerError::Forbidden("You can only edit your own profile".into()));
    }

    let account = state
        .with_db(move |db| identity::update_account(db, kind, id, &req))
        .await?;
    info!(id = %account.id, kind = %kind, "profile updated");
    Ok(Json(account))
}
