//! HTTP API: shared state, router assembly and the small service endpoints.
//!
//! Each resource family lives in its own submodule and contributes a
//! `routes()` router that is merged here.

mod accounts;
mod contacts;
mod locations;
mod records;


use std::sync::{Arc, Mutex};

use axum::{
    extract::{DefaultBodyLimit, State},
    http::Method,
    routing::get,
    Json, Router,
};
use safecampus_shared::protocol::{HealthResponse, ServerInfoResponse};
use safecampus_shared::token::TokenSigner;
use safecampus_store::Database;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::media_store::MediaStore;

/// Headroom on top of the largest accepted file for the text parts of a
/// multipart form.
const FORM_OVERHEAD: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub media: Arc<MediaStore>,
    pub tokens: Arc<TokenSigner>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Open the database, prepare the upload directory and set up the
    /// token signer described by `config`.
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let db = Database::open_at(&config.database_path)?;
        let media = MediaStore::new(config.upload_path.clone(), config.max_upload_size).await?;

        let ttl = chrono::Duration::try_hours(config.token_ttl_hours)
            .filter(|ttl| *ttl > chrono::Duration::zero())
            .ok_or_else(|| anyhow::anyhow!("token TTL out of range: {}h", config.token_ttl_hours))?;
        let tokens = match config.token_signing_key {
            Some(secret) => TokenSigner::new(&secret, ttl),
            None => {
                tracing::warn!("TOKEN_SIGNING_KEY not set, sessions will not survive a restart");
                TokenSigner::generate(ttl)
            }
        };

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            media: Arc::new(media),
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        })
    }

    /// Run a blocking store operation off the async executor.
    pub async fn with_db<T, F>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&Database) -> Result<T, ServerError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let guard = db
                .lock()
                .map_err(|_| ServerError::Internal("database lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| ServerError::Internal(format!("database task failed: {e}")))?
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let body_limit = state.config.max_upload_size.saturating_add(FORM_OVERHEAD);

    Router::new()
        .route("/health", get(health_check))
        .route("/info", get(server_info))
        .merge(accounts::routes())
        .merge(contacts::routes())
        .merge(records::routes())
        .merge(locations::routes())
        .nest_service("/uploads", ServeDir::new(state.media.base_path()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn server_info(State(state): State<AppState>) -> Json<ServerInfoResponse> {
    Json(ServerInfoResponse {
        name: state.config.instance_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        admin_registration_open: state.config.admin_registration_open,
    })
}

/// Parse a record id from a path segment. Anything that is not a UUID cannot
/// name a stored record.
pub(crate) fn parse_id(raw: &str, what: &'static str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw).map_err(|_| ServerError::NotFound(format!("{what} not found")))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_on(state, listener).await
}

/// Serve on an already bound listener (port 0 in tests).
pub async fn serve_on(state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %listener.local_addr()?, "Starting HTTP API server");

    axum::serve(listener, app).await?;

    Ok(())
}
