use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use safecampus_shared::models::{LocationAlert, NearbyAlert};
use safecampus_shared::protocol::{LocationRequest, NearestQuery};

use super::AppState;
use crate::auth::{require_admin, Authenticated};
use crate::error::ServerError;
use crate::extract::{ApiJson, ApiQuery};

const DEFAULT_NEAREST_LIMIT: usize = 10;
const MAX_NEAREST_LIMIT: usize = 100;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/locations", post(record_location).get(list_locations))
        .route("/api/locations/nearest", get(nearest_locations))
}

/// Emergency button: every press is stored, duplicates included.
async fn record_location(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiJson(req): ApiJson<LocationRequest>,
) -> Result<(StatusCode, Json<LocationAlert>), ServerError> {
    let alert = state
        .with_db(move |db| {
            Ok(db.record_location(
                req.name.trim(),
                req.phone.trim(),
                req.location.latitude,
                req.location.longitude,
            )?)
        })
        .await?;

    tracing::info!(
        id = %alert.id,
        by = %principal.id,
        map = %alert.map_link(),
        "emergency location received"
    );
    Ok((StatusCode::CREATED, Json(alert)))
}

async fn list_locations(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
) -> Result<Json<Vec<LocationAlert>>, ServerError> {
    require_admin(&principal)?;
    Ok(Json(state.with_db(|db| Ok(db.list_locations()?)).await?))
}

async fn nearest_locations(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiQuery(query): ApiQuery<NearestQuery>,
) -> Result<Json<Vec<NearbyAlert>>, ServerError> {
    require_admin(&principal)?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_NEAREST_LIMIT)
        .clamp(1, MAX_NEAREST_LIMIT);
    let nearby = state
        .with_db(move |db| Ok(db.nearest_locations(query.lat, query.lon, limit)?))
        .await?;
    Ok(Json(nearby))
}
