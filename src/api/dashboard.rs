//! Progress and map view endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::{MapView, ProgressView},
};

use super::AuthenticatedUser;

/// Counters and the catalog grouped by the caller's status
#[utoipa::path(
    get,
    path = "/progress",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Progress view", body = ProgressView),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_progress(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ProgressView>> {
    let progress = state.services.dashboard.progress(claims.user_id()).await?;
    Ok(Json(progress))
}

/// Map markers with colors and action bindings
#[utoipa::path(
    get,
    path = "/map",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Map view", body = MapView),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_map(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<MapView>> {
    let map = state
        .services
        .dashboard
        .map(claims.user_id(), &state.config.map)
        .await?;
    Ok(Json(map))
}
