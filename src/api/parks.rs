//! Park catalog API endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::park::{ParkQuery, ParkShort},
};

/// List catalog parks (map-ready parks unless `all=true`)
#[utoipa::path(
    get,
    path = "/parks",
    tag = "parks",
    params(ParkQuery),
    responses(
        (status = 200, description = "Park list", body = Vec<ParkShort>),
        (status = 500, description = "Failed to fetch parks", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_parks(
    State(state): State<crate::AppState>,
    Query(query): Query<ParkQuery>,
) -> AppResult<Json<Vec<ParkShort>>> {
    let parks = state.services.parks.list(query.filter()).await?;
    Ok(Json(parks.into_iter().map(ParkShort::from).collect()))
}
