//! Visit ledger API endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::visit::{
        parse_visit_date, BatchUpsertVisits, DeleteVisitQuery, UpsertOutcome, UpsertVisit, Visit,
        VisitShort,
    },
    services::visits::BatchResult,
};

use super::{AuthenticatedUser, JsonBody};

#[derive(Serialize, ToSchema)]
pub struct UpsertVisitResponse {
    pub message: String,
    pub outcome: UpsertOutcome,
    pub visit: Visit,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// List the caller's visits
#[utoipa::path(
    get,
    path = "/visits",
    tag = "visits",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's visits", body = Vec<VisitShort>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_visits(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<VisitShort>>> {
    let visits = state.services.visits.list(claims.user_id()).await?;
    Ok(Json(visits.into_iter().map(VisitShort::from).collect()))
}

/// Mark a park visited or add it to the bucket list
#[utoipa::path(
    post,
    path = "/visits",
    tag = "visits",
    security(("bearer_auth" = [])),
    request_body = UpsertVisit,
    responses(
        (status = 200, description = "Visit recorded", body = UpsertVisitResponse),
        (status = 400, description = "Malformed body, missing park code or bad date", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown park", body = crate::error::ErrorResponse)
    )
)]
pub async fn upsert_visit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    JsonBody(data): JsonBody<UpsertVisit>,
) -> AppResult<Json<UpsertVisitResponse>> {
    data.validate()?;

    let is_bucket_list = data.is_bucket_list.unwrap_or(false);
    let visited_date = data.visited_date.as_deref().map(parse_visit_date).transpose()?;
    let park_code = data.park_code.as_deref().unwrap_or_default();

    let result = state
        .services
        .visits
        .upsert(claims.user_id(), park_code, is_bucket_list, visited_date)
        .await?;

    Ok(Json(UpsertVisitResponse {
        message: result.outcome.message(is_bucket_list).to_string(),
        outcome: result.outcome,
        visit: result.visit,
    }))
}

/// Remove the caller's visit or bucket-list entry for a park
#[utoipa::path(
    delete,
    path = "/visits",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(DeleteVisitQuery),
    responses(
        (status = 200, description = "Visit removed (or already absent)", body = MessageResponse),
        (status = 400, description = "Missing park code", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_visit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<DeleteVisitQuery>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .visits
        .delete(claims.user_id(), query.park_code.as_deref())
        .await?;

    Ok(Json(MessageResponse {
        message: "Visit removed".to_string(),
    }))
}

/// Apply the same state to several parks
#[utoipa::path(
    post,
    path = "/visits/batch",
    tag = "visits",
    security(("bearer_auth" = [])),
    request_body = BatchUpsertVisits,
    responses(
        (status = 200, description = "Per-park outcomes and refreshed counters", body = BatchResult),
        (status = 400, description = "Malformed body, no park codes or bad date", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn batch_upsert_visits(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    JsonBody(data): JsonBody<BatchUpsertVisits>,
) -> AppResult<Json<BatchResult>> {
    data.validate()?;

    let visited_date = data.visited_date.as_deref().map(parse_visit_date).transpose()?;

    let result = state
        .services
        .visits
        .batch_upsert(
            claims.user_id(),
            &data.park_codes,
            data.is_bucket_list.unwrap_or(false),
            visited_date,
        )
        .await?;

    Ok(Json(result))
}
