//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{dashboard, health, parks, visits};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ParkPass API",
        version = "1.0.0",
        description = "National park visit tracker REST API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Parks
        parks::list_parks,
        // Visits
        visits::list_visits,
        visits::upsert_visit,
        visits::delete_visit,
        visits::batch_upsert_visits,
        // Dashboard
        dashboard::get_progress,
        dashboard::get_map,
    ),
    components(
        schemas(
            // Parks
            crate::models::park::ParkShort,
            crate::models::park::ParkQuery,
            // Visits
            crate::models::visit::Visit,
            crate::models::visit::VisitShort,
            crate::models::visit::UpsertVisit,
            crate::models::visit::BatchUpsertVisits,
            crate::models::visit::DeleteVisitQuery,
            crate::models::visit::UpsertOutcome,
            visits::UpsertVisitResponse,
            visits::MessageResponse,
            crate::services::visits::BatchResult,
            crate::services::visits::BatchFailure,
            // Status
            crate::models::status::ParkDisplayState,
            crate::models::status::ParkStatus,
            crate::models::status::Summary,
            crate::models::status::ParkWithStatus,
            crate::models::status::ProgressView,
            // Map
            crate::models::map::LatLng,
            crate::models::map::Bounds,
            crate::models::map::Viewport,
            crate::models::map::LegendEntry,
            crate::models::map::MarkerActionKind,
            crate::models::map::MarkerAction,
            crate::models::map::MapMarker,
            crate::models::map::MapView,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "parks", description = "Park catalog"),
        (name = "visits", description = "Visit ledger and bucket list"),
        (name = "dashboard", description = "Progress and map views")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
