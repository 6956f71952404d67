//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, guides, health, records, stats, tours};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TickMyPax API",
        version = "0.3.0",
        description = "Tour operations back office: passenger imports, check-in and manifests",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::logout,
        auth::me,
        auth::change_password,
        // Guides
        guides::list_guides,
        guides::create_guide,
        guides::update_guide,
        guides::delete_guide,
        // Records
        records::import_excel,
        records::list_records,
        records::create_record,
        records::remove_record,
        records::list_archive,
        records::download_today,
        // Check-in
        records::check_in,
        records::remove_check_in,
        records::check_in_by_reference,
        records::update_pax,
        // Stats
        stats::completed_tour_stats,
        // Tours
        tours::assign_guide,
        tours::all_tours,
        tours::todays_tours,
        tours::get_tour,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::CurrentUser,
            crate::models::user::ChangePasswordRequest,
            crate::models::user::Role,
            // Guides
            crate::models::user::GuideSummary,
            crate::models::user::CreateGuide,
            crate::models::user::UpdateGuide,
            // Records
            crate::models::passenger_record::PassengerRecord,
            crate::models::passenger_record::CheckInStatus,
            crate::models::passenger_record::CreatePassengerRecord,
            crate::models::passenger_record::RemoveRecord,
            crate::models::passenger_record::UpdatePax,
            crate::models::passenger_record::CheckInByReference,
            crate::models::archive_record::ArchivePassengerRecord,
            crate::models::import_report::ImportReport,
            records::ImportUpload,
            records::CheckInResponse,
            // Stats
            crate::models::stats::TourStats,
            crate::models::stats::GuideStats,
            // Tours
            crate::models::tour::Tour,
            crate::models::tour::Passenger,
            crate::models::tour::TourWithPassengers,
            crate::models::tour::AssignGuide,
            crate::models::tour::TourPaxSummary,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "guides", description = "Guide account management"),
        (name = "records", description = "Passenger records, imports and exports"),
        (name = "checkin", description = "Passenger check-in"),
        (name = "stats", description = "Statistics"),
        (name = "tours", description = "Tour-guide directory and tour lists")
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
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("access_token"))),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
