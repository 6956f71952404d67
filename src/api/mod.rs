//! API handlers for TickMyPax REST endpoints

pub mod auth;
pub mod guides;
pub mod health;
pub mod openapi;
pub mod records;
pub mod stats;
pub mod tours;

use axum::{
    async_trait,
    extract::{DefaultBodyLimit, FromRequestParts},
    http::{header, request::Parts, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization, HeaderMapExt},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::CorsConfig, error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token.
///
/// The token is taken from the session cookie, or else from an
/// `Authorization: Bearer` header.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(parts, &state.config.auth.cookie_name)
            .ok_or_else(|| AppError::Authentication("Missing authentication token".to_string()))?;

        let claims = UserClaims::from_token(&token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

fn session_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(cookie_name).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_string());
    }

    parts
        .headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);
    let max_upload = state.config.import.max_upload_bytes;

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/change-password", post(auth::change_password))
        // Guide accounts
        .route("/guides", get(guides::list_guides).post(guides::create_guide))
        .route("/guides/:id", put(guides::update_guide).delete(guides::delete_guide))
        // Passenger records
        .route("/records", get(records::list_records))
        .route("/records/create", post(records::create_record))
        .route("/records/remove", post(records::remove_record))
        .route(
            "/records/import-excel",
            post(records::import_excel).layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/records/archive", get(records::list_archive))
        .route("/records/download-today", get(records::download_today))
        .route("/records/stats", get(stats::completed_tour_stats))
        .route("/records/checkin-unique", post(records::check_in_by_reference))
        .route("/records/:id/checkin", post(records::check_in))
        .route("/records/:id/remove-checkin", post(records::remove_check_in))
        .route("/records/:id/pax", put(records::update_pax))
        // Tours
        .route("/tours/guide", put(tours::assign_guide))
        .route("/tours/allTours", get(tours::all_tours))
        .route("/tours/Today", get(tours::todays_tours))
        .route("/tours/:id", get(tours::get_tour))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

/// Credentialed CORS for the configured origins, anonymous CORS otherwise
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
