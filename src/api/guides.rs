//! Guide account management endpoints (administrators only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::user::{CreateGuide, GuideSummary, UpdateGuide},
    AppState,
};

use super::AuthenticatedUser;

/// List guide accounts
#[utoipa::path(
    get,
    path = "/guides",
    tag = "guides",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Guide accounts", body = Vec<GuideSummary>),
        (status = 403, description = "Administrators only", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_guides(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<GuideSummary>>> {
    claims.require_admin()?;
    let guides = state.services.auth.list_guides().await?;
    Ok(Json(guides))
}

/// Create a guide account
#[utoipa::path(
    post,
    path = "/guides",
    tag = "guides",
    security(("bearer_auth" = [])),
    request_body = CreateGuide,
    responses(
        (status = 201, description = "Guide created", body = GuideSummary),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_guide(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateGuide>,
) -> AppResult<(StatusCode, Json<GuideSummary>)> {
    claims.require_admin()?;
    let guide = state.services.auth.create_guide(data).await?;
    Ok((StatusCode::CREATED, Json(guide)))
}

/// Update a guide account
#[utoipa::path(
    put,
    path = "/guides/{id}",
    tag = "guides",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Guide ID")),
    request_body = UpdateGuide,
    responses(
        (status = 200, description = "Guide updated", body = GuideSummary),
        (status = 404, description = "Guide not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_guide(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateGuide>,
) -> AppResult<Json<GuideSummary>> {
    claims.require_admin()?;
    let guide = state.services.auth.update_guide(id, data).await?;
    Ok(Json(guide))
}

/// Delete a guide account
#[utoipa::path(
    delete,
    path = "/guides/{id}",
    tag = "guides",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Guide ID")),
    responses(
        (status = 204, description = "Guide deleted"),
        (status = 404, description = "Guide not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_guide(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.auth.delete_guide(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
