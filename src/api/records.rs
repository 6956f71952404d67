//! Passenger records API endpoints: import, listing, check-in and export

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::Multipart;
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        archive_record::{ArchivePassengerRecord, ArchiveQuery},
        import_report::ImportReport,
        passenger_record::{
            CheckInByReference, CreatePassengerRecord, PassengerRecord, RecordQuery, RemoveRecord,
            UpdatePax,
        },
    },
    AppState,
};

use super::AuthenticatedUser;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Multipart upload body (OpenAPI only)
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImportUpload {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Kiosk check-in result
#[derive(Serialize, ToSchema)]
pub struct CheckInResponse {
    pub message: String,
    pub passenger: PassengerRecord,
}

/// Replace the active passenger set with the uploaded workbook
#[utoipa::path(
    post,
    path = "/records/import-excel",
    tag = "records",
    security(("bearer_auth" = [])),
    request_body(content = ImportUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Import finished, row failures listed in errors", body = ImportReport),
        (status = 400, description = "Missing file or unreadable workbook", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn import_excel(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    mut multipart: Multipart,
) -> AppResult<Json<ImportReport>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
            upload = Some(bytes.to_vec());
            break;
        }
    }

    let bytes = upload.unwrap_or_default();
    tracing::info!(user_id = claims.user_id, bytes = bytes.len(), "Workbook uploaded");

    let report = state.services.imports.import_workbook(bytes).await?;
    Ok(Json(report))
}

/// List active passenger records
#[utoipa::path(
    get,
    path = "/records",
    tag = "records",
    security(("bearer_auth" = [])),
    params(RecordQuery),
    responses(
        (status = 200, description = "Records ordered by tour date", body = Vec<PassengerRecord>)
    )
)]
pub async fn list_records(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<RecordQuery>,
) -> AppResult<Json<Vec<PassengerRecord>>> {
    let records = state.services.records.list(query.tour_type.as_deref()).await?;
    Ok(Json(records))
}

/// Create a passenger record by hand
#[utoipa::path(
    post,
    path = "/records/create",
    tag = "records",
    security(("bearer_auth" = [])),
    request_body = CreatePassengerRecord,
    responses(
        (status = 201, description = "Record created", body = PassengerRecord),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_record(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(data): Json<CreatePassengerRecord>,
) -> AppResult<(StatusCode, Json<PassengerRecord>)> {
    let record = state.services.records.create(data).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Remove a passenger record
#[utoipa::path(
    post,
    path = "/records/remove",
    tag = "records",
    security(("bearer_auth" = [])),
    request_body = RemoveRecord,
    responses(
        (status = 200, description = "Record removed", body = String, content_type = "text/plain"),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_record(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<RemoveRecord>,
) -> AppResult<&'static str> {
    state.services.records.remove(request.id).await?;
    Ok("Record removed")
}

/// Check a passenger in
#[utoipa::path(
    post,
    path = "/records/{id}/checkin",
    tag = "checkin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Checked in", body = String, content_type = "text/plain"),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn check_in(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<&'static str> {
    state.services.checkin.check_in(id, claims.attributor()).await?;
    Ok("Checked in")
}

/// Undo a check-in
#[utoipa::path(
    post,
    path = "/records/{id}/remove-checkin",
    tag = "checkin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Check-in removed", body = String, content_type = "text/plain"),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_check_in(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<&'static str> {
    state.services.checkin.remove_check_in(id).await?;
    Ok("Check-in removed")
}

/// Check a passenger in by booking reference
#[utoipa::path(
    post,
    path = "/records/checkin-unique",
    tag = "checkin",
    security(("bearer_auth" = [])),
    request_body = CheckInByReference,
    responses(
        (status = 200, description = "Checked in", body = CheckInResponse),
        (status = 400, description = "Missing reference", body = crate::error::ErrorResponse),
        (status = 404, description = "No booking with that reference", body = crate::error::ErrorResponse),
        (status = 409, description = "Booking belongs to another tour", body = crate::error::ErrorResponse)
    )
)]
pub async fn check_in_by_reference(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CheckInByReference>,
) -> AppResult<Json<CheckInResponse>> {
    let passenger = state
        .services
        .checkin
        .check_in_by_reference(&request, claims.attributor())
        .await?;

    Ok(Json(CheckInResponse {
        message: "Checked in successfully.".to_string(),
        passenger,
    }))
}

/// Correct the party size of a record
#[utoipa::path(
    put,
    path = "/records/{id}/pax",
    tag = "checkin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Record ID")),
    request_body = UpdatePax,
    responses(
        (status = 200, description = "Pax updated", body = String, content_type = "text/plain"),
        (status = 400, description = "Negative pax", body = crate::error::ErrorResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_pax(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePax>,
) -> AppResult<&'static str> {
    request.validate()?;
    state.services.checkin.update_pax(id, request.pax).await?;
    Ok("Pax updated")
}

/// Query archived records
#[utoipa::path(
    get,
    path = "/records/archive",
    tag = "records",
    security(("bearer_auth" = [])),
    params(ArchiveQuery),
    responses(
        (status = 200, description = "Archived records, newest first", body = Vec<ArchivePassengerRecord>)
    )
)]
pub async fn list_archive(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ArchiveQuery>,
) -> AppResult<Json<Vec<ArchivePassengerRecord>>> {
    let records = state.services.records.list_archive(&query).await?;
    Ok(Json(records))
}

/// Download the passenger manifest workbook
#[utoipa::path(
    get,
    path = "/records/download-today",
    tag = "records",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Manifest workbook", body = String, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 404, description = "No records to export", body = crate::error::ErrorResponse)
    )
)]
pub async fn download_today(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<impl IntoResponse> {
    let manifest = state.services.records.export_manifest().await?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", manifest.filename),
            ),
        ],
        manifest.content,
    ))
}
