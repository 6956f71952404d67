//! Passenger records service: listing, manual edits, archive and manifest export

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        archive_record::{ArchivePassengerRecord, ArchiveQuery},
        passenger_record::{CreatePassengerRecord, NewPassengerRecord, PassengerRecord},
    },
    repository::Repository,
    spreadsheet::render_manifest,
};

/// Generated manifest workbook
#[derive(Debug)]
pub struct ManifestFile {
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Clone)]
pub struct RecordsService {
    repository: Repository,
}

impl RecordsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, tour_type: Option<&str>) -> AppResult<Vec<PassengerRecord>> {
        let filter = tour_type.filter(|t| !t.is_empty());
        self.repository.records.list(filter).await
    }

    pub async fn create(&self, data: CreatePassengerRecord) -> AppResult<PassengerRecord> {
        data.validate()?;
        let record = NewPassengerRecord::from(data);
        if record.tour_type.is_empty() {
            return Err(AppError::Validation("tourType: Tour type is required".to_string()));
        }

        let created = self.repository.records.create(&record).await?;
        tracing::info!(record_id = created.id, tour_type = %created.tour_type, "Passenger record created");
        Ok(created)
    }

    pub async fn remove(&self, id: i32) -> AppResult<()> {
        self.repository.records.delete(id).await?;
        tracing::info!(record_id = id, "Passenger record removed");
        Ok(())
    }

    /// Archived records, newest archive batch first
    pub async fn list_archive(&self, query: &ArchiveQuery) -> AppResult<Vec<ArchivePassengerRecord>> {
        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from > to {
                return Err(AppError::BadRequest(
                    "'from' must not be after 'to'".to_string(),
                ));
            }
        }
        self.repository.archive.list(query).await
    }

    /// Render the active set as a manifest workbook, one block per tour type
    pub async fn export_manifest(&self) -> AppResult<ManifestFile> {
        let records = self.repository.records.list_for_report().await?;
        if records.is_empty() {
            return Err(AppError::NotFound(
                "No passenger records to export".to_string(),
            ));
        }

        let count = records.len();
        let content = tokio::task::spawn_blocking(move || render_manifest(&records))
            .await
            .map_err(|e| AppError::Internal(format!("Manifest writer task failed: {}", e)))??;

        let filename = format!("TodayReport_{}.xlsx", Utc::now().format("%Y%m%d"));
        tracing::info!(records = count, bytes = content.len(), %filename, "Manifest exported");

        Ok(ManifestFile { filename, content })
    }
}
