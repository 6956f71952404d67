//! Spreadsheet import service
//!
//! Every import replaces the active passenger set. The previous set is moved
//! to the archive first, even when the uploaded workbook turns out to be
//! unreadable, so the caller must re-import a good file after a failed
//! upload. Archive, delete and insert happen in one transaction: readers see
//! either the old set or the new one. Concurrent imports run one after the
//! other.

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::import_report::ImportReport,
    repository::Repository,
    spreadsheet::{parse_booking_rows, read_first_sheet},
};

#[derive(Clone)]
pub struct ImportService {
    repository: Repository,
}

impl ImportService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Archive the active set and import the workbook's first sheet
    pub async fn import_workbook(&self, bytes: Vec<u8>) -> AppResult<ImportReport> {
        if bytes.is_empty() {
            return Err(AppError::Validation("No file provided.".to_string()));
        }

        let size = bytes.len();
        let parsed = tokio::task::spawn_blocking(move || {
            read_first_sheet(bytes).map(|rows| parse_booking_rows(&rows))
        })
        .await
        .map_err(|e| AppError::Internal(format!("Workbook reader task failed: {}", e)))?;

        let mut tx = self.repository.pool.begin().await?;
        self.repository.records.lock_for_import(&mut tx).await?;

        let archived = self
            .repository
            .records
            .archive_all(&mut tx, Utc::now())
            .await?;

        let parsed = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                // The archive+delete stands even though nothing can be imported
                tx.commit().await?;
                tracing::warn!(archived, size, "Import rejected after archiving: {}", e);
                return Err(e);
            }
        };

        let imported = self
            .repository
            .records
            .insert_batch(&mut tx, &parsed.records)
            .await?;

        tx.commit().await?;

        tracing::info!(
            archived,
            total_rows = parsed.total_rows,
            imported,
            failed_rows = parsed.errors.len(),
            "Passenger records imported"
        );

        Ok(ImportReport {
            message: "Import successful".to_string(),
            total_rows_processed: parsed.total_rows,
            rows_imported: imported as usize,
            archived_records: archived,
            errors: parsed.errors,
        })
    }
}
