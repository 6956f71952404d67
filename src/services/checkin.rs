//! Check-in ledger

use crate::{
    error::{AppError, AppResult},
    models::passenger_record::{CheckInByReference, CheckInStatus, PassengerRecord},
    repository::Repository,
};

#[derive(Clone)]
pub struct CheckInService {
    repository: Repository,
}

impl CheckInService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Check a record in by id. A record that is already checked in keeps its
    /// original attributor.
    pub async fn check_in(&self, id: i32, attributor: &str) -> AppResult<PassengerRecord> {
        let status = CheckInStatus::checked_in_by(Some(attributor));
        let record = self
            .repository
            .records
            .set_check_in(id, &status)
            .await?
            .ok_or_else(|| record_not_found(id))?;

        tracing::info!(record_id = id, by = ?record.check_in.attributor(), "Passenger checked in");
        Ok(record)
    }

    /// Undo a check-in; flag and attributor are cleared together
    pub async fn remove_check_in(&self, id: i32) -> AppResult<PassengerRecord> {
        let record = self
            .repository
            .records
            .set_check_in(id, &CheckInStatus::NotCheckedIn)
            .await?
            .ok_or_else(|| record_not_found(id))?;

        tracing::info!(record_id = id, "Check-in removed");
        Ok(record)
    }

    /// Kiosk check-in by booking reference.
    ///
    /// When the station's tour type is given it must match the booking's tour
    /// type (case-insensitive), otherwise nothing is written.
    pub async fn check_in_by_reference(
        &self,
        request: &CheckInByReference,
        attributor: &str,
    ) -> AppResult<PassengerRecord> {
        if request.unique_ref.trim().is_empty() {
            return Err(AppError::Validation("UniqueRef is required.".to_string()));
        }

        let mut tx = self.repository.pool.begin().await?;

        let record = self
            .repository
            .records
            .find_by_unique_reference_for_update(&mut tx, &request.unique_ref)
            .await?
            .ok_or_else(|| AppError::NotFound("Passenger not found.".to_string()))?;

        if let Some(expected) = request
            .tour_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            if !tour_types_match(expected, &record.tour_type) {
                tracing::warn!(
                    record_id = record.id,
                    expected,
                    actual = %record.tour_type,
                    "Check-in refused at wrong tour"
                );
                return Err(AppError::TourTypeMismatch(format!(
                    "Passenger {} is booked on tour '{}', not '{}'.",
                    record.display_name(),
                    record.tour_type,
                    expected
                )));
            }
        }

        let status = CheckInStatus::checked_in_by(Some(attributor));
        let updated = self
            .repository
            .records
            .update_check_in(&mut *tx, record.id, &status)
            .await?
            .ok_or_else(|| record_not_found(record.id))?;

        tx.commit().await?;

        tracing::info!(record_id = updated.id, by = ?updated.check_in.attributor(), "Passenger checked in by reference");
        Ok(updated)
    }

    /// Correct the party size; `original_pax` keeps the imported value
    pub async fn update_pax(&self, id: i32, pax: i32) -> AppResult<()> {
        if pax < 0 {
            return Err(AppError::Validation("pax: Pax cannot be negative".to_string()));
        }
        self.repository.records.update_pax(id, pax).await?;
        tracing::info!(record_id = id, pax, "Pax corrected");
        Ok(())
    }
}

/// Case-insensitive tour type comparison, ignoring surrounding whitespace
pub fn tour_types_match(expected: &str, actual: &str) -> bool {
    expected.trim().to_lowercase() == actual.trim().to_lowercase()
}

fn record_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Passenger record with id {} not found", id))
}
