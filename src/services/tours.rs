//! Tour-guide directory and legacy tour listings

use std::collections::HashMap;

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::tour::{Passenger, Tour, TourPaxSummary, TourWithPassengers},
    repository::Repository,
};

/// Tour type → guide lookup built from the directory rows.
///
/// Keys are trimmed and lowercased. When several rows share a tour type the
/// first one (lowest id) wins.
#[derive(Debug, Default, Clone)]
pub struct GuideDirectory {
    guides: HashMap<String, Option<String>>,
}

impl GuideDirectory {
    pub fn from_tours(tours: &[Tour]) -> Self {
        let mut guides = HashMap::new();
        for tour in tours {
            guides
                .entry(normalize_tour_type(&tour.tour_type))
                .or_insert_with(|| tour.guide_name.clone());
        }
        Self { guides }
    }

    /// Assigned guide for a tour type, if the type is known and has one
    pub fn guide_for(&self, tour_type: &str) -> Option<&str> {
        self.guides
            .get(&normalize_tour_type(tour_type))
            .and_then(|guide| guide.as_deref())
    }
}

fn normalize_tour_type(tour_type: &str) -> String {
    tour_type.trim().to_lowercase()
}

#[derive(Clone)]
pub struct ToursService {
    repository: Repository,
}

impl ToursService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn directory(&self) -> AppResult<GuideDirectory> {
        let tours = self.repository.tours.list().await?;
        Ok(GuideDirectory::from_tours(&tours))
    }

    /// Set the guide of a tour type, creating the directory entry when the
    /// type is unknown. A blank guide name clears the assignment.
    pub async fn assign_guide(&self, tour_type: &str, guide_name: Option<&str>) -> AppResult<Tour> {
        let tour_type = tour_type.trim();
        if tour_type.is_empty() {
            return Err(AppError::Validation("tourType is required.".to_string()));
        }
        let guide_name = guide_name.map(str::trim).filter(|name| !name.is_empty());

        let mut tx = self.repository.pool.begin().await?;

        let tour = match self
            .repository
            .tours
            .find_directory_entry_for_update(&mut tx, tour_type)
            .await?
        {
            Some(existing) => {
                self.repository
                    .tours
                    .update_guide(&mut tx, existing.id, guide_name)
                    .await?
            }
            None => {
                self.repository
                    .tours
                    .create(&mut tx, Utc::now(), tour_type, tour_type, guide_name)
                    .await?
            }
        };

        tx.commit().await?;

        tracing::info!(tour_id = tour.id, tour_type, guide = ?guide_name, "Guide assigned");
        Ok(tour)
    }

    /// Pax totals of the active set per tour type, with the assigned guide
    pub async fn pax_summary(&self) -> AppResult<Vec<TourPaxSummary>> {
        let totals = self.repository.records.pax_by_tour_type().await?;
        let directory = self.directory().await?;

        Ok(totals
            .into_iter()
            .map(|(tour_type, total_pax, record_count)| TourPaxSummary {
                guide_name: directory.guide_for(&tour_type).map(str::to_string),
                tour_type,
                total_pax,
                record_count,
            })
            .collect())
    }

    /// Every tour with its legacy passenger list
    pub async fn list_with_passengers(&self) -> AppResult<Vec<TourWithPassengers>> {
        let tours = self.repository.tours.list().await?;
        let ids: Vec<i32> = tours.iter().map(|t| t.id).collect();
        let mut by_tour: HashMap<i32, Vec<Passenger>> = HashMap::new();
        for passenger in self.repository.tours.passengers_for(&ids).await? {
            by_tour.entry(passenger.tour_id).or_default().push(passenger);
        }

        Ok(tours
            .into_iter()
            .map(|tour| TourWithPassengers {
                passengers: by_tour.remove(&tour.id).unwrap_or_default(),
                tour,
            })
            .collect())
    }

    pub async fn get_with_passengers(&self, id: i32) -> AppResult<TourWithPassengers> {
        let tour = self.repository.tours.get_by_id(id).await?;
        let passengers = self.repository.tours.passengers_for(&[id]).await?;
        Ok(TourWithPassengers { tour, passengers })
    }
}
