//! Business logic services

pub mod auth;
pub mod checkin;
pub mod identity;
pub mod imports;
pub mod records;
pub mod stats;
pub mod tours;

use std::sync::Arc;

use crate::{config::AuthConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub imports: imports::ImportService,
    pub checkin: checkin::CheckInService,
    pub records: records::RecordsService,
    pub tours: tours::ToursService,
    pub stats: stats::StatsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        let identity = Arc::new(identity::PgIdentityProvider::new(repository.users.clone()));

        Self {
            auth: auth::AuthService::new(identity, auth_config),
            imports: imports::ImportService::new(repository.clone()),
            checkin: checkin::CheckInService::new(repository.clone()),
            records: records::RecordsService::new(repository.clone()),
            tours: tours::ToursService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            repository,
        }
    }

    /// Round trip to the database for readiness probes
    pub async fn ping_database(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.repository.pool).await?;
        Ok(())
    }
}
