//! Repository layer for database operations

pub mod archive;
pub mod records;
pub mod tours;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub records: records::RecordsRepository,
    pub archive: archive::ArchiveRepository,
    pub tours: tours::ToursRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            records: records::RecordsRepository::new(pool.clone()),
            archive: archive::ArchiveRepository::new(pool.clone()),
            tours: tours::ToursRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}
