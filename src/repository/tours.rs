//! Tours repository: guide directory rows and legacy passenger lists

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::tour::{Passenger, Tour},
};

#[derive(Clone)]
pub struct ToursRepository {
    pool: Pool<Postgres>,
}

impl ToursRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All tours in id order (first row per tour type wins for guide lookup)
    pub async fn list(&self) -> AppResult<Vec<Tour>> {
        let tours = sqlx::query_as::<_, Tour>("SELECT * FROM tours ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(tours)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Tour> {
        sqlx::query_as::<_, Tour>("SELECT * FROM tours WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tour with id {} not found", id)))
    }

    /// Legacy passengers of the given tours
    pub async fn passengers_for(&self, tour_ids: &[i32]) -> AppResult<Vec<Passenger>> {
        let passengers = sqlx::query_as::<_, Passenger>(
            "SELECT * FROM passengers WHERE tour_id = ANY($1) ORDER BY tour_id, id",
        )
        .bind(tour_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(passengers)
    }

    /// Directory entry for a tour type (trimmed, case-insensitive), locked
    pub async fn find_directory_entry_for_update(
        &self,
        conn: &mut PgConnection,
        tour_type: &str,
    ) -> AppResult<Option<Tour>> {
        let tour = sqlx::query_as::<_, Tour>(
            r#"
            SELECT * FROM tours
            WHERE LOWER(TRIM(tour_type)) = LOWER(TRIM($1))
            ORDER BY id
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(tour_type)
        .fetch_optional(conn)
        .await?;
        Ok(tour)
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        tour_date: DateTime<Utc>,
        tour_type: &str,
        tour_name: &str,
        guide_name: Option<&str>,
    ) -> AppResult<Tour> {
        let tour = sqlx::query_as::<_, Tour>(
            r#"
            INSERT INTO tours (tour_date, tour_type, tour_name, guide_name)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(tour_date)
        .bind(tour_type)
        .bind(tour_name)
        .bind(guide_name)
        .fetch_one(conn)
        .await?;
        Ok(tour)
    }

    pub async fn update_guide(
        &self,
        conn: &mut PgConnection,
        id: i32,
        guide_name: Option<&str>,
    ) -> AppResult<Tour> {
        let tour = sqlx::query_as::<_, Tour>(
            "UPDATE tours SET guide_name = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(guide_name)
        .fetch_one(conn)
        .await?;
        Ok(tour)
    }
}
