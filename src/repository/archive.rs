//! Archive repository (read side; rows are written by `RecordsRepository::archive_all`)

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::archive_record::{ArchivePassengerRecord, ArchivePassengerRecordRow, ArchiveQuery},
};

#[derive(Clone)]
pub struct ArchiveRepository {
    pool: Pool<Postgres>,
}

impl ArchiveRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List archived records, newest archive first
    pub async fn list(&self, query: &ArchiveQuery) -> AppResult<Vec<ArchivePassengerRecord>> {
        let rows = sqlx::query_as::<_, ArchivePassengerRecordRow>(
            r#"
            SELECT * FROM archive_passenger_records
            WHERE ($1::text IS NULL OR strpos(tour_type, $1) > 0)
              AND ($2::timestamptz IS NULL OR archived_at >= $2)
              AND ($3::timestamptz IS NULL OR archived_at <= $3)
            ORDER BY archived_at DESC, tour_date, id
            "#,
        )
        .bind(query.tour_type.as_deref())
        .bind(query.from)
        .bind(query.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ArchivePassengerRecord::from).collect())
    }
}
