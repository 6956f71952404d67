//! Passenger records repository

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgExecutor, PgConnection, Pool, Postgres, QueryBuilder, Row};

use crate::{
    error::{AppError, AppResult},
    models::passenger_record::{
        CheckInStatus, NewPassengerRecord, PassengerRecord, PassengerRecordRow,
    },
};

/// Rows per multi-row INSERT, well below the bind parameter limit
const INSERT_CHUNK: usize = 500;

/// Advisory lock key serializing imports
const IMPORT_LOCK_KEY: i64 = 0x7469_636b_6d79;

#[derive(Clone)]
pub struct RecordsRepository {
    pool: Pool<Postgres>,
}

impl RecordsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List active records ordered by tour date, with optional substring
    /// filter on tour type
    pub async fn list(&self, tour_type: Option<&str>) -> AppResult<Vec<PassengerRecord>> {
        let rows = sqlx::query_as::<_, PassengerRecordRow>(
            r#"
            SELECT * FROM passenger_records
            WHERE ($1::text IS NULL OR strpos(tour_type, $1) > 0)
            ORDER BY tour_date, id
            "#,
        )
        .bind(tour_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PassengerRecord::from).collect())
    }

    /// All active records ordered for the manifest export
    pub async fn list_for_report(&self) -> AppResult<Vec<PassengerRecord>> {
        let rows = sqlx::query_as::<_, PassengerRecordRow>(
            "SELECT * FROM passenger_records ORDER BY tour_type, tour_date, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PassengerRecord::from).collect())
    }

    /// Active records whose tour started before `now`
    pub async fn list_completed(&self, now: DateTime<Utc>) -> AppResult<Vec<PassengerRecord>> {
        let rows = sqlx::query_as::<_, PassengerRecordRow>(
            "SELECT * FROM passenger_records WHERE tour_date < $1 ORDER BY tour_date, id",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PassengerRecord::from).collect())
    }

    /// First record (lowest id) carrying the unique reference, locked for update
    pub async fn find_by_unique_reference_for_update(
        &self,
        conn: &mut PgConnection,
        unique_reference: &str,
    ) -> AppResult<Option<PassengerRecord>> {
        let row = sqlx::query_as::<_, PassengerRecordRow>(
            r#"
            SELECT * FROM passenger_records
            WHERE unique_reference = $1
            ORDER BY id
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(unique_reference)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(PassengerRecord::from))
    }

    /// Insert a single record; `original_pax` snapshots `pax`
    pub async fn create(&self, record: &NewPassengerRecord) -> AppResult<PassengerRecord> {
        let row = sqlx::query_as::<_, PassengerRecordRow>(
            r#"
            INSERT INTO passenger_records (
                tour_date, tour_type, seats, surname, first_name, pax, original_pax,
                notes, email_address, unique_reference, phone_number
            )
            VALUES ($1, $2, $3, $4, $5, $6, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(record.tour_date)
        .bind(&record.tour_type)
        .bind(&record.seats)
        .bind(&record.surname)
        .bind(&record.first_name)
        .bind(record.pax)
        .bind(&record.notes)
        .bind(&record.email_address)
        .bind(&record.unique_reference)
        .bind(&record.phone_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Bulk insert freshly imported records (not checked in)
    pub async fn insert_batch(
        &self,
        conn: &mut PgConnection,
        records: &[NewPassengerRecord],
    ) -> AppResult<u64> {
        let mut inserted = 0;

        for chunk in records.chunks(INSERT_CHUNK) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO passenger_records (tour_date, tour_type, seats, surname, first_name, \
                 pax, original_pax, notes, email_address, unique_reference, phone_number) ",
            );
            builder.push_values(chunk, |mut b, record| {
                b.push_bind(record.tour_date)
                    .push_bind(record.tour_type.clone())
                    .push_bind(record.seats.clone())
                    .push_bind(record.surname.clone())
                    .push_bind(record.first_name.clone())
                    .push_bind(record.pax)
                    .push_bind(record.pax)
                    .push_bind(record.notes.clone())
                    .push_bind(record.email_address.clone())
                    .push_bind(record.unique_reference.clone())
                    .push_bind(record.phone_number.clone());
            });

            inserted += builder.build().execute(&mut *conn).await?.rows_affected();
        }

        Ok(inserted)
    }

    /// Wait for any other import to finish. Held until the transaction ends.
    pub async fn lock_for_import(&self, conn: &mut PgConnection) -> AppResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(IMPORT_LOCK_KEY)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Move every active record into the archive, stamped with `archived_at`.
    /// Returns the number of archived records.
    pub async fn archive_all(
        &self,
        conn: &mut PgConnection,
        archived_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            WITH moved AS (
                DELETE FROM passenger_records RETURNING *
            )
            INSERT INTO archive_passenger_records (
                archived_at, tour_date, tour_type, seats, surname, first_name, pax,
                original_pax, notes, email_address, unique_reference, phone_number,
                checked_in, checked_in_by
            )
            SELECT $1, tour_date, tour_type, seats, surname, first_name, pax,
                   original_pax, notes, email_address, unique_reference, phone_number,
                   checked_in, checked_in_by
            FROM moved
            "#,
        )
        .bind(archived_at)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Write the check-in state of one record. Checking in a record that is
    /// already checked in keeps the first attributor.
    pub async fn update_check_in<'c>(
        &self,
        executor: impl PgExecutor<'c>,
        id: i32,
        status: &CheckInStatus,
    ) -> AppResult<Option<PassengerRecord>> {
        let (checked_in, checked_in_by) = status.columns();

        let row = sqlx::query_as::<_, PassengerRecordRow>(
            r#"
            UPDATE passenger_records
            SET checked_in_by = CASE WHEN checked_in AND $2 THEN checked_in_by ELSE $3 END,
                checked_in = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(checked_in)
        .bind(checked_in_by)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(PassengerRecord::from))
    }

    /// Same as [`Self::update_check_in`] against the pool
    pub async fn set_check_in(
        &self,
        id: i32,
        status: &CheckInStatus,
    ) -> AppResult<Option<PassengerRecord>> {
        self.update_check_in(&self.pool, id, status).await
    }

    /// Overwrite the party size; `original_pax` is left alone
    pub async fn update_pax(&self, id: i32, pax: i32) -> AppResult<()> {
        let result = sqlx::query("UPDATE passenger_records SET pax = $2 WHERE id = $1")
            .bind(id)
            .bind(pax)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Passenger record with id {} not found",
                id
            )));
        }
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM passenger_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Passenger record with id {} not found",
                id
            )));
        }
        Ok(())
    }

    /// (tour type, pax sum, record count) for each tour type of the active set
    pub async fn pax_by_tour_type(&self) -> AppResult<Vec<(String, i64, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT tour_type,
                   COALESCE(SUM(pax), 0)::bigint AS total_pax,
                   COUNT(*) AS record_count
            FROM passenger_records
            GROUP BY tour_type
            ORDER BY tour_type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    row.get::<String, _>("tour_type"),
                    row.get::<i64, _>("total_pax"),
                    row.get::<i64, _>("record_count"),
                )
            })
            .collect())
    }
}
