//! Visit ledger repository

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres};

use super::VisitStore;
use crate::{
    error::{AppError, AppResult},
    models::{UpsertOutcome, UpsertResult, Visit, VisitWrite},
};

/// Postgres foreign key violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct PgVisitStore {
    pool: Pool<Postgres>,
}

#[derive(FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    visit: Visit,
    outcome: UpsertOutcome,
}

impl From<UpsertRow> for UpsertResult {
    fn from(row: UpsertRow) -> Self {
        Self {
            visit: row.visit,
            outcome: row.outcome,
        }
    }
}

impl PgVisitStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn get(&self, user_id: &str, park_code: &str) -> AppResult<Option<Visit>> {
        let row = sqlx::query_as::<_, Visit>(
            "SELECT * FROM visits WHERE user_id = $1 AND park_code = $2",
        )
        .bind(user_id)
        .bind(park_code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[async_trait]
impl VisitStore for PgVisitStore {
    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Visit>> {
        let rows = sqlx::query_as::<_, Visit>(
            "SELECT * FROM visits WHERE user_id = $1 ORDER BY park_code",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn upsert(&self, user_id: &str, write: &VisitWrite) -> AppResult<UpsertResult> {
        // The conflict arm only fires when the bucket-list flag changes, so a
        // repeated request leaves the row (and its visit date) untouched and
        // the second SELECT hands back the existing row.
        let row = sqlx::query_as::<_, UpsertRow>(
            r#"
            WITH upserted AS (
                INSERT INTO visits (user_id, park_code, visited_date, is_bucket_list)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, park_code) DO UPDATE
                    SET visited_date = EXCLUDED.visited_date,
                        is_bucket_list = EXCLUDED.is_bucket_list,
                        updated_at = NOW()
                    WHERE visits.is_bucket_list IS DISTINCT FROM EXCLUDED.is_bucket_list
                RETURNING visits.*,
                    CASE WHEN xmax = 0 THEN 'created' ELSE 'transitioned' END AS outcome
            )
            SELECT * FROM upserted
            UNION ALL
            SELECT v.*, 'unchanged' AS outcome FROM visits v
            WHERE v.user_id = $1 AND v.park_code = $2
              AND NOT EXISTS (SELECT 1 FROM upserted)
            "#,
        )
        .bind(user_id)
        .bind(&write.park_code)
        .bind(write.visited_date)
        .bind(write.is_bucket_list)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
                AppError::NotFound(format!("Park {} not found", write.park_code))
            }
            _ => AppError::Database(e),
        })?;

        if let Some(row) = row {
            return Ok(row.into());
        }

        // A concurrent writer committed the row after our snapshot was taken
        self.get(user_id, &write.park_code)
            .await?
            .map(|visit| UpsertResult {
                visit,
                outcome: UpsertOutcome::Unchanged,
            })
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Upsert of {} for {} returned no row",
                    write.park_code, user_id
                ))
            })
    }

    async fn delete(&self, user_id: &str, park_code: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM visits WHERE user_id = $1 AND park_code = $2")
            .bind(user_id)
            .bind(park_code)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
