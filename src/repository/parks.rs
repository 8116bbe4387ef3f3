//! Park catalog repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::ParkStore;
use crate::{
    error::AppResult,
    models::{Park, ParkFilter},
};

#[derive(Clone)]
pub struct PgParkStore {
    pool: Pool<Postgres>,
}

impl PgParkStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParkStore for PgParkStore {
    async fn list(&self, filter: ParkFilter) -> AppResult<Vec<Park>> {
        let where_clause = match filter {
            ParkFilter::MapReady => "WHERE latitude IS NOT NULL AND longitude IS NOT NULL",
            ParkFilter::All => "",
        };

        let query = format!("SELECT * FROM parks {} ORDER BY name", where_clause);

        let rows = sqlx::query_as::<_, Park>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
