//! Repository layer for database operations

pub mod memory;
pub mod parks;
pub mod visits;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Park, ParkFilter, UpsertResult, Visit, VisitWrite},
};

/// Read access to the park catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParkStore: Send + Sync {
    /// Parks matching `filter`, ordered by name
    async fn list(&self, filter: ParkFilter) -> AppResult<Vec<Park>>;

    /// Check that the backing storage answers
    async fn ping(&self) -> AppResult<()>;
}

/// Per-user visit ledger
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitStore: Send + Sync {
    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Visit>>;

    /// Insert, transition or keep the (user, park) row in one atomic step
    async fn upsert(&self, user_id: &str, write: &VisitWrite) -> AppResult<UpsertResult>;

    /// Returns whether a row was removed
    async fn delete(&self, user_id: &str, park_code: &str) -> AppResult<bool>;
}

/// Main repository struct holding the storage backends
#[derive(Clone)]
pub struct Repository {
    pub parks: Arc<dyn ParkStore>,
    pub visits: Arc<dyn VisitStore>,
}

impl Repository {
    pub fn new(parks: Arc<dyn ParkStore>, visits: Arc<dyn VisitStore>) -> Self {
        Self { parks, visits }
    }

    /// Create a new repository with the given database pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            parks: Arc::new(parks::PgParkStore::new(pool.clone())),
            visits: Arc::new(visits::PgVisitStore::new(pool)),
        }
    }

    /// Repository over an in-memory catalog and ledger
    pub fn in_memory(parks: Vec<Park>) -> Self {
        let store = Arc::new(memory::MemoryStore::new(parks));
        Self {
            parks: store.clone(),
            visits: store,
        }
    }
}
