//! Park catalog service

use crate::{
    error::AppResult,
    models::{Park, ParkFilter},
    repository::Repository,
};

#[derive(Clone)]
pub struct ParksService {
    repository: Repository,
}

impl ParksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Catalog parks, ordered by name
    pub async fn list(&self, filter: ParkFilter) -> AppResult<Vec<Park>> {
        self.repository.parks.list(filter).await
    }

    /// Storage readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.parks.ping().await
    }
}
