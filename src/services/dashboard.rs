//! Progress and map views for the signed-in user

use crate::{
    config::MapConfig,
    error::AppResult,
    models::{MapView, ParkFilter, ProgressView},
    repository::Repository,
    services::{
        map::build_map,
        reconcile::{build_progress, reconcile},
    },
};

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Whole catalog grouped by the caller's status
    pub async fn progress(&self, user_id: &str) -> AppResult<ProgressView> {
        let (parks, visits) = tokio::try_join!(
            self.repository.parks.list(ParkFilter::All),
            self.repository.visits.list_for_user(user_id),
        )?;
        let reconciliation = reconcile(&parks, &visits);
        Ok(build_progress(&parks, &reconciliation))
    }

    /// Markers for every map-ready park; counters cover the map-ready catalog
    pub async fn map(&self, user_id: &str, config: &MapConfig) -> AppResult<MapView> {
        let (parks, visits) = tokio::try_join!(
            self.repository.parks.list(ParkFilter::MapReady),
            self.repository.visits.list_for_user(user_id),
        )?;
        let reconciliation = reconcile(&parks, &visits);
        Ok(build_map(&parks, &reconciliation, config))
    }
}
