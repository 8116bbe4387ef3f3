//! Business logic services

pub mod dashboard;
pub mod map;
pub mod parks;
pub mod reconcile;
pub mod visits;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub parks: parks::ParksService,
    pub visits: visits::VisitsService,
    pub dashboard: dashboard::DashboardService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            parks: parks::ParksService::new(repository.clone()),
            visits: visits::VisitsService::new(repository.clone()),
            dashboard: dashboard::DashboardService::new(repository),
        }
    }
}
