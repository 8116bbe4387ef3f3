//! Derived per-park display state and progress views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Display state of a park for one user, recomputed on every request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ParkDisplayState {
    Visited,
    NotVisited,
    BucketList,
}

impl ParkDisplayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParkDisplayState::Visited => "visited",
            ParkDisplayState::NotVisited => "notVisited",
            ParkDisplayState::BucketList => "bucketList",
        }
    }

    /// Human readable label, as shown in the map legend
    pub fn label(&self) -> &'static str {
        match self {
            ParkDisplayState::Visited => "Visited Parks",
            ParkDisplayState::NotVisited => "Not Visited",
            ParkDisplayState::BucketList => "Bucket List",
        }
    }
}

impl std::fmt::Display for ParkDisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reconciled status of a single park
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ParkStatus {
    pub state: ParkDisplayState,
    /// Date of the completed visit, only for visited parks
    pub visited_date: Option<DateTime<Utc>>,
}

/// Aggregate progress counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Summary {
    /// Parks in the catalog
    pub total: usize,
    /// Completed visits (bucket-list entries never count)
    pub visited: usize,
    pub bucket_list: usize,
    /// `total - visited`
    pub unvisited: usize,
    /// Visited share of the catalog, rounded to a whole percent
    pub percent_complete: u8,
}

/// Park joined with the caller's status
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParkWithStatus {
    pub park_code: String,
    pub name: String,
    pub status: ParkDisplayState,
    pub visited_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// "My Visits" page: counters plus the catalog grouped by status
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProgressView {
    pub summary: Summary,
    /// Most recent visit first
    pub visited: Vec<ParkWithStatus>,
    /// Alphabetical
    pub bucket_list: Vec<ParkWithStatus>,
    /// Alphabetical
    pub not_visited: Vec<ParkWithStatus>,
}
