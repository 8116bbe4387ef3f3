//! Park catalog model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Park catalog row, seeded externally and never mutated by the server
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Park {
    pub id: i32,
    /// Unique park code (e.g. "ZION")
    pub park_code: String,
    pub name: String,
    /// State association (e.g. "UT" or "CA,NV")
    pub states: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Park {
    /// Map position, if both coordinates are known
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Park as exposed by `GET /parks`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParkShort {
    pub park_code: String,
    pub name: String,
    pub states: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
}

impl From<Park> for ParkShort {
    fn from(park: Park) -> Self {
        Self {
            park_code: park.park_code,
            name: park.name,
            states: park.states,
            latitude: park.latitude,
            longitude: park.longitude,
            description: park.description,
        }
    }
}

/// Which part of the catalog a consumer wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParkFilter {
    /// Parks with both coordinates (map consumers)
    #[default]
    MapReady,
    /// Whole catalog (list and table consumers)
    All,
}

impl ParkFilter {
    pub fn matches(&self, park: &Park) -> bool {
        match self {
            ParkFilter::MapReady => park.position().is_some(),
            ParkFilter::All => true,
        }
    }
}

/// Query parameters for `GET /parks`
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ParkQuery {
    /// Include parks without coordinates
    pub all: Option<bool>,
}

impl ParkQuery {
    pub fn filter(&self) -> ParkFilter {
        if self.all.unwrap_or(false) {
            ParkFilter::All
        } else {
            ParkFilter::MapReady
        }
    }
}

#[cfg(test)]
pub(crate) fn test_park(code: &str, name: &str, position: Option<(f64, f64)>) -> Park {
    Park {
        id: 0,
        park_code: code.to_string(),
        name: name.to_string(),
        states: "US".to_string(),
        description: None,
        latitude: position.map(|p| p.0),
        longitude: position.map(|p| p.1),
        created_at: None,
    }
}
