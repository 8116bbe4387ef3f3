//! Map view models consumed by the client-side map library

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::status::{ParkDisplayState, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

/// Panning limits around the contiguous United States
pub const US_BOUNDS: Bounds = Bounds {
    south_west: LatLng {
        lat: 24.396308,
        lng: -125.0,
    },
    north_east: LatLng {
        lat: 49.384358,
        lng: -66.93457,
    },
};

/// Initial camera and panning limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_bounds: Bounds,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LegendEntry {
    pub state: ParkDisplayState,
    pub label: String,
    pub color: String,
}

/// Marker action kinds, each bound to one ledger call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum MarkerActionKind {
    MarkVisited,
    MarkNotVisited,
    AddToBucketList,
    RemoveFromBucketList,
}

/// Ledger call a marker button triggers
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MarkerAction {
    pub kind: MarkerActionKind,
    pub label: String,
    /// HTTP method of the ledger call
    pub method: String,
    /// Path relative to the API root
    pub path: String,
    /// Query parameters to encode onto the path, if any
    #[schema(value_type = Option<Object>)]
    pub query: Option<serde_json::Value>,
    /// JSON body to send, if any
    #[schema(value_type = Option<Object>)]
    pub body: Option<serde_json::Value>,
    /// Client must confirm a visit date and add it to the body as `visited_date`
    pub requires_date: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MapMarker {
    pub park_code: String,
    pub name: String,
    pub position: LatLng,
    pub status: ParkDisplayState,
    /// Fill color of the marker
    pub color: String,
    pub description: Option<String>,
    pub visited_date: Option<DateTime<Utc>>,
    /// Visited <-> not visited toggle
    pub primary_action: MarkerAction,
    /// Bucket list add/remove; absent for visited parks
    pub secondary_action: Option<MarkerAction>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MapView {
    pub viewport: Viewport,
    pub legend: Vec<LegendEntry>,
    pub markers: Vec<MapMarker>,
    pub summary: Summary,
}
