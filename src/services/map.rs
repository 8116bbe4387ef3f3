//! Map presentation: markers, colors and the ledger calls behind each button

use serde_json::json;

use crate::{
    config::MapConfig,
    models::{
        map::{LatLng, LegendEntry, MapMarker, MapView, MarkerAction, MarkerActionKind, Viewport},
        Park, ParkDisplayState,
    },
    services::reconcile::Reconciliation,
};

pub const VISITED_COLOR: &str = "#16a34a";
pub const NOT_VISITED_COLOR: &str = "#d1d5db";
pub const BUCKET_LIST_COLOR: &str = "#facc15";

pub fn marker_color(state: ParkDisplayState) -> &'static str {
    match state {
        ParkDisplayState::Visited => VISITED_COLOR,
        ParkDisplayState::NotVisited => NOT_VISITED_COLOR,
        ParkDisplayState::BucketList => BUCKET_LIST_COLOR,
    }
}

impl MarkerAction {
    pub fn for_park(kind: MarkerActionKind, park_code: &str) -> Self {
        match kind {
            MarkerActionKind::MarkVisited => Self {
                kind,
                label: "Mark Visited".to_string(),
                method: "POST".to_string(),
                path: "/visits".to_string(),
                query: None,
                body: Some(json!({ "park_code": park_code, "is_bucket_list": false })),
                requires_date: true,
            },
            MarkerActionKind::AddToBucketList => Self {
                kind,
                label: "Add to Bucket List".to_string(),
                method: "POST".to_string(),
                path: "/visits".to_string(),
                query: None,
                body: Some(json!({ "park_code": park_code, "is_bucket_list": true })),
                requires_date: false,
            },
            MarkerActionKind::MarkNotVisited => Self {
                kind,
                label: "Mark Not Visited".to_string(),
                method: "DELETE".to_string(),
                path: "/visits".to_string(),
                query: Some(json!({ "park_code": park_code })),
                body: None,
                requires_date: false,
            },
            MarkerActionKind::RemoveFromBucketList => Self {
                kind,
                label: "Remove from Bucket List".to_string(),
                method: "DELETE".to_string(),
                path: "/visits".to_string(),
                query: Some(json!({ "park_code": park_code })),
                body: None,
                requires_date: false,
            },
        }
    }
}

/// Primary (visited toggle) and secondary (bucket list toggle) actions.
/// Visited parks get no bucket-list action.
pub fn marker_actions(
    state: ParkDisplayState,
) -> (MarkerActionKind, Option<MarkerActionKind>) {
    match state {
        ParkDisplayState::Visited => (MarkerActionKind::MarkNotVisited, None),
        ParkDisplayState::BucketList => (
            MarkerActionKind::MarkVisited,
            Some(MarkerActionKind::RemoveFromBucketList),
        ),
        ParkDisplayState::NotVisited => (
            MarkerActionKind::MarkVisited,
            Some(MarkerActionKind::AddToBucketList),
        ),
    }
}

pub fn viewport(config: &MapConfig) -> Viewport {
    Viewport {
        center: LatLng::new(config.center_lat, config.center_lng),
        zoom: config.zoom,
        min_zoom: config.min_zoom,
        max_bounds: config.max_bounds,
    }
}

pub fn legend() -> Vec<LegendEntry> {
    [
        ParkDisplayState::Visited,
        ParkDisplayState::NotVisited,
        ParkDisplayState::BucketList,
    ]
    .into_iter()
    .map(|state| LegendEntry {
        state,
        label: state.label().to_string(),
        color: marker_color(state).to_string(),
    })
    .collect()
}

/// Build markers for every park with coordinates
pub fn build_map(parks: &[Park], reconciliation: &Reconciliation, config: &MapConfig) -> MapView {
    let markers = parks
        .iter()
        .filter_map(|park| {
            let (lat, lng) = park.position()?;
            let status = reconciliation.status_of(&park.park_code);
            let state = status
                .map(|s| s.state)
                .unwrap_or(ParkDisplayState::NotVisited);
            let (primary, secondary) = marker_actions(state);
            Some(MapMarker {
                park_code: park.park_code.clone(),
                name: park.name.clone(),
                position: LatLng::new(lat, lng),
                status: state,
                color: marker_color(state).to_string(),
                description: park.description.clone(),
                visited_date: status.and_then(|s| s.visited_date),
                primary_action: MarkerAction::for_park(primary, &park.park_code),
                secondary_action: secondary.map(|kind| MarkerAction::for_park(kind, &park.park_code)),
            })
        })
        .collect();

    MapView {
        viewport: viewport(config),
        legend: legend(),
        markers,
        summary: reconciliation.summary,
    }
}
