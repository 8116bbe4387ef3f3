//! Status reconciliation between the park catalog and a user's visits

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::models::{
    status::{ParkWithStatus, ProgressView},
    Park, ParkDisplayState, ParkStatus, Summary, Visit,
};

/// Per-park state in catalog order, plus the aggregate counters
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub statuses: IndexMap<String, ParkStatus>,
    pub summary: Summary,
}

impl Reconciliation {
    pub fn status_of(&self, park_code: &str) -> Option<&ParkStatus> {
        self.statuses.get(park_code)
    }

    pub fn state_of(&self, park_code: &str) -> ParkDisplayState {
        self.status_of(park_code)
            .map(|s| s.state)
            .unwrap_or(ParkDisplayState::NotVisited)
    }

    /// Park codes in `state`, in catalog order
    pub fn codes_in(&self, state: ParkDisplayState) -> Vec<&str> {
        self.statuses
            .iter()
            .filter(|(_, s)| s.state == state)
            .map(|(code, _)| code.as_str())
            .collect()
    }
}

/// Derive each park's display state from the caller's visit rows.
///
/// Visited is checked before bucket list, so it wins should a park ever
/// carry both. Counters come from the visit rows themselves: a bucket-list
/// row never counts as visited, and a dateless non-bucket row counts as
/// neither.
pub fn reconcile(parks: &[Park], visits: &[Visit]) -> Reconciliation {
    let mut bucket_list: HashSet<&str> = HashSet::new();
    let mut visited: HashMap<&str, Option<DateTime<Utc>>> = HashMap::new();

    for visit in visits {
        if visit.is_bucket_list {
            bucket_list.insert(visit.park_code.as_str());
        } else if visit.visited_date.is_some() {
            visited.insert(visit.park_code.as_str(), visit.visited_date);
        }
    }

    let statuses: IndexMap<String, ParkStatus> = parks
        .iter()
        .map(|park| {
            let code = park.park_code.as_str();
            let status = if let Some(date) = visited.get(code) {
                ParkStatus {
                    state: ParkDisplayState::Visited,
                    visited_date: *date,
                }
            } else if bucket_list.contains(code) {
                ParkStatus {
                    state: ParkDisplayState::BucketList,
                    visited_date: None,
                }
            } else {
                ParkStatus {
                    state: ParkDisplayState::NotVisited,
                    visited_date: None,
                }
            };
            (park.park_code.clone(), status)
        })
        .collect();

    let summary = summarize(parks.len(), visited.len(), bucket_list.len());

    Reconciliation { statuses, summary }
}

fn summarize(total: usize, visited: usize, bucket_list: usize) -> Summary {
    let percent_complete = if total == 0 {
        0
    } else {
        ((visited.min(total) as f64 / total as f64) * 100.0).round() as u8
    };
    Summary {
        total,
        visited,
        bucket_list,
        unvisited: total.saturating_sub(visited),
        percent_complete,
    }
}

/// Group the catalog by status for the "My Visits" page
pub fn build_progress(parks: &[Park], reconciliation: &Reconciliation) -> ProgressView {
    let mut visited = Vec::new();
    let mut bucket_list = Vec::new();
    let mut not_visited = Vec::new();

    for park in parks {
        let status = reconciliation
            .status_of(&park.park_code)
            .copied()
            .unwrap_or(ParkStatus {
                state: ParkDisplayState::NotVisited,
                visited_date: None,
            });
        let entry = ParkWithStatus {
            park_code: park.park_code.clone(),
            name: park.name.clone(),
            status: status.state,
            visited_date: status.visited_date,
            description: park.description.clone(),
        };
        match status.state {
            ParkDisplayState::Visited => visited.push(entry),
            ParkDisplayState::BucketList => bucket_list.push(entry),
            ParkDisplayState::NotVisited => not_visited.push(entry),
        }
    }

    visited.sort_by(|a, b| match (a.visited_date, b.visited_date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (None, None) => Ordering::Equal,
    });
    bucket_list.sort_by(|a, b| a.name.cmp(&b.name));
    not_visited.sort_by(|a, b| a.name.cmp(&b.name));

    ProgressView {
        summary: reconciliation.summary,
        visited,
        bucket_list,
        not_visited,
    }
}
