//! In-memory catalog and ledger, used by tests and local demos

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ParkStore, VisitStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        visit::{resolve_upsert, UpsertAction},
        Park, ParkFilter, UpsertResult, Visit, VisitWrite,
    },
};

/// Catalog and ledger kept behind a single lock, so every upsert is
/// atomic with respect to other writers.
pub struct MemoryStore {
    parks: Vec<Park>,
    ledger: RwLock<Ledger>,
}

#[derive(Default)]
struct Ledger {
    visits: Vec<Visit>,
    next_id: i32,
}

impl MemoryStore {
    pub fn new(mut parks: Vec<Park>) -> Self {
        parks.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            parks,
            ledger: RwLock::new(Ledger {
                visits: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of ledger rows for (user, park)
    pub async fn row_count(&self, user_id: &str, park_code: &str) -> usize {
        self.ledger
            .read()
            .await
            .visits
            .iter()
            .filter(|v| v.user_id == user_id && v.park_code == park_code)
            .count()
    }
}

#[async_trait]
impl ParkStore for MemoryStore {
    async fn list(&self, filter: ParkFilter) -> AppResult<Vec<Park>> {
        Ok(self
            .parks
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl VisitStore for MemoryStore {
    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Visit>> {
        let ledger = self.ledger.read().await;
        let mut visits: Vec<Visit> = ledger
            .visits
            .iter()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        visits.sort_by(|a, b| a.park_code.cmp(&b.park_code));
        Ok(visits)
    }

    async fn upsert(&self, user_id: &str, write: &VisitWrite) -> AppResult<UpsertResult> {
        if !self.parks.iter().any(|p| p.park_code == write.park_code) {
            return Err(AppError::NotFound(format!("Park {} not found", write.park_code)));
        }

        let mut ledger = self.ledger.write().await;
        let now = Utc::now();
        let position = ledger
            .visits
            .iter()
            .position(|v| v.user_id == user_id && v.park_code == write.park_code);
        let action = resolve_upsert(position.map(|i| &ledger.visits[i]), write);

        let visit = match (action, position) {
            (UpsertAction::Transition, Some(i)) => {
                let visit = &mut ledger.visits[i];
                visit.is_bucket_list = write.is_bucket_list;
                visit.visited_date = write.visited_date;
                visit.updated_at = Some(now);
                visit.clone()
            }
            (UpsertAction::Keep, Some(i)) => ledger.visits[i].clone(),
            _ => {
                let visit = Visit {
                    id: ledger.next_id,
                    user_id: user_id.to_string(),
                    park_code: write.park_code.clone(),
                    visited_date: write.visited_date,
                    rating: None,
                    notes: None,
                    photos: None,
                    is_bucket_list: write.is_bucket_list,
                    created_at: Some(now),
                    updated_at: Some(now),
                };
                ledger.next_id += 1;
                ledger.visits.push(visit.clone());
                visit
            }
        };

        Ok(UpsertResult {
            visit,
            outcome: action.outcome(),
        })
    }

    async fn delete(&self, user_id: &str, park_code: &str) -> AppResult<bool> {
        let mut ledger = self.ledger.write().await;
        let before = ledger.visits.len();
        ledger
            .visits
            .retain(|v| !(v.user_id == user_id && v.park_code == park_code));
        Ok(ledger.visits.len() < before)
    }
}
