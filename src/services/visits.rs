//! Visit ledger service
//!
//! Every operation takes the caller's identity explicitly; nothing here
//! reads ambient session state.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinSet;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        visit::{normalize_park_code, MAX_BATCH_PARKS}, ParkFilter, Summary, UpsertResult, Visit, VisitWrite,
    },
    repository::Repository,
    services::reconcile::reconcile,
};

/// Park that could not be written in a batch
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchFailure {
    pub park_code: String,
    pub error: String,
}

/// Confirmed outcome of a batch, with counters re-read from the ledger
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchResult {
    pub succeeded: Vec<String>,
    pub failed: Vec<BatchFailure>,
    pub summary: Summary,
}

#[derive(Clone)]
pub struct VisitsService {
    repository: Repository,
}

impl VisitsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All visit rows of the caller
    pub async fn list(&self, user_id: &str) -> AppResult<Vec<Visit>> {
        self.repository.visits.list_for_user(user_id).await
    }

    /// Mark a park visited or bucket-listed, toggling the existing row in place
    pub async fn upsert(
        &self,
        user_id: &str,
        park_code: &str,
        is_bucket_list: bool,
        visited_date: Option<DateTime<Utc>>,
    ) -> AppResult<UpsertResult> {
        let write = VisitWrite::new(park_code, is_bucket_list, visited_date, Utc::now())?;
        let result = self.repository.visits.upsert(user_id, &write).await?;

        tracing::info!(
            user_id,
            park_code = %write.park_code,
            is_bucket_list,
            outcome = %result.outcome,
            "Visit upserted"
        );

        Ok(result)
    }

    /// Remove the caller's row for a park; missing rows are not an error
    pub async fn delete(&self, user_id: &str, park_code: Option<&str>) -> AppResult<()> {
        let park_code = normalize_park_code(park_code)?;
        let removed = self.repository.visits.delete(user_id, &park_code).await?;

        tracing::info!(user_id, park_code = %park_code, removed, "Visit deleted");

        Ok(())
    }

    /// Apply one state to many parks concurrently.
    ///
    /// Each park is written independently, so failures leave the successful
    /// writes in place. The summary is recomputed from a fresh ledger read.
    pub async fn batch_upsert(
        &self,
        user_id: &str,
        park_codes: &[String],
        is_bucket_list: bool,
        visited_date: Option<DateTime<Utc>>,
    ) -> AppResult<BatchResult> {
        let mut seen = HashSet::new();
        let codes: Vec<String> = park_codes
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty() && seen.insert(c.to_string()))
            .map(str::to_string)
            .collect();

        if codes.is_empty() {
            return Err(AppError::Validation(
                "At least one park code is required".to_string(),
            ));
        }
        if codes.len() > MAX_BATCH_PARKS {
            return Err(AppError::Validation(format!(
                "At most {} park codes per batch",
                MAX_BATCH_PARKS
            )));
        }

        // Every park in the batch shares one visit date
        let visited_date = Some(visited_date.unwrap_or_else(Utc::now));

        let mut tasks = JoinSet::new();
        for (index, code) in codes.iter().cloned().enumerate() {
            let service = self.clone();
            let user_id = user_id.to_string();
            tasks.spawn(async move {
                let result = service
                    .upsert(&user_id, &code, is_bucket_list, visited_date)
                    .await;
                (index, result)
            });
        }

        let mut outcomes: Vec<Option<Result<(), String>>> = vec![None; codes.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(_))) => outcomes[index] = Some(Ok(())),
                Ok((index, Err(e))) => outcomes[index] = Some(Err(public_message(e))),
                Err(e) => tracing::error!("Batch visit task failed: {}", e),
            }
        }

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (code, outcome) in codes.into_iter().zip(outcomes) {
            match outcome {
                Some(Ok(())) => succeeded.push(code),
                Some(Err(error)) => failed.push(BatchFailure {
                    park_code: code,
                    error,
                }),
                None => failed.push(BatchFailure {
                    park_code: code,
                    error: "Internal server error".to_string(),
                }),
            }
        }

        tracing::info!(
            user_id,
            is_bucket_list,
            succeeded = succeeded.len(),
            failed = failed.len(),
            "Batch visit update finished"
        );

        let parks = self.repository.parks.list(ParkFilter::All).await?;
        let visits = self.list(user_id).await?;
        let summary = reconcile(&parks, &visits).summary;

        Ok(BatchResult {
            succeeded,
            failed,
            summary,
        })
    }
}

/// Per-park error text safe to hand back to the caller
fn public_message(error: AppError) -> String {
    match error {
        AppError::Validation(msg) | AppError::NotFound(msg) | AppError::BadRequest(msg) => msg,
        other => {
            tracing::error!("Batch visit write failed: {}", other);
            "Failed to update visit".to_string()
        }
    }
}
