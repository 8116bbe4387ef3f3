//! Visit ledger model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Visit record: either a completed visit or a bucket-list intention.
///
/// A bucket-list row never carries a date; a completed visit always does.
/// At most one row exists per (user, park).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Visit {
    pub id: i32,
    /// Identity provider subject of the owner
    pub user_id: String,
    pub park_code: String,
    pub visited_date: Option<DateTime<Utc>>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub photos: Option<serde_json::Value>,
    pub is_bucket_list: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Visit {
    /// Completed visit, as opposed to a bucket-list entry
    pub fn is_completed(&self) -> bool {
        !self.is_bucket_list && self.visited_date.is_some()
    }
}

/// Visit as exposed by `GET /visits`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisitShort {
    pub park_code: String,
    pub visited_date: Option<DateTime<Utc>>,
    pub is_bucket_list: bool,
}

impl From<Visit> for VisitShort {
    fn from(visit: Visit) -> Self {
        Self {
            park_code: visit.park_code,
            visited_date: visit.visited_date,
            is_bucket_list: visit.is_bucket_list,
        }
    }
}

/// Mark a park visited or put it on the bucket list
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpsertVisit {
    #[validate(required(message = "Park code is required"))]
    pub park_code: Option<String>,
    /// Defaults to false (completed visit)
    pub is_bucket_list: Option<bool>,
    /// RFC 3339 timestamp or YYYY-MM-DD; defaults to now for completed visits
    pub visited_date: Option<String>,
}

/// Most parks a single batch request may touch
pub const MAX_BATCH_PARKS: usize = 500;

/// Apply the same state to several parks at once
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct BatchUpsertVisits {
    #[serde(default)]
    #[validate(length(min = 1, max = 500, message = "Between 1 and 500 park codes are required"))]
    pub park_codes: Vec<String>,
    pub is_bucket_list: Option<bool>,
    pub visited_date: Option<String>,
}

/// Query parameters for `DELETE /visits`
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct DeleteVisitQuery {
    pub park_code: Option<String>,
}

/// Normalised ledger write: bucket-list entries carry no date, completed
/// visits always carry one.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitWrite {
    pub park_code: String,
    pub is_bucket_list: bool,
    pub visited_date: Option<DateTime<Utc>>,
}

impl VisitWrite {
    pub fn new(
        park_code: &str,
        is_bucket_list: bool,
        visited_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        let park_code = normalize_park_code(Some(park_code))?;
        let visited_date = if is_bucket_list {
            None
        } else {
            Some(visited_date.unwrap_or(now))
        };
        Ok(Self {
            park_code,
            is_bucket_list,
            visited_date,
        })
    }
}

/// What the ledger did with an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    /// New row inserted
    Created,
    /// Existing row switched between bucket list and visited
    Transitioned,
    /// Existing row already in the requested state
    Unchanged,
}

impl UpsertOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpsertOutcome::Created => "created",
            UpsertOutcome::Transitioned => "transitioned",
            UpsertOutcome::Unchanged => "unchanged",
        }
    }

    /// Confirmation message for the caller
    pub fn message(&self, is_bucket_list: bool) -> &'static str {
        match (self, is_bucket_list) {
            (UpsertOutcome::Created, false) => "Park marked as visited",
            (UpsertOutcome::Created, true) => "Park added to bucket list",
            (UpsertOutcome::Transitioned, false) => "Park moved from bucket list to visited",
            (UpsertOutcome::Transitioned, true) => "Park moved from visited to bucket list",
            (UpsertOutcome::Unchanged, false) => "Park already marked as visited",
            (UpsertOutcome::Unchanged, true) => "Park already on bucket list",
        }
    }
}

impl std::fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UpsertOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(UpsertOutcome::Created),
            "transitioned" => Ok(UpsertOutcome::Transitioned),
            "unchanged" => Ok(UpsertOutcome::Unchanged),
            _ => Err(format!("Invalid upsert outcome: {}", s)),
        }
    }
}

// SQLx conversion for UpsertOutcome (computed text column of the upsert query)
impl sqlx::Type<Postgres> for UpsertOutcome {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for UpsertOutcome {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

/// Result of a ledger upsert
#[derive(Debug, Clone)]
pub struct UpsertResult {
    pub visit: Visit,
    pub outcome: UpsertOutcome,
}

/// Row-level action an upsert resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Insert,
    Transition,
    Keep,
}

impl UpsertAction {
    pub fn outcome(&self) -> UpsertOutcome {
        match self {
            UpsertAction::Insert => UpsertOutcome::Created,
            UpsertAction::Transition => UpsertOutcome::Transitioned,
            UpsertAction::Keep => UpsertOutcome::Unchanged,
        }
    }
}

/// Decide how a write applies to the caller's existing row for the park.
///
/// Matching flags leave the row untouched, including the date of an
/// already completed visit.
pub fn resolve_upsert(existing: Option<&Visit>, write: &VisitWrite) -> UpsertAction {
    match existing {
        None => UpsertAction::Insert,
        Some(visit) if visit.is_bucket_list != write.is_bucket_list => UpsertAction::Transition,
        Some(_) => UpsertAction::Keep,
    }
}

/// Trim a park code, rejecting missing or blank values
pub fn normalize_park_code(code: Option<&str>) -> AppResult<String> {
    match code.map(str::trim) {
        Some(code) if !code.is_empty() => Ok(code.to_string()),
        _ => Err(AppError::Validation("Park code is required".to_string())),
    }
}

/// Parse a visit date given either as an RFC 3339 timestamp or a plain
/// `YYYY-MM-DD` date (taken as midnight UTC).
pub fn parse_visit_date(value: &str) -> AppResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::Validation(format!("Invalid visited_date: {}", value)))
}

#[cfg(test)]
pub(crate) fn test_visit(
    user_id: &str,
    park_code: &str,
    is_bucket_list: bool,
    visited_date: Option<DateTime<Utc>>,
) -> Visit {
    Visit {
        id: 0,
        user_id: user_id.to_string(),
        park_code: park_code.to_string(),
        visited_date,
        rating: None,
        notes: None,
        photos: None,
        is_bucket_list,
        created_at: None,
        updated_at: None,
    }
}
