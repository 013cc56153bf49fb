//! # Appraisal Cycle Data Transfer Objects

use chrono::{DateTime, NaiveDate, Utc};
use entity::appraisal_cycles::CycleStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::PaginationInfo;

/// Response for a single appraisal cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleResponse {
    /// Cycle's unique identifier
    pub id: Uuid,
    /// Owning company
    pub company: Uuid,
    /// Owning company name
    pub company_name: String,
    /// Period start date
    pub period_start: NaiveDate,
    /// Period end date
    pub period_end: NaiveDate,
    /// Cycle status
    pub status: CycleStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl CycleResponse {
    /// Builds the response from a cycle and its company name.
    #[must_use]
    pub fn from_model(cycle: &entity::appraisal_cycles::Model, company_name: String) -> Self {
        Self {
            id: cycle.id,
            company: cycle.company_id,
            company_name,
            period_start: cycle.period_start,
            period_end: cycle.period_end,
            status: cycle.status.clone(),
            created_at: cycle.created_at,
            updated_at: cycle.updated_at,
        }
    }
}

/// Response for the cycle list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleListResponse {
    /// Whether the operation was successful
    pub success: bool,
    /// Cycles on this page
    pub cycles: Vec<CycleResponse>,
    /// Pagination info
    pub pagination: PaginationInfo,
}

/// Request to create an appraisal cycle
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateCycleRequest {
    /// Owning company
    pub company: Uuid,
    /// Period start date
    pub period_start: NaiveDate,
    /// Period end date. Not validated against `period_start`.
    pub period_end: NaiveDate,
    /// Initial status (default DRAFT)
    pub status: Option<CycleStatus>,
}

/// Request to update an appraisal cycle
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateCycleRequest {
    /// New period start date
    pub period_start: Option<NaiveDate>,
    /// New period end date
    pub period_end: Option<NaiveDate>,
    /// New status
    pub status: Option<CycleStatus>,
}
