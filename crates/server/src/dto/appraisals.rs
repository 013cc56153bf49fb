//! # Appraisal Data Transfer Objects

use chrono::{DateTime, NaiveDate, Utc};
use entity::{appraisal_cycles::CycleStatus, appraisals::AppraisalStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{common::PaginationInfo, evaluations::EvaluationResponse, reviews::ReviewResponse};

/// Cycle summary embedded in appraisal responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleInfo {
    /// Period start date
    pub period_start: NaiveDate,
    /// Period end date
    pub period_end: NaiveDate,
    /// Cycle status
    pub status: CycleStatus,
}

/// Response for a single appraisal, reviews and evaluation embedded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppraisalResponse {
    /// Appraisal record ID
    pub id: Uuid,
    /// Owning cycle
    pub cycle: Uuid,
    /// Cycle summary
    pub cycle_info: CycleInfo,
    /// User being appraised
    pub appraisee: Uuid,
    /// Appraisee's full name
    pub appraisee_name: String,
    /// Project the appraisal belongs to
    pub project: Uuid,
    /// Project name
    pub project_name: String,
    /// Scheduled discussion date
    pub discussion_date: Option<NaiveDate>,
    /// Workflow status
    pub status: AppraisalStatus,
    /// Reviews recorded for this appraisal
    pub reviews: Vec<ReviewResponse>,
    /// The single overall evaluation
    pub overall_evaluation: Option<EvaluationResponse>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Response for the appraisal list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppraisalListResponse {
    /// Whether the operation was successful
    pub success: bool,
    /// Appraisals on this page
    pub appraisals: Vec<AppraisalResponse>,
    /// Pagination info
    pub pagination: PaginationInfo,
}

/// Request to create an appraisal
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateAppraisalRequest {
    /// Cycle the appraisal belongs to
    pub cycle: Uuid,
    /// User being appraised
    pub appraisee: Uuid,
    /// Project the appraisal belongs to
    pub project: Uuid,
    /// Scheduled discussion date
    pub discussion_date: Option<NaiveDate>,
    /// Initial status (default PENDING)
    pub status: Option<AppraisalStatus>,
}

/// Request to update an appraisal
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateAppraisalRequest {
    /// New discussion date
    pub discussion_date: Option<NaiveDate>,
    /// New status
    pub status: Option<AppraisalStatus>,
}
