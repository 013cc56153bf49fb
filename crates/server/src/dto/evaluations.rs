//! # Overall Evaluation Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::PaginationInfo;

/// Response for an overall evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResponse {
    /// Evaluation record ID
    pub id: Uuid,
    /// Owning appraisal
    pub appraisal: Uuid,
    /// Derived mean of completed reviews' ratings; null when none exist
    pub overall_rating_avg: Option<f64>,
    /// Readiness flag
    pub ready_for_advanced_work: bool,
    /// Readiness flag
    pub ready_for_promotion: bool,
    /// Summary comment
    pub summary_comment: String,
    /// Appraisee's base64-encoded signature image
    pub appraisee_signature: Option<String>,
    /// When the appraisee signed
    pub appraisee_signed_at: Option<DateTime<Utc>>,
    /// HR's base64-encoded signature image
    pub hr_signature: Option<String>,
    /// When HR signed
    pub hr_signed_at: Option<DateTime<Utc>>,
    /// When the evaluation was finalized
    pub finalized_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl EvaluationResponse {
    /// Builds the response from an entity model.
    #[must_use]
    pub fn from_model(evaluation: &entity::overall_evaluations::Model) -> Self {
        Self {
            id: evaluation.id,
            appraisal: evaluation.appraisal_id,
            overall_rating_avg: evaluation.overall_rating_avg,
            ready_for_advanced_work: evaluation.ready_for_advanced_work,
            ready_for_promotion: evaluation.ready_for_promotion,
            summary_comment: evaluation.summary_comment.clone(),
            appraisee_signature: evaluation.appraisee_signature.clone(),
            appraisee_signed_at: evaluation.appraisee_signed_at,
            hr_signature: evaluation.hr_signature.clone(),
            hr_signed_at: evaluation.hr_signed_at,
            finalized_at: evaluation.finalized_at,
            created_at: evaluation.created_at,
            updated_at: evaluation.updated_at,
        }
    }
}

/// Response for evaluation lists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationListResponse {
    /// Whether the operation was successful
    pub success: bool,
    /// Evaluations on this page
    pub evaluations: Vec<EvaluationResponse>,
    /// Pagination info
    pub pagination: PaginationInfo,
}

/// Patch for an overall evaluation. The average is derived and cannot be
/// written here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateEvaluationRequest {
    /// Readiness flag
    pub ready_for_advanced_work: Option<bool>,
    /// Readiness flag
    pub ready_for_promotion: Option<bool>,
    /// Summary comment
    pub summary_comment: Option<String>,
    /// Appraisee's base64-encoded signature image
    pub appraisee_signature: Option<String>,
    /// When the appraisee signed
    pub appraisee_signed_at: Option<DateTime<Utc>>,
    /// HR's base64-encoded signature image
    pub hr_signature: Option<String>,
    /// When HR signed
    pub hr_signed_at: Option<DateTime<Utc>>,
    /// When the evaluation was finalized
    pub finalized_at: Option<DateTime<Utc>>,
}
