//! # Review & Rating Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::competency_ratings::{rating_label, RatingCategory};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common::PaginationInfo;

/// Response for a competency rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingResponse {
    /// Rating record ID
    pub id: Uuid,
    /// Owning review
    pub appraisal_review: Uuid,
    /// Competency category
    pub category: RatingCategory,
    /// Criterion being rated
    pub criterion_name: String,
    /// Score, 1-5
    pub rating: i16,
    /// Human-readable label for the score
    pub rating_display: String,
    /// Free-text comments
    pub comments: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl RatingResponse {
    /// Builds the response from an entity model.
    #[must_use]
    pub fn from_model(rating: &entity::competency_ratings::Model) -> Self {
        Self {
            id: rating.id,
            appraisal_review: rating.review_id,
            category: rating.category.clone(),
            criterion_name: rating.criterion_name.clone(),
            rating: rating.rating,
            rating_display: rating_label(rating.rating).to_string(),
            comments: rating.comments.clone(),
            created_at: rating.created_at,
        }
    }
}

/// Response for an appraisal review, ratings embedded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewResponse {
    /// Review record ID
    pub id: Uuid,
    /// Owning appraisal
    pub appraisal: Uuid,
    /// Reviewer user ID
    pub reviewer: Uuid,
    /// Reviewer's full name
    pub reviewer_name: String,
    /// Completion flag; only completed reviews feed the overall average
    pub is_completed: bool,
    /// Base64-encoded signature image
    pub reviewer_signature: Option<String>,
    /// When the reviewer signed
    pub reviewer_signed_at: Option<DateTime<Utc>>,
    /// Ratings recorded under this review
    pub competency_ratings: Vec<RatingResponse>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Response for review lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewListResponse {
    /// Whether the operation was successful
    pub success: bool,
    /// Reviews on this page
    pub reviews: Vec<ReviewResponse>,
    /// Pagination info
    pub pagination: PaginationInfo,
}

/// Response for rating lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingListResponse {
    /// Whether the operation was successful
    pub success: bool,
    /// Ratings on this page
    pub ratings: Vec<RatingResponse>,
    /// Pagination info
    pub pagination: PaginationInfo,
}

/// Request to add a review to an appraisal. The reviewer is the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateReviewRequest {
    /// Appraisal being reviewed
    pub appraisal: Uuid,
}

/// Patch for an appraisal review
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateReviewRequest {
    /// Completion flag
    pub is_completed: Option<bool>,
    /// Base64-encoded signature image
    pub reviewer_signature: Option<String>,
    /// When the reviewer signed
    pub reviewer_signed_at: Option<DateTime<Utc>>,
}

/// Request to create a competency rating
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateRatingRequest {
    /// Review the rating belongs to
    pub appraisal_review: Uuid,
    /// Competency category
    pub category: RatingCategory,
    /// Criterion being rated
    #[validate(length(
        min = 1,
        max = 255,
        message = "Criterion name must be between 1 and 255 characters"
    ))]
    pub criterion_name: String,
    /// Score, 1-5
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    /// Free-text comments
    pub comments: Option<String>,
}

/// Patch for a competency rating
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateRatingRequest {
    /// New category
    pub category: Option<RatingCategory>,
    /// New criterion name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Criterion name must be between 1 and 255 characters"
    ))]
    pub criterion_name: Option<String>,
    /// New score, 1-5
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i16>,
    /// New comments
    pub comments: Option<String>,
}
