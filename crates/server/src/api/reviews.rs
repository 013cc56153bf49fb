//! # Appraisal Review Handlers
//!
//! CRUD for reviews. Updates and deletions recompute the owning appraisal's
//! overall rating inside the same transaction as the write.

use auth::access::{ensure_reporter, ensure_same_project};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use entity::{
    appraisal_reviews::{Column as ReviewColumn, Entity as ReviewsEntity},
    appraisals::{Column as AppraisalColumn, Entity as AppraisalsEntity},
    competency_ratings::{Column as RatingColumn, Entity as RatingsEntity},
    users::Entity as UsersEntity,
};
use error::{AppError, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    aggregation::recompute_overall_rating,
    dto::{
        common::{ListQuery, SuccessResponse},
        reviews::{
            CreateReviewRequest, RatingListResponse, RatingResponse, ReviewListResponse, ReviewResponse,
            UpdateReviewRequest,
        },
    },
    middleware::auth::AuthenticatedUser,
    AppState,
};

/// Convert a review entity model to a response DTO with ratings embedded.
pub(crate) async fn review_to_response<C: ConnectionTrait>(
    db: &C,
    review: &entity::appraisal_reviews::Model,
) -> Result<ReviewResponse> {
    let reviewer_name = UsersEntity::find_by_id(review.reviewer_id)
        .one(db)
        .await?
        .map(|u| u.full_name())
        .unwrap_or_default();

    let ratings = RatingsEntity::find()
        .filter(RatingColumn::ReviewId.eq(review.id))
        .order_by_asc(RatingColumn::Category)
        .order_by_asc(RatingColumn::CriterionName)
        .all(db)
        .await?;

    Ok(ReviewResponse {
        id: review.id,
        appraisal: review.appraisal_id,
        reviewer: review.reviewer_id,
        reviewer_name,
        is_completed: review.is_completed,
        reviewer_signature: review.reviewer_signature.clone(),
        reviewer_signed_at: review.reviewer_signed_at,
        competency_ratings: ratings.iter().map(RatingResponse::from_model).collect(),
        created_at: review.created_at,
        updated_at: review.updated_at,
    })
}

/// Loads a review the caller is allowed to see, or 404.
///
/// Non-staff callers only see reviews they wrote or reviews of their own
/// appraisals.
pub(crate) async fn find_visible_review(
    state: &AppState,
    user: &AuthenticatedUser,
    review_id: Uuid,
) -> Result<entity::appraisal_reviews::Model> {
    let review = ReviewsEntity::find_by_id(review_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Review not found"))?;

    if user.is_staff || review.reviewer_id == user.id {
        return Ok(review);
    }

    let appraisal = AppraisalsEntity::find_by_id(review.appraisal_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Review not found"))?;

    if appraisal.appraisee_id != user.id {
        return Err(AppError::not_found("Review not found"));
    }

    Ok(review)
}

/// List reviews visible to the caller.
pub async fn list_reviews_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ReviewListResponse>> {
    let mut select = ReviewsEntity::find().order_by_asc(ReviewColumn::CreatedAt);

    if !user.is_staff {
        let own_appraisal_ids: Vec<Uuid> = AppraisalsEntity::find()
            .filter(AppraisalColumn::AppraiseeId.eq(user.id))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();

        select = select.filter(
            Condition::any()
                .add(ReviewColumn::ReviewerId.eq(user.id))
                .add(ReviewColumn::AppraisalId.is_in(own_appraisal_ids)),
        );
    }

    let (review_models, pagination) = super::fetch_page(&state.db, select, &query).await?;

    let mut reviews = Vec::with_capacity(review_models.len());
    for review in &review_models {
        reviews.push(review_to_response(&state.db, review).await?);
    }

    Ok(Json(ReviewListResponse {
        success: true,
        reviews,
        pagination,
    }))
}

/// Add a review to an appraisal, with the caller as reviewer.
///
/// One review per reviewer per appraisal; a second attempt is a 409.
pub async fn create_review_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>)> {
    let appraisal = AppraisalsEntity::find_by_id(req.appraisal)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Appraisal not found"))?;

    let actor = user.actor();
    ensure_reporter(&state.db, &actor, &appraisal).await?;
    ensure_same_project(&state.db, &actor, &appraisal).await?;

    let existing = ReviewsEntity::find()
        .filter(ReviewColumn::AppraisalId.eq(appraisal.id))
        .filter(ReviewColumn::ReviewerId.eq(user.id))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::conflict("You have already reviewed this appraisal"));
    }

    let now = Utc::now();
    let review = entity::appraisal_reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        appraisal_id: Set(appraisal.id),
        reviewer_id: Set(user.id),
        is_completed: Set(false),
        reviewer_signature: Set(None),
        reviewer_signed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(review_id = %review.id, appraisal_id = %appraisal.id, user_id = %user.id, "Review created");

    let response = review_to_response(&state.db, &review).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a single review.
pub async fn get_review_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(review_id): Path<Uuid>,
) -> Result<Json<ReviewResponse>> {
    let review = find_visible_review(&state, &user, review_id).await?;
    Ok(Json(review_to_response(&state.db, &review).await?))
}

/// Update a review and recompute the overall rating.
///
/// The patch and the recomputation commit together; a stale average can
/// never outlive the completion-flag change that invalidated it.
pub async fn update_review_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(review_id): Path<Uuid>,
    Json(req): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    let review = find_visible_review(&state, &user, review_id).await?;

    let actor = user.actor();
    ensure_reporter(&state.db, &actor, &review).await?;

    let appraisal = AppraisalsEntity::find_by_id(review.appraisal_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Appraisal not found"))?;
    ensure_same_project(&state.db, &actor, &appraisal).await?;

    let appraisal_id = review.appraisal_id;
    let txn = state.db.begin().await?;

    let mut active: entity::appraisal_reviews::ActiveModel = review.into();
    if let Some(is_completed) = req.is_completed {
        active.is_completed = Set(is_completed);
    }
    if let Some(signature) = req.reviewer_signature {
        active.reviewer_signature = Set(Some(signature));
    }
    if let Some(signed_at) = req.reviewer_signed_at {
        active.reviewer_signed_at = Set(Some(signed_at));
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&txn).await?;

    recompute_overall_rating(&txn, appraisal_id).await?;

    txn.commit().await?;

    info!(review_id = %review_id, user_id = %user.id, "Review updated");

    Ok(Json(review_to_response(&state.db, &updated).await?))
}

/// Delete a review, its ratings, and recompute the overall rating.
///
/// Without the recomputation the average would keep counting the deleted
/// review's ratings.
pub async fn delete_review_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(review_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>> {
    let review = find_visible_review(&state, &user, review_id).await?;

    let actor = user.actor();
    ensure_reporter(&state.db, &actor, &review).await?;

    let appraisal = AppraisalsEntity::find_by_id(review.appraisal_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Appraisal not found"))?;
    ensure_same_project(&state.db, &actor, &appraisal).await?;

    let appraisal_id = review.appraisal_id;
    let txn = state.db.begin().await?;

    RatingsEntity::delete_many()
        .filter(RatingColumn::ReviewId.eq(review.id))
        .exec(&txn)
        .await?;

    ReviewsEntity::delete_by_id(review.id).exec(&txn).await?;

    recompute_overall_rating(&txn, appraisal_id).await?;

    txn.commit().await?;

    info!(review_id = %review_id, user_id = %user.id, "Review deleted");

    Ok(Json(SuccessResponse::new("Review deleted")))
}

/// List the competency ratings of a review.
pub async fn list_review_ratings_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(review_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<RatingListResponse>> {
    let review = find_visible_review(&state, &user, review_id).await?;

    let select = RatingsEntity::find()
        .filter(RatingColumn::ReviewId.eq(review.id))
        .order_by_asc(RatingColumn::Category)
        .order_by_asc(RatingColumn::CriterionName);

    let (ratings, pagination) = super::fetch_page(&state.db, select, &query).await?;

    Ok(Json(RatingListResponse {
        success: true,
        ratings: ratings.iter().map(RatingResponse::from_model).collect(),
        pagination,
    }))
}
