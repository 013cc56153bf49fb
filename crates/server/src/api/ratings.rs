//! # Competency Rating Handlers
//!
//! CRUD for competency ratings. Every write recomputes the owning
//! appraisal's overall rating in the same transaction.

use auth::access::ensure_reporter;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use entity::{
    appraisal_reviews::{Column as ReviewColumn, Entity as ReviewsEntity},
    competency_ratings::{Column as RatingColumn, Entity as RatingsEntity},
};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    aggregation::recompute_overall_rating,
    dto::{
        common::{ListQuery, SuccessResponse},
        reviews::{CreateRatingRequest, RatingListResponse, RatingResponse, UpdateRatingRequest},
    },
    middleware::auth::AuthenticatedUser,
    AppState,
};

/// Loads a rating the caller is allowed to see, or 404.
///
/// Non-staff callers only see ratings under their own reviews.
async fn find_visible_rating(
    state: &AppState,
    user: &AuthenticatedUser,
    rating_id: Uuid,
) -> Result<entity::competency_ratings::Model> {
    let rating = RatingsEntity::find_by_id(rating_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Rating not found"))?;

    if user.is_staff {
        return Ok(rating);
    }

    let review = ReviewsEntity::find_by_id(rating.review_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Rating not found"))?;

    if review.reviewer_id != user.id {
        return Err(AppError::not_found("Rating not found"));
    }

    Ok(rating)
}

/// List ratings visible to the caller.
pub async fn list_ratings_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<RatingListResponse>> {
    let mut select = RatingsEntity::find()
        .order_by_asc(RatingColumn::Category)
        .order_by_asc(RatingColumn::CriterionName);

    if !user.is_staff {
        let own_review_ids: Vec<Uuid> = ReviewsEntity::find()
            .filter(ReviewColumn::ReviewerId.eq(user.id))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();
        select = select.filter(RatingColumn::ReviewId.is_in(own_review_ids));
    }

    let (ratings, pagination) = super::fetch_page(&state.db, select, &query).await?;

    Ok(Json(RatingListResponse {
        success: true,
        ratings: ratings.iter().map(RatingResponse::from_model).collect(),
        pagination,
    }))
}

/// Record a competency rating under a review.
pub async fn create_rating_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateRatingRequest>,
) -> Result<(StatusCode, Json<RatingResponse>)> {
    req.validate().map_err(AppError::from)?;

    let review = ReviewsEntity::find_by_id(req.appraisal_review)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Review not found"))?;

    ensure_reporter(&state.db, &user.actor(), &review).await?;

    let now = Utc::now();
    let txn = state.db.begin().await?;

    let rating = entity::competency_ratings::ActiveModel {
        id: Set(Uuid::new_v4()),
        review_id: Set(review.id),
        category: Set(req.category),
        criterion_name: Set(req.criterion_name),
        rating: Set(req.rating),
        comments: Set(req.comments.unwrap_or_default()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    recompute_overall_rating(&txn, review.appraisal_id).await?;

    txn.commit().await?;

    info!(rating_id = %rating.id, review_id = %review.id, user_id = %user.id, "Competency rating created");

    Ok((StatusCode::CREATED, Json(RatingResponse::from_model(&rating))))
}

/// Get a single rating.
pub async fn get_rating_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(rating_id): Path<Uuid>,
) -> Result<Json<RatingResponse>> {
    let rating = find_visible_rating(&state, &user, rating_id).await?;
    Ok(Json(RatingResponse::from_model(&rating)))
}

/// Update a rating and recompute the overall rating.
pub async fn update_rating_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(rating_id): Path<Uuid>,
    Json(req): Json<UpdateRatingRequest>,
) -> Result<Json<RatingResponse>> {
    req.validate().map_err(AppError::from)?;

    let rating = find_visible_rating(&state, &user, rating_id).await?;

    ensure_reporter(&state.db, &user.actor(), &rating).await?;

    let review = ReviewsEntity::find_by_id(rating.review_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Review not found"))?;

    let txn = state.db.begin().await?;

    let mut active: entity::competency_ratings::ActiveModel = rating.into();
    if let Some(category) = req.category {
        active.category = Set(category);
    }
    if let Some(criterion_name) = req.criterion_name {
        active.criterion_name = Set(criterion_name);
    }
    if let Some(value) = req.rating {
        active.rating = Set(value);
    }
    if let Some(comments) = req.comments {
        active.comments = Set(comments);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&txn).await?;

    recompute_overall_rating(&txn, review.appraisal_id).await?;

    txn.commit().await?;

    info!(rating_id = %rating_id, user_id = %user.id, "Competency rating updated");

    Ok(Json(RatingResponse::from_model(&updated)))
}

/// Delete a rating and recompute the overall rating.
pub async fn delete_rating_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(rating_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>> {
    let rating = find_visible_rating(&state, &user, rating_id).await?;

    ensure_reporter(&state.db, &user.actor(), &rating).await?;

    let review = ReviewsEntity::find_by_id(rating.review_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Review not found"))?;

    let txn = state.db.begin().await?;

    RatingsEntity::delete_by_id(rating.id).exec(&txn).await?;

    recompute_overall_rating(&txn, review.appraisal_id).await?;

    txn.commit().await?;

    info!(rating_id = %rating_id, user_id = %user.id, "Competency rating deleted");

    Ok(Json(SuccessResponse::new("Rating deleted")))
}
