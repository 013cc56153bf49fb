//! # Appraisal Handlers
//!
//! The appraisal workflow. Creation inserts the appraisal, the creator's
//! review, and the empty overall evaluation as one transaction; deletion
//! removes the whole tree the same way.

use auth::access::{ensure_can_create_appraisal, ensure_reporter, ensure_same_project};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use entity::{
    appraisal_cycles::Entity as CyclesEntity,
    appraisal_reviews::{Column as ReviewColumn, Entity as ReviewsEntity},
    appraisals::{AppraisalStatus, Column as AppraisalColumn, Entity as AppraisalsEntity},
    competency_ratings::{Column as RatingColumn, Entity as RatingsEntity},
    overall_evaluations::{Column as EvaluationColumn, Entity as EvaluationsEntity},
    project_memberships::{Column as MembershipColumn, Entity as MembershipsEntity},
    projects::Entity as ProjectsEntity,
    users::Entity as UsersEntity,
};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::{
        appraisals::{
            AppraisalListResponse, AppraisalResponse, CreateAppraisalRequest, CycleInfo, UpdateAppraisalRequest,
        },
        common::{ListQuery, SuccessResponse},
        evaluations::EvaluationResponse,
        reviews::ReviewListResponse,
    },
    middleware::auth::AuthenticatedUser,
    AppState,
};

/// IDs of the projects a user holds any membership on.
pub(crate) async fn member_project_ids<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Vec<Uuid>> {
    Ok(MembershipsEntity::find()
        .filter(MembershipColumn::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.project_id)
        .collect())
}

/// Convert an appraisal entity model to a response DTO with its reviews and
/// evaluation embedded.
pub(crate) async fn appraisal_to_response<C: ConnectionTrait>(
    db: &C,
    appraisal: &entity::appraisals::Model,
) -> Result<AppraisalResponse> {
    let cycle = CyclesEntity::find_by_id(appraisal.cycle_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Cycle not found"))?;

    let appraisee_name = UsersEntity::find_by_id(appraisal.appraisee_id)
        .one(db)
        .await?
        .map(|u| u.full_name())
        .unwrap_or_default();

    let project_name = ProjectsEntity::find_by_id(appraisal.project_id)
        .one(db)
        .await?
        .map(|p| p.name)
        .unwrap_or_default();

    let review_models = ReviewsEntity::find()
        .filter(ReviewColumn::AppraisalId.eq(appraisal.id))
        .order_by_asc(ReviewColumn::CreatedAt)
        .all(db)
        .await?;
    let mut reviews = Vec::with_capacity(review_models.len());
    for review in &review_models {
        reviews.push(super::reviews::review_to_response(db, review).await?);
    }

    let overall_evaluation = EvaluationsEntity::find()
        .filter(EvaluationColumn::AppraisalId.eq(appraisal.id))
        .one(db)
        .await?
        .map(|evaluation| EvaluationResponse::from_model(&evaluation));

    Ok(AppraisalResponse {
        id: appraisal.id,
        cycle: appraisal.cycle_id,
        cycle_info: CycleInfo {
            period_start: cycle.period_start,
            period_end: cycle.period_end,
            status: cycle.status,
        },
        appraisee: appraisal.appraisee_id,
        appraisee_name,
        project: appraisal.project_id,
        project_name,
        discussion_date: appraisal.discussion_date,
        status: appraisal.status.clone(),
        reviews,
        overall_evaluation,
        created_at: appraisal.created_at,
        updated_at: appraisal.updated_at,
    })
}

/// Loads an appraisal the caller is allowed to see, or 404.
///
/// Non-staff callers only see appraisals in projects they belong to.
pub(crate) async fn find_visible_appraisal(
    state: &AppState,
    user: &AuthenticatedUser,
    appraisal_id: Uuid,
) -> Result<entity::appraisals::Model> {
    let appraisal = AppraisalsEntity::find_by_id(appraisal_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Appraisal not found"))?;

    if !user.is_staff && !auth::access::is_project_member(&state.db, appraisal.project_id, user.id).await? {
        return Err(AppError::not_found("Appraisal not found"));
    }

    Ok(appraisal)
}

/// List appraisals visible to the caller.
pub async fn list_appraisals_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<AppraisalListResponse>> {
    let mut select = AppraisalsEntity::find().order_by_desc(AppraisalColumn::CreatedAt);

    if !user.is_staff {
        let project_ids = member_project_ids(&state.db, user.id).await?;
        select = select.filter(AppraisalColumn::ProjectId.is_in(project_ids));
    }

    let (appraisals, pagination) = super::fetch_page(&state.db, select, &query).await?;

    let mut responses = Vec::with_capacity(appraisals.len());
    for appraisal in &appraisals {
        responses.push(appraisal_to_response(&state.db, appraisal).await?);
    }

    Ok(Json(AppraisalListResponse {
        success: true,
        appraisals: responses,
        pagination,
    }))
}

/// Create an appraisal.
///
/// Authorization: the caller must be a REPORTER on the project and the
/// appraisee a member of it (staff bypass). The appraisal, the caller's
/// review, and the empty overall evaluation are inserted in one transaction;
/// if any insert fails none of them persist.
pub async fn create_appraisal_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateAppraisalRequest>,
) -> Result<(StatusCode, Json<AppraisalResponse>)> {
    let cycle = CyclesEntity::find_by_id(req.cycle)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Cycle not found"))?;

    let appraisee = UsersEntity::find_by_id(req.appraisee)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Appraisee not found"))?;

    let project = ProjectsEntity::find_by_id(req.project)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;

    ensure_can_create_appraisal(&state.db, &user.actor(), project.id, appraisee.id).await?;

    let now = Utc::now();
    let txn = state.db.begin().await?;

    let appraisal = entity::appraisals::ActiveModel {
        id: Set(Uuid::new_v4()),
        cycle_id: Set(cycle.id),
        appraisee_id: Set(appraisee.id),
        project_id: Set(project.id),
        discussion_date: Set(req.discussion_date),
        status: Set(req.status.unwrap_or(AppraisalStatus::Pending)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    entity::appraisal_reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        appraisal_id: Set(appraisal.id),
        reviewer_id: Set(user.id),
        is_completed: Set(false),
        reviewer_signature: Set(None),
        reviewer_signed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    entity::overall_evaluations::ActiveModel {
        id: Set(Uuid::new_v4()),
        appraisal_id: Set(appraisal.id),
        overall_rating_avg: Set(None),
        ready_for_advanced_work: Set(false),
        ready_for_promotion: Set(false),
        summary_comment: Set(String::new()),
        appraisee_signature: Set(None),
        appraisee_signed_at: Set(None),
        hr_signature: Set(None),
        hr_signed_at: Set(None),
        finalized_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        appraisal_id = %appraisal.id,
        appraisee_id = %appraisee.id,
        project_id = %project.id,
        user_id = %user.id,
        "Appraisal created"
    );

    let response = appraisal_to_response(&state.db, &appraisal).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a single appraisal.
pub async fn get_appraisal_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(appraisal_id): Path<Uuid>,
) -> Result<Json<AppraisalResponse>> {
    let appraisal = find_visible_appraisal(&state, &user, appraisal_id).await?;
    Ok(Json(appraisal_to_response(&state.db, &appraisal).await?))
}

/// Update an appraisal's discussion date or status.
pub async fn update_appraisal_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(appraisal_id): Path<Uuid>,
    Json(req): Json<UpdateAppraisalRequest>,
) -> Result<Json<AppraisalResponse>> {
    let appraisal = find_visible_appraisal(&state, &user, appraisal_id).await?;

    let actor = user.actor();
    ensure_reporter(&state.db, &actor, &appraisal).await?;
    ensure_same_project(&state.db, &actor, &appraisal).await?;

    let mut active: entity::appraisals::ActiveModel = appraisal.into();
    if let Some(discussion_date) = req.discussion_date {
        active.discussion_date = Set(Some(discussion_date));
    }
    if let Some(status) = req.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    info!(appraisal_id = %appraisal_id, user_id = %user.id, "Appraisal updated");

    Ok(Json(appraisal_to_response(&state.db, &updated).await?))
}

/// Deletes an appraisal with its reviews, their ratings, and its evaluation.
///
/// Kept explicit rather than leaning on database-level cascades so the
/// behavior holds on engines without foreign-key enforcement enabled.
pub(crate) async fn delete_appraisal_tree<C: ConnectionTrait>(db: &C, appraisal_id: Uuid) -> Result<()> {
    let review_ids: Vec<Uuid> = ReviewsEntity::find()
        .filter(ReviewColumn::AppraisalId.eq(appraisal_id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect();

    if !review_ids.is_empty() {
        RatingsEntity::delete_many()
            .filter(RatingColumn::ReviewId.is_in(review_ids))
            .exec(db)
            .await?;
    }

    ReviewsEntity::delete_many()
        .filter(ReviewColumn::AppraisalId.eq(appraisal_id))
        .exec(db)
        .await?;

    EvaluationsEntity::delete_many()
        .filter(EvaluationColumn::AppraisalId.eq(appraisal_id))
        .exec(db)
        .await?;

    AppraisalsEntity::delete_by_id(appraisal_id).exec(db).await?;

    Ok(())
}

/// Delete an appraisal.
pub async fn delete_appraisal_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(appraisal_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>> {
    let appraisal = find_visible_appraisal(&state, &user, appraisal_id).await?;

    let actor = user.actor();
    ensure_reporter(&state.db, &actor, &appraisal).await?;
    ensure_same_project(&state.db, &actor, &appraisal).await?;

    let txn = state.db.begin().await?;
    delete_appraisal_tree(&txn, appraisal.id).await?;
    txn.commit().await?;

    info!(appraisal_id = %appraisal_id, user_id = %user.id, "Appraisal deleted");

    Ok(Json(SuccessResponse::new("Appraisal deleted")))
}

/// List all reviews of an appraisal.
pub async fn list_appraisal_reviews_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(appraisal_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ReviewListResponse>> {
    let appraisal = find_visible_appraisal(&state, &user, appraisal_id).await?;

    let select = ReviewsEntity::find()
        .filter(ReviewColumn::AppraisalId.eq(appraisal.id))
        .order_by_asc(ReviewColumn::CreatedAt);

    let (review_models, pagination) = super::fetch_page(&state.db, select, &query).await?;

    let mut reviews = Vec::with_capacity(review_models.len());
    for review in &review_models {
        reviews.push(super::reviews::review_to_response(&state.db, review).await?);
    }

    Ok(Json(ReviewListResponse {
        success: true,
        reviews,
        pagination,
    }))
}
