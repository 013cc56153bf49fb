//! # Overall Evaluation Handlers
//!
//! Read and update endpoints for overall evaluations. The evaluation row is
//! created with its appraisal and dies with it; the derived average is never
//! writable here, so updates do not trigger recomputation.

use auth::access::is_project_member;
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use entity::{
    appraisals::{Column as AppraisalColumn, Entity as AppraisalsEntity},
    overall_evaluations::{Column as EvaluationColumn, Entity as EvaluationsEntity},
};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::{
        common::ListQuery,
        evaluations::{EvaluationListResponse, EvaluationResponse, UpdateEvaluationRequest},
    },
    middleware::auth::AuthenticatedUser,
    AppState,
};

/// Loads an evaluation the caller is allowed to see, or 404.
///
/// Non-staff callers only see evaluations of appraisals in their projects.
async fn find_visible_evaluation(
    state: &AppState,
    user: &AuthenticatedUser,
    evaluation_id: Uuid,
) -> Result<(entity::overall_evaluations::Model, entity::appraisals::Model)> {
    let evaluation = EvaluationsEntity::find_by_id(evaluation_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Evaluation not found"))?;

    let appraisal = AppraisalsEntity::find_by_id(evaluation.appraisal_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Evaluation not found"))?;

    if !user.is_staff && !is_project_member(&state.db, appraisal.project_id, user.id).await? {
        return Err(AppError::not_found("Evaluation not found"));
    }

    Ok((evaluation, appraisal))
}

/// List evaluations visible to the caller.
pub async fn list_evaluations_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<EvaluationListResponse>> {
    let mut select = EvaluationsEntity::find().order_by_asc(EvaluationColumn::CreatedAt);

    if !user.is_staff {
        let project_ids = super::appraisals::member_project_ids(&state.db, user.id).await?;
        let appraisal_ids: Vec<Uuid> = AppraisalsEntity::find()
            .filter(AppraisalColumn::ProjectId.is_in(project_ids))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();
        select = select.filter(EvaluationColumn::AppraisalId.is_in(appraisal_ids));
    }

    let (evaluations, pagination) = super::fetch_page(&state.db, select, &query).await?;

    Ok(Json(EvaluationListResponse {
        success: true,
        evaluations: evaluations.iter().map(EvaluationResponse::from_model).collect(),
        pagination,
    }))
}

/// Get a single evaluation.
pub async fn get_evaluation_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(evaluation_id): Path<Uuid>,
) -> Result<Json<EvaluationResponse>> {
    let (evaluation, _) = find_visible_evaluation(&state, &user, evaluation_id).await?;
    Ok(Json(EvaluationResponse::from_model(&evaluation)))
}

/// Update an evaluation's readiness flags, summary, and signatures.
///
/// The appraisee signs here too, so membership on the appraisal's project is
/// sufficient; the reporter role is not required.
pub async fn update_evaluation_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(evaluation_id): Path<Uuid>,
    Json(req): Json<UpdateEvaluationRequest>,
) -> Result<Json<EvaluationResponse>> {
    let (evaluation, _appraisal) = find_visible_evaluation(&state, &user, evaluation_id).await?;

    let mut active: entity::overall_evaluations::ActiveModel = evaluation.into();
    if let Some(ready_for_advanced_work) = req.ready_for_advanced_work {
        active.ready_for_advanced_work = Set(ready_for_advanced_work);
    }
    if let Some(ready_for_promotion) = req.ready_for_promotion {
        active.ready_for_promotion = Set(ready_for_promotion);
    }
    if let Some(summary_comment) = req.summary_comment {
        active.summary_comment = Set(summary_comment);
    }
    if let Some(appraisee_signature) = req.appraisee_signature {
        active.appraisee_signature = Set(Some(appraisee_signature));
    }
    if let Some(appraisee_signed_at) = req.appraisee_signed_at {
        active.appraisee_signed_at = Set(Some(appraisee_signed_at));
    }
    if let Some(hr_signature) = req.hr_signature {
        active.hr_signature = Set(Some(hr_signature));
    }
    if let Some(hr_signed_at) = req.hr_signed_at {
        active.hr_signed_at = Set(Some(hr_signed_at));
    }
    if let Some(finalized_at) = req.finalized_at {
        active.finalized_at = Set(Some(finalized_at));
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    info!(evaluation_id = %evaluation_id, user_id = %user.id, "Overall evaluation updated");

    Ok(Json(EvaluationResponse::from_model(&updated)))
}
