//! # Appraisal Cycle Handlers
//!
//! CRUD for appraisal cycles. Lists scope to the caller's company unless
//! staff. Period dates are stored as given; `period_start < period_end` is
//! deliberately not validated.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use entity::{
    appraisal_cycles::{Column as CycleColumn, CycleStatus, Entity as CyclesEntity},
    appraisals::{Column as AppraisalColumn, Entity as AppraisalsEntity},
    companies::Entity as CompaniesEntity,
};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::{
        common::{ListQuery, PaginationInfo, SuccessResponse},
        cycles::{CreateCycleRequest, CycleListResponse, CycleResponse, UpdateCycleRequest},
    },
    middleware::auth::AuthenticatedUser,
    AppState,
};

async fn company_name(state: &AppState, company_id: Uuid) -> Result<String> {
    Ok(CompaniesEntity::find_by_id(company_id)
        .one(&state.db)
        .await?
        .map(|c| c.name)
        .unwrap_or_default())
}

/// List cycles visible to the caller.
pub async fn list_cycles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<CycleListResponse>> {
    let mut select = CyclesEntity::find().order_by_desc(CycleColumn::PeriodStart);

    if !user.is_staff {
        let Some(company_id) = user.company_id else {
            return Ok(Json(CycleListResponse {
                success: true,
                cycles: Vec::new(),
                pagination: PaginationInfo::new(query.page(), query.per_page(), 0),
            }));
        };
        select = select.filter(CycleColumn::CompanyId.eq(company_id));
    }

    let (cycles, pagination) = super::fetch_page(&state.db, select, &query).await?;

    let mut responses = Vec::with_capacity(cycles.len());
    for cycle in &cycles {
        responses.push(CycleResponse::from_model(cycle, company_name(&state, cycle.company_id).await?));
    }

    Ok(Json(CycleListResponse {
        success: true,
        cycles: responses,
        pagination,
    }))
}

/// Create an appraisal cycle.
pub async fn create_cycle_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateCycleRequest>,
) -> Result<(StatusCode, Json<CycleResponse>)> {
    let company = CompaniesEntity::find_by_id(req.company)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Company not found"))?;

    let now = Utc::now();
    let cycle = entity::appraisal_cycles::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(company.id),
        period_start: Set(req.period_start),
        period_end: Set(req.period_end),
        status: Set(req.status.unwrap_or(CycleStatus::Draft)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(cycle_id = %cycle.id, company_id = %company.id, user_id = %user.id, "Appraisal cycle created");

    let response = CycleResponse::from_model(&cycle, company.name);
    Ok((StatusCode::CREATED, Json(response)))
}

/// Loads a cycle the caller is allowed to see, or 404.
pub(crate) async fn find_visible_cycle(
    state: &AppState,
    user: &AuthenticatedUser,
    cycle_id: Uuid,
) -> Result<entity::appraisal_cycles::Model> {
    let cycle = CyclesEntity::find_by_id(cycle_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Cycle not found"))?;

    if !user.is_staff && user.company_id != Some(cycle.company_id) {
        return Err(AppError::not_found("Cycle not found"));
    }

    Ok(cycle)
}

/// Get a single cycle.
pub async fn get_cycle_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(cycle_id): Path<Uuid>,
) -> Result<Json<CycleResponse>> {
    let cycle = find_visible_cycle(&state, &user, cycle_id).await?;
    let name = company_name(&state, cycle.company_id).await?;
    Ok(Json(CycleResponse::from_model(&cycle, name)))
}

/// Update a cycle.
pub async fn update_cycle_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(cycle_id): Path<Uuid>,
    Json(req): Json<UpdateCycleRequest>,
) -> Result<Json<CycleResponse>> {
    let cycle = find_visible_cycle(&state, &user, cycle_id).await?;
    let name = company_name(&state, cycle.company_id).await?;

    let mut active: entity::appraisal_cycles::ActiveModel = cycle.into();
    if let Some(period_start) = req.period_start {
        active.period_start = Set(period_start);
    }
    if let Some(period_end) = req.period_end {
        active.period_end = Set(period_end);
    }
    if let Some(status) = req.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    info!(cycle_id = %cycle_id, user_id = %user.id, "Appraisal cycle updated");

    Ok(Json(CycleResponse::from_model(&updated, name)))
}

/// Delete a cycle and everything under it.
///
/// Cascades through the cycle's appraisals to their reviews, ratings, and
/// evaluations in one transaction.
pub async fn delete_cycle_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(cycle_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>> {
    let cycle = find_visible_cycle(&state, &user, cycle_id).await?;

    let txn = state.db.begin().await?;

    let appraisals = AppraisalsEntity::find()
        .filter(AppraisalColumn::CycleId.eq(cycle.id))
        .all(&txn)
        .await?;
    for appraisal in &appraisals {
        super::appraisals::delete_appraisal_tree(&txn, appraisal.id).await?;
    }

    CyclesEntity::delete_by_id(cycle.id).exec(&txn).await?;

    txn.commit().await?;

    info!(cycle_id = %cycle_id, user_id = %user.id, "Appraisal cycle deleted");

    Ok(Json(SuccessResponse::new("Cycle deleted")))
}
