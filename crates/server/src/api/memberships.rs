//! # Project Membership Handlers
//!
//! CRUD for project memberships. Non-staff callers only see and touch their
//! own membership rows; duplicate (project, user) pairs are a 409.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use entity::{
    project_memberships::{Column as MembershipColumn, Entity as MembershipsEntity, ProjectRole},
    projects::Entity as ProjectsEntity,
    users::Entity as UsersEntity,
};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        common::{ListQuery, SuccessResponse},
        projects::{CreateMembershipRequest, MembershipListResponse, MembershipResponse, UpdateMembershipRequest},
    },
    middleware::auth::AuthenticatedUser,
    AppState,
};

/// Convert a membership entity model to a response DTO.
pub(crate) async fn membership_to_response<C: ConnectionTrait>(
    db: &C,
    membership: &entity::project_memberships::Model,
) -> Result<MembershipResponse> {
    let project_name = ProjectsEntity::find_by_id(membership.project_id)
        .one(db)
        .await?
        .map(|p| p.name)
        .unwrap_or_default();

    let (user_name, user_email) = match UsersEntity::find_by_id(membership.user_id).one(db).await? {
        Some(user) => (user.full_name(), user.email),
        None => (String::new(), String::new()),
    };

    Ok(MembershipResponse {
        id: membership.id,
        project: membership.project_id,
        project_name,
        user: membership.user_id,
        user_name,
        user_email,
        role: membership.role.clone(),
        joined_at: membership.joined_at,
        created_at: membership.created_at,
    })
}

/// Parse a project role string into the enum.
fn parse_project_role(role_str: &str) -> Result<ProjectRole> {
    match role_str.to_uppercase().as_str() {
        "REPORTER" => Ok(ProjectRole::Reporter),
        "MEMBER" => Ok(ProjectRole::Member),
        _ => Err(AppError::validation("Invalid role. Must be one of: REPORTER, MEMBER")),
    }
}

/// List memberships visible to the caller (own rows unless staff).
pub async fn list_memberships_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<MembershipListResponse>> {
    let mut select = MembershipsEntity::find().order_by_asc(MembershipColumn::JoinedAt);

    if !user.is_staff {
        select = select.filter(MembershipColumn::UserId.eq(user.id));
    }

    let (memberships, pagination) = super::fetch_page(&state.db, select, &query).await?;

    let mut responses = Vec::with_capacity(memberships.len());
    for membership in &memberships {
        responses.push(membership_to_response(&state.db, membership).await?);
    }

    Ok(Json(MembershipListResponse {
        success: true,
        memberships: responses,
        pagination,
    }))
}

/// Add a user to a project.
pub async fn create_membership_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateMembershipRequest>,
) -> Result<(StatusCode, Json<MembershipResponse>)> {
    req.validate().map_err(AppError::from)?;

    let project = ProjectsEntity::find_by_id(req.project)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;

    let target_user = UsersEntity::find_by_id(req.user)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let role = match req.role.as_deref() {
        Some(role_str) => parse_project_role(role_str)?,
        None => ProjectRole::Member,
    };

    let existing = MembershipsEntity::find()
        .filter(MembershipColumn::ProjectId.eq(project.id))
        .filter(MembershipColumn::UserId.eq(target_user.id))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::conflict("User is already a member of this project"));
    }

    let now = Utc::now();
    let membership = entity::project_memberships::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(project.id),
        user_id: Set(target_user.id),
        role: Set(role),
        joined_at: Set(now.date_naive()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(
        project_id = %project.id,
        target_user_id = %target_user.id,
        user_id = %user.id,
        "Project membership created"
    );

    let response = membership_to_response(&state.db, &membership).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Loads a membership the caller is allowed to see, or 404.
async fn find_visible_membership(
    state: &AppState,
    user: &AuthenticatedUser,
    membership_id: Uuid,
) -> Result<entity::project_memberships::Model> {
    let membership = MembershipsEntity::find_by_id(membership_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Membership not found"))?;

    if !user.is_staff && membership.user_id != user.id {
        return Err(AppError::not_found("Membership not found"));
    }

    Ok(membership)
}

/// Get a single membership.
pub async fn get_membership_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(membership_id): Path<Uuid>,
) -> Result<Json<MembershipResponse>> {
    let membership = find_visible_membership(&state, &user, membership_id).await?;
    Ok(Json(membership_to_response(&state.db, &membership).await?))
}

/// Change a membership's role.
pub async fn update_membership_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(membership_id): Path<Uuid>,
    Json(req): Json<UpdateMembershipRequest>,
) -> Result<Json<MembershipResponse>> {
    req.validate().map_err(AppError::from)?;

    let membership = find_visible_membership(&state, &user, membership_id).await?;
    let role = parse_project_role(&req.role)?;

    let mut active: entity::project_memberships::ActiveModel = membership.into();
    active.role = Set(role);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    info!(membership_id = %membership_id, user_id = %user.id, "Project membership updated");

    Ok(Json(membership_to_response(&state.db, &updated).await?))
}

/// Remove a membership.
pub async fn delete_membership_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(membership_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>> {
    let membership = find_visible_membership(&state, &user, membership_id).await?;

    MembershipsEntity::delete_by_id(membership.id).exec(&state.db).await?;

    info!(membership_id = %membership_id, user_id = %user.id, "Project membership removed");

    Ok(Json(SuccessResponse::new("Membership removed")))
}
