//! # Project Handlers
//!
//! Read-only project endpoints plus the members/reporters sub-resources.
//! Lists scope to the caller's company unless the caller is staff.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use entity::{
    companies::Entity as CompaniesEntity,
    project_memberships::{Column as MembershipColumn, Entity as MembershipsEntity, ProjectRole},
    projects::{Column as ProjectColumn, Entity as ProjectsEntity},
};
use error::{AppError, Result};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    dto::{
        common::{ListQuery, PaginationInfo},
        projects::{MembershipListResponse, ProjectListResponse, ProjectResponse},
    },
    middleware::auth::AuthenticatedUser,
    AppState,
};

/// List active projects visible to the caller.
pub async fn list_projects_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProjectListResponse>> {
    let mut select = ProjectsEntity::find()
        .filter(ProjectColumn::IsActive.eq(true))
        .order_by_asc(ProjectColumn::Name);

    if !user.is_staff {
        let Some(company_id) = user.company_id else {
            return Ok(Json(ProjectListResponse {
                success: true,
                projects: Vec::new(),
                pagination: PaginationInfo::new(query.page(), query.per_page(), 0),
            }));
        };
        select = select.filter(ProjectColumn::CompanyId.eq(company_id));
    }

    let (projects, pagination) = super::fetch_page(&state.db, select, &query).await?;

    let mut responses = Vec::with_capacity(projects.len());
    for project in &projects {
        let company_name = CompaniesEntity::find_by_id(project.company_id)
            .one(&state.db)
            .await?
            .map(|c| c.name)
            .unwrap_or_default();
        responses.push(ProjectResponse::from_model(project, company_name));
    }

    Ok(Json(ProjectListResponse {
        success: true,
        projects: responses,
        pagination,
    }))
}

/// Loads a project the caller is allowed to see, or 404.
///
/// Out-of-scope and absent projects are indistinguishable to the caller.
pub(crate) async fn find_visible_project(
    state: &AppState,
    user: &AuthenticatedUser,
    project_id: Uuid,
) -> Result<entity::projects::Model> {
    let project = ProjectsEntity::find_by_id(project_id)
        .one(&state.db)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::not_found("Project not found"))?;

    if !user.is_staff && user.company_id != Some(project.company_id) {
        return Err(AppError::not_found("Project not found"));
    }

    Ok(project)
}

/// Get a single project.
pub async fn get_project_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectResponse>> {
    let project = find_visible_project(&state, &user, project_id).await?;

    let company_name = CompaniesEntity::find_by_id(project.company_id)
        .one(&state.db)
        .await?
        .map(|c| c.name)
        .unwrap_or_default();

    Ok(Json(ProjectResponse::from_model(&project, company_name)))
}

/// List all members of a project.
pub async fn list_project_members_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<MembershipListResponse>> {
    let project = find_visible_project(&state, &user, project_id).await?;

    let select = MembershipsEntity::find()
        .filter(MembershipColumn::ProjectId.eq(project.id))
        .order_by_asc(MembershipColumn::JoinedAt);

    let (memberships, pagination) = super::fetch_page(&state.db, select, &query).await?;

    let mut responses = Vec::with_capacity(memberships.len());
    for membership in &memberships {
        responses.push(super::memberships::membership_to_response(&state.db, membership).await?);
    }

    Ok(Json(MembershipListResponse {
        success: true,
        memberships: responses,
        pagination,
    }))
}

/// List the reporters of a project.
pub async fn list_project_reporters_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<MembershipListResponse>> {
    let project = find_visible_project(&state, &user, project_id).await?;

    let select = MembershipsEntity::find()
        .filter(MembershipColumn::ProjectId.eq(project.id))
        .filter(MembershipColumn::Role.eq(ProjectRole::Reporter))
        .order_by_asc(MembershipColumn::JoinedAt);

    let (memberships, pagination) = super::fetch_page(&state.db, select, &query).await?;

    let mut responses = Vec::with_capacity(memberships.len());
    for membership in &memberships {
        responses.push(super::memberships::membership_to_response(&state.db, membership).await?);
    }

    Ok(Json(MembershipListResponse {
        success: true,
        memberships: responses,
        pagination,
    }))
}
