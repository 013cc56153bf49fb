//! # Project-Role Authorization
//!
//! Authorization rules for the appraisal workflow. Write access hangs off
//! project memberships: reporters author appraisals and reviews for members
//! of their projects, staff accounts bypass every project check.
//!
//! Resources that can be written (appraisals, reviews, ratings) resolve
//! their owning project through [`ResolveProject`]; anything that cannot
//! resolve a project never reaches a write gate.

use async_trait::async_trait;
use entity::{
    appraisal_reviews, appraisals, competency_ratings,
    project_memberships::{self, ProjectRole},
    projects,
};
use error::{AppError, Result};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

/// The acting identity a request is authorized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User ID
    pub id: Uuid,
    /// Staff/administrator flag. Staff short-circuit every project check.
    pub is_staff: bool,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub fn new(id: Uuid, is_staff: bool) -> Self {
        Self { id, is_staff }
    }
}

/// Checks whether a user holds a REPORTER membership on a project.
pub async fn is_reporter<C: ConnectionTrait>(db: &C, project_id: Uuid, user_id: Uuid) -> Result<bool> {
    let membership = project_memberships::Entity::find()
        .filter(project_memberships::Column::ProjectId.eq(project_id))
        .filter(project_memberships::Column::UserId.eq(user_id))
        .filter(project_memberships::Column::Role.eq(ProjectRole::Reporter))
        .one(db)
        .await?;

    Ok(membership.is_some())
}

/// Checks whether a user holds any membership on a project.
pub async fn is_project_member<C: ConnectionTrait>(db: &C, project_id: Uuid, user_id: Uuid) -> Result<bool> {
    let membership = project_memberships::Entity::find()
        .filter(project_memberships::Column::ProjectId.eq(project_id))
        .filter(project_memberships::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    Ok(membership.is_some())
}

/// Resolution of a writable resource to its owning project.
///
/// Each authorizable resource exposes project resolution explicitly instead
/// of the caller probing for `project`/`appraisal` fields.
#[async_trait]
pub trait ResolveProject {
    /// Loads the project this resource belongs to.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the ownership chain is broken.
    async fn resolve_project<C: ConnectionTrait>(&self, db: &C) -> Result<projects::Model>;
}

#[async_trait]
impl ResolveProject for appraisals::Model {
    async fn resolve_project<C: ConnectionTrait>(&self, db: &C) -> Result<projects::Model> {
        projects::Entity::find_by_id(self.project_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))
    }
}

#[async_trait]
impl ResolveProject for appraisal_reviews::Model {
    async fn resolve_project<C: ConnectionTrait>(&self, db: &C) -> Result<projects::Model> {
        let appraisal = appraisals::Entity::find_by_id(self.appraisal_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Appraisal not found"))?;
        appraisal.resolve_project(db).await
    }
}

#[async_trait]
impl ResolveProject for competency_ratings::Model {
    async fn resolve_project<C: ConnectionTrait>(&self, db: &C) -> Result<projects::Model> {
        let review = appraisal_reviews::Entity::find_by_id(self.review_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Appraisal review not found"))?;
        review.resolve_project(db).await
    }
}

/// Gate for appraisal creation.
///
/// The actor must hold a REPORTER membership on the target project and the
/// designated appraisee must hold any membership on that same project. Staff
/// bypass both checks. Denials name the missing precondition.
pub async fn ensure_can_create_appraisal<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    project_id: Uuid,
    appraisee_id: Uuid,
) -> Result<()> {
    if actor.is_staff {
        return Ok(());
    }

    if !is_reporter(db, project_id, actor.id).await? {
        return Err(AppError::forbidden(
            "You must be a REPORTER in the project to create appraisals",
        ));
    }

    if !is_project_member(db, project_id, appraisee_id).await? {
        return Err(AppError::forbidden("Appraisee is not a member of this project"));
    }

    Ok(())
}

/// Gate for writes to appraisals, reviews, and ratings.
///
/// The actor must be a REPORTER on the resource's resolved project, or
/// staff. Returns the project so callers don't resolve twice.
pub async fn ensure_reporter<C, R>(db: &C, actor: &Actor, resource: &R) -> Result<projects::Model>
where
    C: ConnectionTrait,
    R: ResolveProject + Sync,
{
    let project = resource.resolve_project(db).await?;

    if actor.is_staff || is_reporter(db, project.id, actor.id).await? {
        Ok(project)
    } else {
        Err(AppError::forbidden("You must be a REPORTER in this project"))
    }
}

/// Symmetric same-project gate.
///
/// The actor and the appraisee must both hold memberships on the appraisal's
/// project. Staff bypass.
pub async fn ensure_same_project<C: ConnectionTrait>(db: &C, actor: &Actor, appraisal: &appraisals::Model) -> Result<()> {
    if actor.is_staff {
        return Ok(());
    }

    let actor_in_project = is_project_member(db, appraisal.project_id, actor.id).await?;
    let appraisee_in_project = is_project_member(db, appraisal.project_id, appraisal.appraisee_id).await?;

    if actor_in_project && appraisee_in_project {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "You can only appraise users in projects where you are both members",
        ))
    }
}
