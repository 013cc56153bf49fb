//! # Project & Membership Data Transfer Objects

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common::PaginationInfo;

/// Response for a single project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectResponse {
    /// Project's unique identifier
    pub id: Uuid,
    /// Owning company
    pub company: Uuid,
    /// Owning company name
    pub company_name: String,
    /// Project name
    pub name: String,
    /// Description
    pub description: String,
    /// Active flag
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl ProjectResponse {
    /// Builds the response from a project and its company name.
    #[must_use]
    pub fn from_model(project: &entity::projects::Model, company_name: String) -> Self {
        Self {
            id: project.id,
            company: project.company_id,
            company_name,
            name: project.name.clone(),
            description: project.description.clone(),
            is_active: project.is_active,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Response for the project list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectListResponse {
    /// Whether the operation was successful
    pub success: bool,
    /// Projects on this page
    pub projects: Vec<ProjectResponse>,
    /// Pagination info
    pub pagination: PaginationInfo,
}

/// Response for a project membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipResponse {
    /// Membership record ID
    pub id: Uuid,
    /// Project
    pub project: Uuid,
    /// Project name
    pub project_name: String,
    /// Member user
    pub user: Uuid,
    /// Member's full name
    pub user_name: String,
    /// Member's email
    pub user_email: String,
    /// Role in the project (REPORTER or MEMBER)
    pub role: entity::project_memberships::ProjectRole,
    /// When the user joined the project
    pub joined_at: NaiveDate,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Response for membership lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipListResponse {
    /// Whether the operation was successful
    pub success: bool,
    /// Memberships on this page
    pub memberships: Vec<MembershipResponse>,
    /// Pagination info
    pub pagination: PaginationInfo,
}

/// Request to create a project membership
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateMembershipRequest {
    /// Target project
    pub project: Uuid,
    /// User to add
    pub user: Uuid,
    /// Role to grant (REPORTER or MEMBER, default MEMBER)
    pub role: Option<String>,
}

/// Request to change a membership's role
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateMembershipRequest {
    /// New role (REPORTER or MEMBER)
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}
