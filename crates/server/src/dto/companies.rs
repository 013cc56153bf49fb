//! # Company Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::common::PaginationInfo;

/// Response for a single company
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyResponse {
    /// Company's unique identifier
    pub id: Uuid,
    /// Company name
    pub name: String,
    /// Active flag
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl CompanyResponse {
    /// Builds the response from an entity model.
    #[must_use]
    pub fn from_model(company: &entity::companies::Model) -> Self {
        Self {
            id: company.id,
            name: company.name.clone(),
            is_active: company.is_active,
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}

/// Response for the company list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyListResponse {
    /// Whether the operation was successful
    pub success: bool,
    /// Companies on this page
    pub companies: Vec<CompanyResponse>,
    /// Pagination info
    pub pagination: PaginationInfo,
}
