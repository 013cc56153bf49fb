//! # User Data Transfer Objects

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::common::PaginationInfo;

/// Response for a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    /// User's unique identifier
    pub id: Uuid,
    /// Login username
    pub username: String,
    /// Email address
    pub email: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// First and last name joined
    pub full_name: String,
    /// Company the user belongs to
    pub company: Option<Uuid>,
    /// Job position
    pub position: String,
    /// Division within the company
    pub division: String,
    /// Date the user joined the company
    pub date_joined: Option<NaiveDate>,
    /// Date of the last promotion
    pub last_promotion_date: Option<NaiveDate>,
    /// Active flag
    pub is_active: bool,
    /// Staff/administrator flag
    pub is_staff: bool,
}

impl UserResponse {
    /// Builds the response from an entity model.
    #[must_use]
    pub fn from_model(user: &entity::users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            company: user.company_id,
            position: user.position.clone(),
            division: user.division.clone(),
            date_joined: user.date_joined,
            last_promotion_date: user.last_promotion_date,
            is_active: user.is_active,
            is_staff: user.is_staff,
        }
    }
}

/// Response for the user list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListResponse {
    /// Whether the operation was successful
    pub success: bool,
    /// Users on this page
    pub users: Vec<UserResponse>,
    /// Pagination info
    pub pagination: PaginationInfo,
}
