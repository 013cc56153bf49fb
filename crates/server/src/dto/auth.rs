//! # Authentication Data Transfer Objects

use serde::{Deserialize, Serialize};

use super::users::UserResponse;

/// Request body for user login.
///
/// Fields are optional so missing values surface as a 400 validation error
/// rather than a deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    /// Login username
    pub username: Option<String>,
    /// Password
    pub password: Option<String>,
}

/// Response for a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    /// JWT access token
    pub access: String,
    /// Opaque refresh token
    pub refresh: String,
    /// The authenticated user
    pub user: UserResponse,
}

/// Request body for token refresh
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token to exchange
    pub refresh: Option<String>,
}

/// Response for a token refresh. The refresh token rotates on every use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponse {
    /// New JWT access token
    pub access: String,
    /// New refresh token replacing the presented one
    pub refresh: String,
}

/// Request body for logout
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogoutRequest {
    /// The refresh token to revoke
    pub refresh: Option<String>,
}
