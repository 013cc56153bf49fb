//! # Authentication Handlers
//!
//! Login, logout, token refresh, and the current-user endpoint.

use auth::{
    jwt::{create_access_token, extract_bearer_token},
    password::verify_password,
    secrecy::SecretString,
};
use axum::{extract::State, http::HeaderMap, Extension, Json};
use chrono::Utc;
use entity::users::{Column as UserColumn, Entity as UsersEntity};
use error::{AppError, Result};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::info;

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RefreshResponse},
        common::SuccessResponse,
        users::UserResponse,
    },
    middleware::auth::AuthenticatedUser,
    refresh_tokens::{
        create_refresh_token, generate_refresh_token, revoke_refresh_token, validate_refresh_token,
        REFRESH_TOKEN_TTL_SECONDS,
    },
    token_blacklist::{hash_token_for_blacklist, TokenBlacklist},
    AppState,
};

/// Log a user in with username and password.
///
/// Returns a JWT access token, an opaque refresh token, and the user record.
pub async fn login_handler(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Result<Json<LoginResponse>> {
    let (Some(username), Some(password)) = (req.username, req.password) else {
        return Err(AppError::validation("Please provide both username and password"));
    };

    let user = UsersEntity::find()
        .filter(UserColumn::Username.eq(&username))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    let password_secret = SecretString::from(password);
    verify_password(&password_secret, &user.password_hash)
        .map_err(|_| AppError::unauthorized("Invalid credentials"))?;

    if !user.is_active {
        return Err(AppError::unauthorized("Account is not active"));
    }

    let access = create_access_token(&state.jwt_config, &user)?;
    let refresh = generate_refresh_token();
    create_refresh_token(&state.db, user.id, &refresh, REFRESH_TOKEN_TTL_SECONDS).await?;

    info!(user_id = %user.id, username = %username, "User logged in");

    Ok(Json(LoginResponse {
        access,
        refresh,
        user: UserResponse::from_model(&user),
    }))
}

/// Log the caller out.
///
/// Revokes the presented refresh token server-side and blacklists the access
/// token for the remainder of its lifetime. An unknown refresh token is a
/// 400.
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    headers: HeaderMap,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<SuccessResponse>> {
    let Some(refresh) = req.refresh else {
        return Err(AppError::validation("Please provide the refresh token"));
    };

    revoke_refresh_token(&state.db, &refresh).await?;

    // Blacklisting the access token is best-effort; the refresh token is
    // already dead.
    if let Some(token) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
    {
        let token_hash = hash_token_for_blacklist(&token);
        let blacklist = TokenBlacklist::new(state.redis.clone());
        let expires_at = Utc::now() + chrono::Duration::seconds(state.jwt_config.expiration_seconds as i64);
        if let Err(e) = blacklist.blacklist_token(&token_hash, expires_at).await {
            tracing::warn!("Failed to blacklist access token on logout: {}", e);
        }
    }

    info!(user_id = %user.id, "User logged out");

    Ok(Json(SuccessResponse::new("Logout successful")))
}

/// Return the authenticated caller's user record.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>> {
    let model = UsersEntity::find_by_id(user.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::unauthorized("User account no longer exists"))?;

    Ok(Json(UserResponse::from_model(&model)))
}

/// Exchange a valid refresh token for a new access token.
///
/// The refresh token rotates: the presented one is revoked and a new one is
/// issued alongside the access token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let Some(refresh) = req.refresh else {
        return Err(AppError::validation("Please provide the refresh token"));
    };

    let user_id = validate_refresh_token(&state.db, &refresh).await?;

    let user = UsersEntity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::unauthorized("User associated with refresh token not found"))?;

    if !user.is_active {
        return Err(AppError::unauthorized("Account is not active"));
    }

    let access = create_access_token(&state.jwt_config, &user)?;

    let new_refresh = generate_refresh_token();
    create_refresh_token(&state.db, user.id, &new_refresh, REFRESH_TOKEN_TTL_SECONDS).await?;
    revoke_refresh_token(&state.db, &refresh).await?;

    info!(user_id = %user.id, "Refresh token rotated");

    Ok(Json(RefreshResponse {
        access,
        refresh: new_refresh,
    }))
}
