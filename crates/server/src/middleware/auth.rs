//! # Authentication Middleware
//!
//! JWT authentication for protected API endpoints:
//! 1. Extracts the Bearer token from the Authorization header
//! 2. Validates the JWT
//! 3. Rejects blacklisted tokens (fail-closed when Redis is unreachable)
//! 4. Adds the authenticated user to request extensions

use auth::{
    access::Actor,
    jwt::{extract_bearer_token, validate_token},
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use error::AppError;
use uuid::Uuid;

use crate::{token_blacklist::hash_token_for_blacklist, AppState};

/// User identity extracted from a validated JWT.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User ID
    pub id: Uuid,
    /// Username
    pub username: String,
    /// User email
    pub email: String,
    /// Staff/administrator flag
    pub is_staff: bool,
    /// Company the user belongs to
    pub company_id: Option<Uuid>,
}

impl AuthenticatedUser {
    /// The authorization-engine identity for this user.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.is_staff)
    }
}

/// Authentication middleware for bearer-protected routes.
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let auth_header = match request.headers().get(header::AUTHORIZATION) {
        Some(header) => match header.to_str() {
            Ok(value) => value,
            Err(_) => {
                return AppError::unauthorized("Invalid authorization header encoding").into_response();
            }
        },
        None => {
            return AppError::unauthorized("Missing authorization header").into_response();
        }
    };

    let token = match extract_bearer_token(auth_header) {
        Some(token) => token,
        None => {
            return AppError::unauthorized("Invalid authorization header format").into_response();
        }
    };

    let claims = match validate_token(&state.jwt_config, &token) {
        Ok(claims) => claims,
        Err(e) => {
            let reason = e.to_string().to_lowercase();
            let message = if reason.contains("expired") {
                "Token has expired"
            } else if reason.contains("signature") {
                "Invalid token signature"
            } else {
                "Invalid token"
            };
            return AppError::unauthorized(message).into_response();
        }
    };

    let token_hash = hash_token_for_blacklist(&token);
    let blacklist = crate::token_blacklist::TokenBlacklist::new(state.redis.clone());
    match blacklist.is_blacklisted(&token_hash).await {
        Ok(true) => {
            return AppError::unauthorized("Token has been revoked").into_response();
        }
        Ok(false) => {}
        Err(e) => {
            // Fail closed: a token we cannot verify is a token we reject.
            tracing::error!("Failed to check token blacklist, denying request: {}", e);
            return AppError::unauthorized("Authentication service temporarily unavailable").into_response();
        }
    }

    let user_id = match Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => {
            return AppError::unauthorized("Invalid token subject").into_response();
        }
    };

    let user = AuthenticatedUser {
        id: user_id,
        username: claims.username,
        email: claims.email,
        is_staff: claims.staff,
        company_id: claims.company,
    };

    request.extensions_mut().insert(user);

    next.run(request).await
}
