//! # Refresh Token Service
//!
//! Opaque refresh tokens stored server-side as BLAKE3 hashes. Logout and
//! rotation revoke tokens by setting `revoked_at`, so a token presented
//! after revocation fails validation.

use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// Refresh token lifetime: 30 days.
pub const REFRESH_TOKEN_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;

fn hash_token(token_value: &str) -> String {
    blake3::hash(token_value.as_bytes()).to_hex().to_string()
}

/// Generates a secure random refresh token value.
///
/// 32 random bytes, URL-safe base64 without padding.
#[must_use]
pub fn generate_refresh_token() -> String {
    let random_bytes = rand::random::<[u8; 32]>();
    general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Stores a new refresh token for a user.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn create_refresh_token<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    token_value: &str,
    expires_in_seconds: u64,
) -> Result<entity::refresh_tokens::Model> {
    let now = Utc::now();
    let active = entity::refresh_tokens::ActiveModel {
        user_id: Set(user_id),
        token_hash: Set(hash_token(token_value)),
        expires_at: Set(now + chrono::Duration::seconds(expires_in_seconds as i64)),
        revoked_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = active
        .insert(db)
        .await
        .map_err(|e| AppError::database(format!("Failed to create refresh token: {}", e)))?;

    Ok(model)
}

/// Validates a refresh token and returns the associated user ID.
///
/// # Errors
///
/// Returns `Unauthorized` if the token is unknown, revoked, or expired.
pub async fn validate_refresh_token<C: ConnectionTrait>(db: &C, token_value: &str) -> Result<Uuid> {
    let token = entity::refresh_tokens::Entity::find()
        .filter(entity::refresh_tokens::Column::TokenHash.eq(hash_token(token_value)))
        .filter(entity::refresh_tokens::Column::RevokedAt.is_null())
        .one(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

    if token.expires_at < Utc::now() {
        return Err(AppError::unauthorized("Refresh token has expired"));
    }

    Ok(token.user_id)
}

/// Revokes a refresh token.
///
/// # Errors
///
/// Returns `Validation` if the token is unknown or already revoked, so
/// logout with a bad token surfaces as 400.
pub async fn revoke_refresh_token<C: ConnectionTrait>(db: &C, token_value: &str) -> Result<()> {
    let token = entity::refresh_tokens::Entity::find()
        .filter(entity::refresh_tokens::Column::TokenHash.eq(hash_token(token_value)))
        .filter(entity::refresh_tokens::Column::RevokedAt.is_null())
        .one(db)
        .await?
        .ok_or_else(|| AppError::validation("Refresh token not found"))?;

    let mut active: entity::refresh_tokens::ActiveModel = token.into();
    active.revoked_at = Set(Some(Utc::now()));
    active.updated_at = Set(Utc::now());
    active
        .update(db)
        .await
        .map_err(|e| AppError::database(format!("Failed to revoke refresh token: {}", e)))?;

    Ok(())
}
