//! # JWT Token Management
//!
//! JWT access token generation and validation for API authentication.

use std::{
    collections::HashSet,
    time::{Duration, SystemTime},
};

use base64::Engine as _;
use cuid2::CuidConstructor;
use error::{AppError, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Base64-encoded HMAC secret
    pub secret: String,
    /// Access token lifetime in seconds
    pub expiration_seconds: u64,
    /// Token issuer
    pub issuer: String,
    /// Token audience
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = std::env::var("MERIDIAN_JWT_SECRET").unwrap_or_else(|_| {
            base64::engine::general_purpose::STANDARD.encode("meridian-dev-secret-change-in-production")
        });
        Self {
            secret,
            expiration_seconds: std::env::var("MERIDIAN_JWT_EXPIRATION_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            issuer: "meridian".to_string(),
            audience: "meridian-api".to_string(),
        }
    }
}

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Username used at login
    pub username: String,

    /// User email
    pub email: String,

    /// Staff/administrator flag
    pub staff: bool,

    /// Company the user belongs to (absent for staff-only accounts)
    pub company: Option<Uuid>,

    /// Token issuer
    pub iss: String,

    /// Token audience
    pub aud: String,

    /// Expiration time (Unix timestamp)
    pub exp: u64,

    /// Issued at (Unix timestamp)
    pub iat: u64,

    /// Unique token ID
    pub jti: String,
}

/// Creates a new JWT access token for a user.
///
/// # Errors
///
/// Returns an error if the secret is invalid or encoding fails.
pub fn create_access_token(config: &JwtConfig, user: &entity::users::Model) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| AppError::internal(format!("Failed to get current time: {}", e)))?;

    let issued_at = now.as_secs();
    let expiration = now + Duration::from_secs(config.expiration_seconds);

    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        staff: user.is_staff,
        company: user.company_id,
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        exp: expiration.as_secs(),
        iat: issued_at,
        jti: CuidConstructor::new().with_length(32).create_id(),
    };

    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_base64_secret(&config.secret)
            .map_err(|e| AppError::config(format!("Invalid JWT secret: {}", e)))?,
    )
    .map_err(|e| AppError::internal(format!("Failed to encode token: {}", e)))?;

    Ok(token)
}

/// Validates a JWT access token and returns the claims.
///
/// # Errors
///
/// Returns `Unauthorized` if the token is expired, malformed, or was not
/// issued for this service.
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims> {
    let decoding_key = DecodingKey::from_base64_secret(&config.secret)
        .map_err(|e| AppError::config(format!("Invalid JWT secret: {}", e)))?;

    let mut validation = Validation::default();
    validation.iss = Some(HashSet::from([config.issuer.clone()]));
    validation.aud = Some(HashSet::from([config.audience.clone()]));
    validation.validate_exp = true;

    let claims = jsonwebtoken::decode(token, &decoding_key, &validation)
        .map_err(|e| AppError::unauthorized(format!("Token validation failed: {}", e)))?;

    Ok(claims.claims)
}

/// Extracts the Bearer token from an Authorization header value.
///
/// Returns None if the header is missing the scheme or the token is empty.
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    if !auth_header.starts_with("Bearer ") {
        return None;
    }

    let token = auth_header.trim_start_matches("Bearer ").trim();

    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use base64::Engine;

    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: base64::engine::general_purpose::STANDARD.encode("test-secret-key-that-is-at-least-32-bytes-long"),
            expiration_seconds: 3600,
            issuer: "test-issuer".to_string(),
            audience: "test-audience".to_string(),
        }
    }

    fn test_user(is_staff: bool, company_id: Option<Uuid>) -> entity::users::Model {
        entity::users::Model {
            id: Uuid::new_v4(),
            username: "rhall".to_string(),
            email: "rhall@example.com".to_string(),
            password_hash: String::new(),
            first_name: "Riley".to_string(),
            last_name: "Hall".to_string(),
            company_id,
            position: "Engineer".to_string(),
            division: "Platform".to_string(),
            date_joined: None,
            last_promotion_date: None,
            is_active: true,
            is_staff,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_create_and_validate_token() {
        let config = test_config();
        let company = Uuid::new_v4();
        let user = test_user(false, Some(company));

        let token = create_access_token(&config, &user).expect("Failed to create token");
        assert!(!token.is_empty());

        let claims = validate_token(&config, &token).expect("Failed to validate token");
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "rhall");
        assert_eq!(claims.email, "rhall@example.com");
        assert!(!claims.staff);
        assert_eq!(claims.company, Some(company));
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-audience");
    }

    #[test]
    fn test_staff_claims_carry_no_company() {
        let config = test_config();
        let user = test_user(true, None);

        let token = create_access_token(&config, &user).unwrap();
        let claims = validate_token(&config, &token).unwrap();
        assert!(claims.staff);
        assert!(claims.company.is_none());
    }

    #[test]
    fn test_validate_rejects_wrong_audience() {
        let config = test_config();
        let user = test_user(false, None);
        let token = create_access_token(&config, &user).unwrap();

        let other = JwtConfig {
            audience: "someone-else".to_string(),
            ..test_config()
        };
        assert!(validate_token(&other, &token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123".to_string()));
        assert_eq!(extract_bearer_token("Bearer   abc123   "), Some("abc123".to_string()));
        assert!(extract_bearer_token("Basic abc123").is_none());
        assert!(extract_bearer_token("Bearer").is_none());
        assert!(extract_bearer_token("").is_none());
    }
}
