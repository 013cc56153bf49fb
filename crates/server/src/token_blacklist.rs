//! # Access Token Blacklist
//!
//! Redis-backed invalidation store for revoked access tokens. Logout hashes
//! the presented access token and blacklists it for the remainder of its
//! lifetime; the auth middleware rejects blacklisted tokens.

use chrono::{DateTime, Utc};
use error::Result;
use redis::AsyncCommands;
use tracing::debug;

/// Hash an access token for use as a blacklist key.
#[must_use]
pub fn hash_token_for_blacklist(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}

/// Token blacklist service.
#[derive(Clone, Debug)]
pub struct TokenBlacklist {
    client: redis::Client,
}

impl TokenBlacklist {
    /// Create a new token blacklist service.
    #[must_use]
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    /// Add a token hash to the blacklist until the token's natural expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis operation fails.
    pub async fn blacklist_token(&self, token_hash: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let now = Utc::now();
        let ttl_seconds = if expires_at > now {
            (expires_at - now).num_seconds()
        } else {
            // Already expired; keep a short entry in case of clock skew.
            300
        };

        let key = format!("blacklist:token:{}", token_hash);
        let _: () = conn.set_ex(key, "revoked", ttl_seconds as u64).await?;

        debug!(token_hash = %token_hash, ttl_seconds, "Access token blacklisted");

        Ok(())
    }

    /// Check whether a token hash is blacklisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis operation fails.
    pub async fn is_blacklisted(&self, token_hash: &str) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = format!("blacklist:token:{}", token_hash);
        let value: Option<String> = conn.get(key).await?;

        Ok(value.is_some())
    }
}
