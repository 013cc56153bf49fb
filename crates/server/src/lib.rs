//! # Meridian API Server
//!
//! Axum-based HTTP API for the appraisal workflow.
//!
//! ## Modules
//!
//! - [`api`]: Request handlers per resource
//! - [`aggregation`]: Overall-rating recomputation
//! - [`dto`]: Request/response data transfer objects
//! - [`middleware`]: JWT authentication middleware
//! - [`router`]: API route configuration

pub mod aggregation;
pub mod api;
pub mod dto;
pub mod middleware;
pub mod refresh_tokens;
pub mod router;
pub mod token_blacklist;

pub use router::create_app_router;

use auth::JwtConfig;

/// Application state shared across request handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db: sea_orm::DbConn,
    /// JWT configuration
    pub jwt_config: JwtConfig,
    /// Redis connection for access-token blacklisting
    pub redis: redis::Client,
}
