//! # Authentication & Authorization
//!
//! Authentication and authorization for the appraisal backend:
//! - JWT access token management
//! - Argon2id password hashing
//! - Project-role authorization rules (the access module)

pub mod access;
pub mod jwt;
pub mod password;

// Re-export commonly used types
pub use access::{
    ensure_can_create_appraisal, ensure_reporter, ensure_same_project, is_project_member, is_reporter, Actor,
    ResolveProject,
};
pub use jwt::{create_access_token, extract_bearer_token, validate_token, Claims, JwtConfig};
pub use password::{hash_password, validate_password_strength, verify_password};
pub use secrecy;
