//! Request and response data transfer objects.

pub mod appraisals;
pub mod auth;
pub mod common;
pub mod companies;
pub mod cycles;
pub mod evaluations;
pub mod projects;
pub mod reviews;
pub mod users;
