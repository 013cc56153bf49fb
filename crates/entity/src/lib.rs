//! Entity definitions for the Meridian appraisal backend.
//!
//! This crate contains Sea-ORM entity definitions for the database models.
//! Every table scopes to a company except `users` (nullable company for
//! staff accounts) and `refresh_tokens`.

pub mod appraisal_cycles;
pub use appraisal_cycles::Entity as AppraisalCycles;
pub mod appraisal_reviews;
pub use appraisal_reviews::Entity as AppraisalReviews;
pub mod appraisals;
pub use appraisals::Entity as Appraisals;
pub mod companies;
pub use companies::Entity as Companies;
pub mod competency_ratings;
pub use competency_ratings::Entity as CompetencyRatings;
pub mod overall_evaluations;
pub use overall_evaluations::Entity as OverallEvaluations;
pub mod project_memberships;
pub use project_memberships::Entity as ProjectMemberships;
pub mod projects;
pub use projects::Entity as Projects;
pub mod refresh_tokens;
pub use refresh_tokens::Entity as RefreshTokens;
pub mod users;
pub use users::Entity as Users;
