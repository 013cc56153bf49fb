//! # API Router Configuration
//!
//! Route table for the appraisal API. Everything except login and token
//! refresh sits behind the JWT middleware.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{api, AppState};

/// Creates the API router with all routes.
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/auth/logout", post(api::auth::logout_handler))
        .route("/api/auth/me", get(api::auth::me_handler))
        .route("/api/companies", get(api::companies::list_companies_handler))
        .route("/api/companies/:id", get(api::companies::get_company_handler))
        .route("/api/users", get(api::users::list_users_handler))
        .route("/api/users/:id", get(api::users::get_user_handler))
        .route("/api/projects", get(api::projects::list_projects_handler))
        .route("/api/projects/:id", get(api::projects::get_project_handler))
        .route(
            "/api/projects/:id/members",
            get(api::projects::list_project_members_handler),
        )
        .route(
            "/api/projects/:id/reporters",
            get(api::projects::list_project_reporters_handler),
        )
        .route(
            "/api/project-memberships",
            get(api::memberships::list_memberships_handler).post(api::memberships::create_membership_handler),
        )
        .route(
            "/api/project-memberships/:id",
            get(api::memberships::get_membership_handler)
                .put(api::memberships::update_membership_handler)
                .delete(api::memberships::delete_membership_handler),
        )
        .route(
            "/api/appraisal-cycles",
            get(api::cycles::list_cycles_handler).post(api::cycles::create_cycle_handler),
        )
        .route(
            "/api/appraisal-cycles/:id",
            get(api::cycles::get_cycle_handler)
                .put(api::cycles::update_cycle_handler)
                .delete(api::cycles::delete_cycle_handler),
        )
        .route(
            "/api/appraisals",
            get(api::appraisals::list_appraisals_handler).post(api::appraisals::create_appraisal_handler),
        )
        .route(
            "/api/appraisals/:id",
            get(api::appraisals::get_appraisal_handler)
                .put(api::appraisals::update_appraisal_handler)
                .delete(api::appraisals::delete_appraisal_handler),
        )
        .route(
            "/api/appraisals/:id/reviews",
            get(api::appraisals::list_appraisal_reviews_handler),
        )
        .route(
            "/api/appraisal-reviews",
            get(api::reviews::list_reviews_handler).post(api::reviews::create_review_handler),
        )
        .route(
            "/api/appraisal-reviews/:id",
            get(api::reviews::get_review_handler)
                .put(api::reviews::update_review_handler)
                .delete(api::reviews::delete_review_handler),
        )
        .route(
            "/api/appraisal-reviews/:id/ratings",
            get(api::reviews::list_review_ratings_handler),
        )
        .route(
            "/api/competency-ratings",
            get(api::ratings::list_ratings_handler).post(api::ratings::create_rating_handler),
        )
        .route(
            "/api/competency-ratings/:id",
            get(api::ratings::get_rating_handler)
                .put(api::ratings::update_rating_handler)
                .delete(api::ratings::delete_rating_handler),
        )
        .route(
            "/api/overall-evaluations",
            get(api::evaluations::list_evaluations_handler),
        )
        .route(
            "/api/overall-evaluations/:id",
            get(api::evaluations::get_evaluation_handler).put(api::evaluations::update_evaluation_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/api/auth/login", post(api::auth::login_handler))
        .route("/api/token/refresh", post(api::auth::refresh_handler));

    public_routes.merge(protected_routes).with_state(state)
}

/// Creates the health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(|| async { "OK" }))
}

/// Creates the main application router.
pub fn create_app_router(state: AppState) -> Router {
    Router::new().merge(create_health_router()).merge(create_router(state))
}
