//! Integration tests for overall-rating aggregation: only completed
//! reviews count, deletion triggers recomputation, and recomputation is
//! idempotent.

mod common;

use axum::{extract::Path, extract::State, Extension, Json};
use common::*;
use entity::{
    competency_ratings::RatingCategory, overall_evaluations::Entity as EvaluationsEntity,
    project_memberships::ProjectRole,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use server::{
    aggregation::recompute_overall_rating,
    api,
    dto::{
        appraisals::{AppraisalResponse, CreateAppraisalRequest},
        reviews::{CreateRatingRequest, CreateReviewRequest, UpdateReviewRequest},
    },
    middleware::auth::AuthenticatedUser,
    AppState,
};
use uuid::Uuid;

struct Fixture {
    state: AppState,
    reporter: AuthenticatedUser,
    appraisal: AppraisalResponse,
}

/// Company, project, reporter + member appraisee, cycle, and one appraisal
/// created through the workflow handler.
async fn workflow_fixture(db: &DatabaseConnection) -> Fixture {
    let state = test_app_state(db);
    let company = create_company(db, "Acme").await;
    let project = create_project(db, company.id, "Apollo").await;
    let reporter = create_user(db, Some(company.id), "reporter", false).await;
    let appraisee = create_user(db, Some(company.id), "appraisee", false).await;
    add_membership(db, project.id, reporter.id, ProjectRole::Reporter).await;
    add_membership(db, project.id, appraisee.id, ProjectRole::Member).await;
    let cycle = create_cycle(db, company.id).await;

    let (_, Json(appraisal)) = api::appraisals::create_appraisal_handler(
        State(state.clone()),
        Extension(authed(&reporter)),
        Json(CreateAppraisalRequest {
            cycle: cycle.id,
            appraisee: appraisee.id,
            project: project.id,
            discussion_date: None,
            status: None,
        }),
    )
    .await
    .expect("Appraisal creation failed");

    Fixture {
        state,
        reporter: authed(&reporter),
        appraisal,
    }
}

async fn add_rating(fixture: &Fixture, review_id: Uuid, rating: i16) {
    api::ratings::create_rating_handler(
        State(fixture.state.clone()),
        Extension(fixture.reporter.clone()),
        Json(CreateRatingRequest {
            appraisal_review: review_id,
            category: RatingCategory::WorkEfficiency,
            criterion_name: format!("Criterion {}", Uuid::new_v4()),
            rating,
            comments: None,
        }),
    )
    .await
    .expect("Rating creation failed");
}

async fn complete_review(fixture: &Fixture, review_id: Uuid) {
    api::reviews::update_review_handler(
        State(fixture.state.clone()),
        Extension(fixture.reporter.clone()),
        Path(review_id),
        Json(UpdateReviewRequest {
            is_completed: Some(true),
            reviewer_signature: None,
            reviewer_signed_at: None,
        }),
    )
    .await
    .expect("Review completion failed");
}

async fn stored_average(db: &DatabaseConnection, appraisal_id: Uuid) -> Option<f64> {
    EvaluationsEntity::find()
        .filter(entity::overall_evaluations::Column::AppraisalId.eq(appraisal_id))
        .one(db)
        .await
        .unwrap()
        .expect("Evaluation missing")
        .overall_rating_avg
}

#[tokio::test]
async fn test_completed_review_with_ten_ratings_averages_to_four_point_five() {
    let db = setup_db().await;
    let fixture = workflow_fixture(&db).await;
    let review_id = fixture.appraisal.reviews[0].id;

    for rating in [5, 4, 5, 4, 5, 5, 4, 4, 5, 4] {
        add_rating(&fixture, review_id, rating).await;
    }

    // Ratings under an incomplete review do not surface in the average.
    assert_eq!(stored_average(&db, fixture.appraisal.id).await, None);

    complete_review(&fixture, review_id).await;
    assert_eq!(stored_average(&db, fixture.appraisal.id).await, Some(4.5));
}

#[tokio::test]
async fn test_incomplete_second_review_is_excluded() {
    let db = setup_db().await;
    let fixture = workflow_fixture(&db).await;
    let first_review = fixture.appraisal.reviews[0].id;

    // Second reporter joins the project and files their own review.
    let second = create_user(&db, None, "second", false).await;
    add_membership(&db, fixture.appraisal.project, second.id, ProjectRole::Reporter).await;
    let (_, Json(second_review)) = api::reviews::create_review_handler(
        State(fixture.state.clone()),
        Extension(authed(&second)),
        Json(CreateReviewRequest {
            appraisal: fixture.appraisal.id,
        }),
    )
    .await
    .unwrap();

    add_rating(&fixture, first_review, 4).await;
    add_rating(&fixture, first_review, 5).await;
    // The second review stays incomplete; its rating must not count.
    add_rating(&fixture, second_review.id, 1).await;

    complete_review(&fixture, first_review).await;
    assert_eq!(stored_average(&db, fixture.appraisal.id).await, Some(4.5));
}

#[tokio::test]
async fn test_deleting_sole_completed_review_clears_average() {
    let db = setup_db().await;
    let fixture = workflow_fixture(&db).await;
    let review_id = fixture.appraisal.reviews[0].id;

    add_rating(&fixture, review_id, 5).await;
    add_rating(&fixture, review_id, 3).await;
    complete_review(&fixture, review_id).await;
    assert_eq!(stored_average(&db, fixture.appraisal.id).await, Some(4.0));

    api::reviews::delete_review_handler(
        State(fixture.state.clone()),
        Extension(fixture.reporter.clone()),
        Path(review_id),
    )
    .await
    .expect("Review deletion failed");

    // Absent, not zero.
    assert_eq!(stored_average(&db, fixture.appraisal.id).await, None);
}

#[tokio::test]
async fn test_rating_deletion_recomputes() {
    let db = setup_db().await;
    let fixture = workflow_fixture(&db).await;
    let review_id = fixture.appraisal.reviews[0].id;

    add_rating(&fixture, review_id, 5).await;
    add_rating(&fixture, review_id, 1).await;
    complete_review(&fixture, review_id).await;
    assert_eq!(stored_average(&db, fixture.appraisal.id).await, Some(3.0));

    let ratings = entity::competency_ratings::Entity::find()
        .filter(entity::competency_ratings::Column::ReviewId.eq(review_id))
        .all(&db)
        .await
        .unwrap();
    let low = ratings.iter().find(|r| r.rating == 1).unwrap();

    api::ratings::delete_rating_handler(
        State(fixture.state.clone()),
        Extension(fixture.reporter.clone()),
        Path(low.id),
    )
    .await
    .expect("Rating deletion failed");

    assert_eq!(stored_average(&db, fixture.appraisal.id).await, Some(5.0));
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let db = setup_db().await;
    let fixture = workflow_fixture(&db).await;
    let review_id = fixture.appraisal.reviews[0].id;

    add_rating(&fixture, review_id, 4).await;
    add_rating(&fixture, review_id, 2).await;
    complete_review(&fixture, review_id).await;

    let first = recompute_overall_rating(&db, fixture.appraisal.id).await.unwrap();
    let second = recompute_overall_rating(&db, fixture.appraisal.id).await.unwrap();
    assert_eq!(first, Some(3.0));
    assert_eq!(first, second);
    assert_eq!(stored_average(&db, fixture.appraisal.id).await, Some(3.0));
}

#[tokio::test]
async fn test_completed_review_without_ratings_keeps_average_absent() {
    let db = setup_db().await;
    let fixture = workflow_fixture(&db).await;
    let review_id = fixture.appraisal.reviews[0].id;

    complete_review(&fixture, review_id).await;
    assert_eq!(stored_average(&db, fixture.appraisal.id).await, None);
}
