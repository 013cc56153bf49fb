//! Integration tests for the project-role authorization rules.
//!
//! Runs against an in-memory SQLite database with the full migration set
//! applied, so membership lookups exercise real queries.

use auth::access::{
    ensure_can_create_appraisal, ensure_reporter, ensure_same_project, is_project_member, is_reporter, Actor,
    ResolveProject,
};
use chrono::Utc;
use entity::{
    appraisal_cycles::{self, CycleStatus},
    appraisal_reviews,
    appraisals::{self, AppraisalStatus},
    companies, competency_ratings,
    competency_ratings::RatingCategory,
    project_memberships::{self, ProjectRole},
    projects, users,
};
use error::AppError;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

async fn setup_db() -> DatabaseConnection {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Migrations failed");
    db
}

async fn create_company(db: &DatabaseConnection, name: &str) -> companies::Model {
    companies::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to create company")
}

async fn create_user(db: &DatabaseConnection, company_id: Option<Uuid>, username: &str, is_staff: bool) -> users::Model {
    users::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        password_hash: Set(String::new()),
        first_name: Set(username.to_string()),
        last_name: Set("Test".to_string()),
        company_id: Set(company_id),
        position: Set(String::new()),
        division: Set(String::new()),
        date_joined: Set(None),
        last_promotion_date: Set(None),
        is_active: Set(true),
        is_staff: Set(is_staff),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to create user")
}

async fn create_project(db: &DatabaseConnection, company_id: Uuid, name: &str) -> projects::Model {
    projects::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(company_id),
        name: Set(name.to_string()),
        description: Set(String::new()),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to create project")
}

async fn add_membership(db: &DatabaseConnection, project_id: Uuid, user_id: Uuid, role: ProjectRole) {
    project_memberships::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        user_id: Set(user_id),
        role: Set(role),
        joined_at: Set(Utc::now().date_naive()),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to add membership");
}

async fn create_cycle(db: &DatabaseConnection, company_id: Uuid) -> appraisal_cycles::Model {
    appraisal_cycles::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(company_id),
        period_start: Set("2025-01-01".parse().unwrap()),
        period_end: Set("2025-06-30".parse().unwrap()),
        status: Set(CycleStatus::Active),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to create cycle")
}

async fn create_appraisal(
    db: &DatabaseConnection,
    cycle_id: Uuid,
    appraisee_id: Uuid,
    project_id: Uuid,
) -> appraisals::Model {
    appraisals::ActiveModel {
        id: Set(Uuid::new_v4()),
        cycle_id: Set(cycle_id),
        appraisee_id: Set(appraisee_id),
        project_id: Set(project_id),
        discussion_date: Set(None),
        status: Set(AppraisalStatus::Pending),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to create appraisal")
}

#[tokio::test]
async fn test_membership_lookups() {
    let db = setup_db().await;
    let company = create_company(&db, "Acme").await;
    let project = create_project(&db, company.id, "Apollo").await;
    let reporter = create_user(&db, Some(company.id), "reporter", false).await;
    let member = create_user(&db, Some(company.id), "member", false).await;
    let outsider = create_user(&db, Some(company.id), "outsider", false).await;

    add_membership(&db, project.id, reporter.id, ProjectRole::Reporter).await;
    add_membership(&db, project.id, member.id, ProjectRole::Member).await;

    assert!(is_reporter(&db, project.id, reporter.id).await.unwrap());
    assert!(!is_reporter(&db, project.id, member.id).await.unwrap());
    assert!(!is_reporter(&db, project.id, outsider.id).await.unwrap());

    assert!(is_project_member(&db, project.id, reporter.id).await.unwrap());
    assert!(is_project_member(&db, project.id, member.id).await.unwrap());
    assert!(!is_project_member(&db, project.id, outsider.id).await.unwrap());
}

#[tokio::test]
async fn test_reporter_can_create_appraisal_for_member() {
    let db = setup_db().await;
    let company = create_company(&db, "Acme").await;
    let project = create_project(&db, company.id, "Apollo").await;
    let reporter = create_user(&db, Some(company.id), "reporter", false).await;
    let appraisee = create_user(&db, Some(company.id), "appraisee", false).await;

    add_membership(&db, project.id, reporter.id, ProjectRole::Reporter).await;
    add_membership(&db, project.id, appraisee.id, ProjectRole::Member).await;

    let actor = Actor::new(reporter.id, false);
    assert!(ensure_can_create_appraisal(&db, &actor, project.id, appraisee.id)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_create_denied_for_non_member_appraisee() {
    let db = setup_db().await;
    let company = create_company(&db, "Acme").await;
    let project = create_project(&db, company.id, "Apollo").await;
    let reporter = create_user(&db, Some(company.id), "reporter", false).await;
    let stranger = create_user(&db, Some(company.id), "stranger", false).await;

    add_membership(&db, project.id, reporter.id, ProjectRole::Reporter).await;

    let actor = Actor::new(reporter.id, false);
    let err = ensure_can_create_appraisal(&db, &actor, project.id, stranger.id)
        .await
        .unwrap_err();
    match err {
        AppError::Forbidden { message } => assert!(message.contains("Appraisee")),
        other => panic!("Expected Forbidden, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_denied_for_plain_member() {
    let db = setup_db().await;
    let company = create_company(&db, "Acme").await;
    let project = create_project(&db, company.id, "Apollo").await;
    let member = create_user(&db, Some(company.id), "member", false).await;
    let appraisee = create_user(&db, Some(company.id), "appraisee", false).await;

    add_membership(&db, project.id, member.id, ProjectRole::Member).await;
    add_membership(&db, project.id, appraisee.id, ProjectRole::Member).await;

    let actor = Actor::new(member.id, false);
    let err = ensure_can_create_appraisal(&db, &actor, project.id, appraisee.id)
        .await
        .unwrap_err();
    match err {
        AppError::Forbidden { message } => assert!(message.contains("REPORTER")),
        other => panic!("Expected Forbidden, got {:?}", other),
    }
}

#[tokio::test]
async fn test_staff_bypasses_all_project_checks() {
    let db = setup_db().await;
    let company = create_company(&db, "Acme").await;
    let project = create_project(&db, company.id, "Apollo").await;
    let staff = create_user(&db, None, "staff", true).await;
    let appraisee = create_user(&db, Some(company.id), "appraisee", false).await;

    // Neither staff nor appraisee is a member of anything.
    let actor = Actor::new(staff.id, true);
    assert!(ensure_can_create_appraisal(&db, &actor, project.id, appraisee.id)
        .await
        .is_ok());

    let cycle = create_cycle(&db, company.id).await;
    let appraisal = create_appraisal(&db, cycle.id, appraisee.id, project.id).await;
    assert!(ensure_reporter(&db, &actor, &appraisal).await.is_ok());
    assert!(ensure_same_project(&db, &actor, &appraisal).await.is_ok());
}

#[tokio::test]
async fn test_ensure_reporter_resolves_review_chain() {
    let db = setup_db().await;
    let company = create_company(&db, "Acme").await;
    let project = create_project(&db, company.id, "Apollo").await;
    let reporter = create_user(&db, Some(company.id), "reporter", false).await;
    let member = create_user(&db, Some(company.id), "member", false).await;
    let appraisee = create_user(&db, Some(company.id), "appraisee", false).await;

    add_membership(&db, project.id, reporter.id, ProjectRole::Reporter).await;
    add_membership(&db, project.id, member.id, ProjectRole::Member).await;
    add_membership(&db, project.id, appraisee.id, ProjectRole::Member).await;

    let cycle = create_cycle(&db, company.id).await;
    let appraisal = create_appraisal(&db, cycle.id, appraisee.id, project.id).await;
    let review = appraisal_reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        appraisal_id: Set(appraisal.id),
        reviewer_id: Set(reporter.id),
        is_completed: Set(false),
        reviewer_signature: Set(None),
        reviewer_signed_at: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .unwrap();

    let resolved = review.resolve_project(&db).await.unwrap();
    assert_eq!(resolved.id, project.id);

    let reporter_actor = Actor::new(reporter.id, false);
    assert!(ensure_reporter(&db, &reporter_actor, &review).await.is_ok());

    let member_actor = Actor::new(member.id, false);
    assert!(matches!(
        ensure_reporter(&db, &member_actor, &review).await,
        Err(AppError::Forbidden { .. })
    ));
}

#[tokio::test]
async fn test_rating_resolves_project_through_review() {
    let db = setup_db().await;
    let company = create_company(&db, "Acme").await;
    let project = create_project(&db, company.id, "Apollo").await;
    let reporter = create_user(&db, Some(company.id), "reporter", false).await;
    let appraisee = create_user(&db, Some(company.id), "appraisee", false).await;

    add_membership(&db, project.id, reporter.id, ProjectRole::Reporter).await;
    add_membership(&db, project.id, appraisee.id, ProjectRole::Member).await;

    let cycle = create_cycle(&db, company.id).await;
    let appraisal = create_appraisal(&db, cycle.id, appraisee.id, project.id).await;
    let review = appraisal_reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        appraisal_id: Set(appraisal.id),
        reviewer_id: Set(reporter.id),
        is_completed: Set(false),
        reviewer_signature: Set(None),
        reviewer_signed_at: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .unwrap();

    let rating = competency_ratings::ActiveModel {
        id: Set(Uuid::new_v4()),
        review_id: Set(review.id),
        category: Set(RatingCategory::Personal),
        criterion_name: Set("Initiative".to_string()),
        rating: Set(4),
        comments: Set(String::new()),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .unwrap();

    let resolved = rating.resolve_project(&db).await.unwrap();
    assert_eq!(resolved.id, project.id);
}

#[tokio::test]
async fn test_same_project_check_is_symmetric() {
    let db = setup_db().await;
    let company = create_company(&db, "Acme").await;
    let project = create_project(&db, company.id, "Apollo").await;
    let other_project = create_project(&db, company.id, "Borealis").await;
    let reviewer = create_user(&db, Some(company.id), "reviewer", false).await;
    let appraisee = create_user(&db, Some(company.id), "appraisee", false).await;

    // Reviewer belongs to a different project than the appraisal's.
    add_membership(&db, other_project.id, reviewer.id, ProjectRole::Reporter).await;
    add_membership(&db, project.id, appraisee.id, ProjectRole::Member).await;

    let cycle = create_cycle(&db, company.id).await;
    let appraisal = create_appraisal(&db, cycle.id, appraisee.id, project.id).await;

    let actor = Actor::new(reviewer.id, false);
    assert!(matches!(
        ensure_same_project(&db, &actor, &appraisal).await,
        Err(AppError::Forbidden { .. })
    ));

    // Joining the appraisal's project satisfies the check.
    add_membership(&db, project.id, reviewer.id, ProjectRole::Reporter).await;
    assert!(ensure_same_project(&db, &actor, &appraisal).await.is_ok());
}
