//! Tests for entity enumerations and wire formats.

use entity::{
    appraisal_cycles::CycleStatus,
    appraisals::AppraisalStatus,
    competency_ratings::{rating_label, RatingCategory},
    project_memberships::ProjectRole,
};

#[test]
fn test_project_role_display() {
    assert_eq!(ProjectRole::Reporter.to_string(), "REPORTER");
    assert_eq!(ProjectRole::Member.to_string(), "MEMBER");
}

#[test]
fn test_project_role_json_wire_format() {
    assert_eq!(serde_json::to_string(&ProjectRole::Reporter).unwrap(), "\"REPORTER\"");
    let parsed: ProjectRole = serde_json::from_str("\"MEMBER\"").unwrap();
    assert_eq!(parsed, ProjectRole::Member);
}

#[test]
fn test_cycle_status_display() {
    assert_eq!(CycleStatus::Draft.to_string(), "DRAFT");
    assert_eq!(CycleStatus::Active.to_string(), "ACTIVE");
    assert_eq!(CycleStatus::Closed.to_string(), "CLOSED");
}

#[test]
fn test_appraisal_status_json_wire_format() {
    assert_eq!(
        serde_json::to_string(&AppraisalStatus::InProgress).unwrap(),
        "\"IN_PROGRESS\""
    );
    let parsed: AppraisalStatus = serde_json::from_str("\"PENDING\"").unwrap();
    assert_eq!(parsed, AppraisalStatus::Pending);
}

#[test]
fn test_rating_category_json_wire_format() {
    assert_eq!(
        serde_json::to_string(&RatingCategory::WorkEfficiency).unwrap(),
        "\"WORK_EFFICIENCY\""
    );
    let parsed: RatingCategory = serde_json::from_str("\"PERSONAL\"").unwrap();
    assert_eq!(parsed, RatingCategory::Personal);
}

#[test]
fn test_rating_labels() {
    assert_eq!(rating_label(1), "Not Observed");
    assert_eq!(rating_label(2), "Weak");
    assert_eq!(rating_label(3), "As Expected");
    assert_eq!(rating_label(4), "Good");
    assert_eq!(rating_label(5), "Exceptional");
    assert_eq!(rating_label(0), "Unknown");
    assert_eq!(rating_label(6), "Unknown");
}

#[test]
fn test_user_full_name() {
    let user = entity::users::Model {
        id: uuid::Uuid::new_v4(),
        username: "jdoe".to_string(),
        email: "jdoe@example.com".to_string(),
        password_hash: String::new(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        company_id: None,
        position: String::new(),
        division: String::new(),
        date_joined: None,
        last_promotion_date: None,
        is_active: true,
        is_staff: false,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };
    assert_eq!(user.full_name(), "Jane Doe");

    let no_last = entity::users::Model {
        last_name: String::new(),
        ..user
    };
    assert_eq!(no_last.full_name(), "Jane");
}
