//! Shared test infrastructure: in-memory database with migrations applied,
//! fixture builders, and an AppState wired for handler-level tests.

use chrono::Utc;
use entity::{
    appraisal_cycles::{self, CycleStatus},
    companies,
    project_memberships::{self, ProjectRole},
    projects, users,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use server::{middleware::auth::AuthenticatedUser, AppState};
use uuid::Uuid;

/// Fresh in-memory database with all migrations applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Migrations failed");
    db
}

/// AppState for handler-level tests. The Redis client is lazy and never
/// contacted by the handlers under test.
pub fn test_app_state(db: &DatabaseConnection) -> AppState {
    AppState {
        db: db.clone(),
        jwt_config: auth::JwtConfig {
            secret: {
                use base64::Engine as _;
                base64::engine::general_purpose::STANDARD.encode("meridian-test-secret-that-is-long-enough")
            },
            expiration_seconds: 3600,
            issuer: "meridian-test".to_string(),
            audience: "meridian-test-api".to_string(),
        },
        redis: redis::Client::open("redis://127.0.0.1:6379").expect("Failed to create Redis client"),
    }
}

pub async fn create_company(db: &DatabaseConnection, name: &str) -> companies::Model {
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

pub async fn create_user(
    db: &DatabaseConnection,
    company_id: Option<Uuid>,
    username: &str,
    is_staff: bool,
) -> users::Model {
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

pub async fn create_project(db: &DatabaseConnection, company_id: Uuid, name: &str) -> projects::Model {
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

pub async fn add_membership(db: &DatabaseConnection, project_id: Uuid, user_id: Uuid, role: ProjectRole) {
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

pub async fn create_cycle(db: &DatabaseConnection, company_id: Uuid) -> appraisal_cycles::Model {
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

/// The middleware-produced identity for a stored user.
pub fn authed(user: &users::Model) -> AuthenticatedUser {
    AuthenticatedUser {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        is_staff: user.is_staff,
        company_id: user.company_id,
    }
}
