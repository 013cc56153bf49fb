pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_companies_table;
mod m20250601_000002_create_users_table;
mod m20250601_000003_create_projects_table;
mod m20250601_000004_create_project_memberships_table;
mod m20250601_000005_create_appraisal_cycles_table;
mod m20250601_000006_create_appraisals_table;
mod m20250601_000007_create_appraisal_reviews_table;
mod m20250601_000008_create_competency_ratings_table;
mod m20250601_000009_create_overall_evaluations_table;
mod m20250601_000010_create_refresh_tokens_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_companies_table::Migration),
            Box::new(m20250601_000002_create_users_table::Migration),
            Box::new(m20250601_000003_create_projects_table::Migration),
            Box::new(m20250601_000004_create_project_memberships_table::Migration),
            Box::new(m20250601_000005_create_appraisal_cycles_table::Migration),
            Box::new(m20250601_000006_create_appraisals_table::Migration),
            Box::new(m20250601_000007_create_appraisal_reviews_table::Migration),
            Box::new(m20250601_000008_create_competency_ratings_table::Migration),
            Box::new(m20250601_000009_create_overall_evaluations_table::Migration),
            Box::new(m20250601_000010_create_refresh_tokens_table::Migration),
        ]
    }
}

/// Database connection helper for CLI usage
pub async fn connect_to_database(database_url: &str) -> Result<sea_orm::DatabaseConnection, sea_orm::DbErr> {
    sea_orm::Database::connect(database_url).await
}
