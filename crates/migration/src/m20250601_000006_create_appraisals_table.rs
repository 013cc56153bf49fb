use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20250601_000002_create_users_table::Users,
    m20250601_000003_create_projects_table::Projects,
    m20250601_000005_create_appraisal_cycles_table::AppraisalCycles,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No uniqueness on (cycle, appraisee, project): the business rule is
        // unsettled, so duplicates are currently representable.
        manager
            .create_table(
                Table::create()
                    .table(Appraisals::Table)
                    .if_not_exists()
                    .col(uuid(Appraisals::Id).primary_key())
                    .col(uuid(Appraisals::CycleId))
                    .col(uuid(Appraisals::AppraiseeId))
                    .col(uuid(Appraisals::ProjectId))
                    .col(date_null(Appraisals::DiscussionDate))
                    .col(string_len(Appraisals::Status, 16).default("PENDING"))
                    .col(timestamp_with_time_zone(Appraisals::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Appraisals::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appraisals_cycle_id")
                            .from(Appraisals::Table, Appraisals::CycleId)
                            .to(AppraisalCycles::Table, AppraisalCycles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appraisals_appraisee_id")
                            .from(Appraisals::Table, Appraisals::AppraiseeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appraisals_project_id")
                            .from(Appraisals::Table, Appraisals::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_appraisals_project_id")
                    .table(Appraisals::Table)
                    .col(Appraisals::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_appraisals_cycle_id")
                    .table(Appraisals::Table)
                    .col(Appraisals::CycleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Appraisals::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Appraisals {
    Table,
    Id,
    CycleId,
    AppraiseeId,
    ProjectId,
    DiscussionDate,
    Status,
    CreatedAt,
    UpdatedAt,
}
