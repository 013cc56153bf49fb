use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20250601_000002_create_users_table::Users,
    m20250601_000003_create_projects_table::Projects,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectMemberships::Table)
                    .if_not_exists()
                    .col(uuid(ProjectMemberships::Id).primary_key())
                    .col(uuid(ProjectMemberships::ProjectId))
                    .col(uuid(ProjectMemberships::UserId))
                    .col(string_len(ProjectMemberships::Role, 16).default("MEMBER"))
                    .col(date(ProjectMemberships::JoinedAt))
                    .col(timestamp_with_time_zone(ProjectMemberships::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(ProjectMemberships::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_memberships_project_id")
                            .from(ProjectMemberships::Table, ProjectMemberships::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_memberships_user_id")
                            .from(ProjectMemberships::Table, ProjectMemberships::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A user holds at most one role per project.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_project_memberships_project_user")
                    .table(ProjectMemberships::Table)
                    .col(ProjectMemberships::ProjectId)
                    .col(ProjectMemberships::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_project_memberships_user_id")
                    .table(ProjectMemberships::Table)
                    .col(ProjectMemberships::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProjectMemberships::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ProjectMemberships {
    Table,
    Id,
    ProjectId,
    UserId,
    Role,
    JoinedAt,
    CreatedAt,
    UpdatedAt,
}
