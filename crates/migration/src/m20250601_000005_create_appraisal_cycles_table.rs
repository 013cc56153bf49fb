use sea_orm_migration::{prelude::*, schema::*};

use super::m20250601_000001_create_companies_table::Companies;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppraisalCycles::Table)
                    .if_not_exists()
                    .col(uuid(AppraisalCycles::Id).primary_key())
                    .col(uuid(AppraisalCycles::CompanyId))
                    .col(date(AppraisalCycles::PeriodStart))
                    .col(date(AppraisalCycles::PeriodEnd))
                    .col(string_len(AppraisalCycles::Status, 16).default("DRAFT"))
                    .col(timestamp_with_time_zone(AppraisalCycles::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(AppraisalCycles::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appraisal_cycles_company_id")
                            .from(AppraisalCycles::Table, AppraisalCycles::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_appraisal_cycles_company_id")
                    .table(AppraisalCycles::Table)
                    .col(AppraisalCycles::CompanyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AppraisalCycles::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum AppraisalCycles {
    Table,
    Id,
    CompanyId,
    PeriodStart,
    PeriodEnd,
    Status,
    CreatedAt,
    UpdatedAt,
}
