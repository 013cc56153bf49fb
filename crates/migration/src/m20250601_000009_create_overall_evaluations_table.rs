use sea_orm_migration::{prelude::*, schema::*};

use super::m20250601_000006_create_appraisals_table::Appraisals;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OverallEvaluations::Table)
                    .if_not_exists()
                    .col(uuid(OverallEvaluations::Id).primary_key())
                    .col(uuid_uniq(OverallEvaluations::AppraisalId))
                    .col(double_null(OverallEvaluations::OverallRatingAvg))
                    .col(boolean(OverallEvaluations::ReadyForAdvancedWork).default(false))
                    .col(boolean(OverallEvaluations::ReadyForPromotion).default(false))
                    .col(text(OverallEvaluations::SummaryComment).default(""))
                    .col(text_null(OverallEvaluations::AppraiseeSignature))
                    .col(timestamp_with_time_zone_null(OverallEvaluations::AppraiseeSignedAt))
                    .col(text_null(OverallEvaluations::HrSignature))
                    .col(timestamp_with_time_zone_null(OverallEvaluations::HrSignedAt))
                    .col(timestamp_with_time_zone_null(OverallEvaluations::FinalizedAt))
                    .col(timestamp_with_time_zone(OverallEvaluations::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(OverallEvaluations::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_overall_evaluations_appraisal_id")
                            .from(OverallEvaluations::Table, OverallEvaluations::AppraisalId)
                            .to(Appraisals::Table, Appraisals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OverallEvaluations::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum OverallEvaluations {
    Table,
    Id,
    AppraisalId,
    OverallRatingAvg,
    ReadyForAdvancedWork,
    ReadyForPromotion,
    SummaryComment,
    AppraiseeSignature,
    AppraiseeSignedAt,
    HrSignature,
    HrSignedAt,
    FinalizedAt,
    CreatedAt,
    UpdatedAt,
}
