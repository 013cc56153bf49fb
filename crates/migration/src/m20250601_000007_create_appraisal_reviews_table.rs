use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20250601_000002_create_users_table::Users,
    m20250601_000006_create_appraisals_table::Appraisals,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppraisalReviews::Table)
                    .if_not_exists()
                    .col(uuid(AppraisalReviews::Id).primary_key())
                    .col(uuid(AppraisalReviews::AppraisalId))
                    .col(uuid(AppraisalReviews::ReviewerId))
                    .col(boolean(AppraisalReviews::IsCompleted).default(false))
                    .col(text_null(AppraisalReviews::ReviewerSignature))
                    .col(timestamp_with_time_zone_null(AppraisalReviews::ReviewerSignedAt))
                    .col(timestamp_with_time_zone(AppraisalReviews::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(AppraisalReviews::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appraisal_reviews_appraisal_id")
                            .from(AppraisalReviews::Table, AppraisalReviews::AppraisalId)
                            .to(Appraisals::Table, Appraisals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appraisal_reviews_reviewer_id")
                            .from(AppraisalReviews::Table, AppraisalReviews::ReviewerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One review per reviewer per appraisal.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_appraisal_reviews_appraisal_reviewer")
                    .table(AppraisalReviews::Table)
                    .col(AppraisalReviews::AppraisalId)
                    .col(AppraisalReviews::ReviewerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_appraisal_reviews_reviewer_id")
                    .table(AppraisalReviews::Table)
                    .col(AppraisalReviews::ReviewerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AppraisalReviews::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum AppraisalReviews {
    Table,
    Id,
    AppraisalId,
    ReviewerId,
    IsCompleted,
    ReviewerSignature,
    ReviewerSignedAt,
    CreatedAt,
    UpdatedAt,
}
