use sea_orm_migration::{prelude::*, schema::*};

use super::m20250601_000007_create_appraisal_reviews_table::AppraisalReviews;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompetencyRatings::Table)
                    .if_not_exists()
                    .col(uuid(CompetencyRatings::Id).primary_key())
                    .col(uuid(CompetencyRatings::ReviewId))
                    .col(string_len(CompetencyRatings::Category, 24))
                    .col(string(CompetencyRatings::CriterionName))
                    .col(small_integer(CompetencyRatings::Rating))
                    .col(text(CompetencyRatings::Comments).default(""))
                    .col(timestamp_with_time_zone(CompetencyRatings::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(CompetencyRatings::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_competency_ratings_review_id")
                            .from(CompetencyRatings::Table, CompetencyRatings::ReviewId)
                            .to(AppraisalReviews::Table, AppraisalReviews::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_competency_ratings_review_id")
                    .table(CompetencyRatings::Table)
                    .col(CompetencyRatings::ReviewId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompetencyRatings::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum CompetencyRatings {
    Table,
    Id,
    ReviewId,
    Category,
    CriterionName,
    Rating,
    Comments,
    CreatedAt,
    UpdatedAt,
}
