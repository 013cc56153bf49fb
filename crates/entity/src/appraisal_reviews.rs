//! Appraisal Reviews Entity
//!
//! One review per reviewer per appraisal. The signature is a base64-encoded
//! image captured on the client.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "appraisal_reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub appraisal_id: Uuid,
    pub reviewer_id: Uuid,
    pub is_completed: bool,
    pub reviewer_signature: Option<String>,
    pub reviewer_signed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::appraisals::Entity",
        from = "Column::AppraisalId",
        to = "super::appraisals::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Appraisal,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReviewerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Reviewer,
    #[sea_orm(has_many = "super::competency_ratings::Entity")]
    CompetencyRatings,
}

impl Related<super::appraisals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appraisal.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviewer.def()
    }
}

impl Related<super::competency_ratings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetencyRatings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
