//! Appraisals Entity
//!
//! One appraisal per appraisee per cycle per project by convention; the
//! triple is intentionally not a database constraint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "appraisals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cycle_id: Uuid,
    pub appraisee_id: Uuid,
    pub project_id: Uuid,
    pub discussion_date: Option<Date>,
    pub status: AppraisalStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::appraisal_cycles::Entity",
        from = "Column::CycleId",
        to = "super::appraisal_cycles::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Cycle,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AppraiseeId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Appraisee,
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Project,
    #[sea_orm(has_many = "super::appraisal_reviews::Entity")]
    Reviews,
    #[sea_orm(has_one = "super::overall_evaluations::Entity")]
    OverallEvaluation,
}

impl Related<super::appraisal_cycles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cycle.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::appraisal_reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::overall_evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OverallEvaluation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Appraisal workflow status. Set by the caller, never derived.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppraisalStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

impl std::fmt::Display for AppraisalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppraisalStatus::Pending => write!(f, "PENDING"),
            AppraisalStatus::InProgress => write!(f, "IN_PROGRESS"),
            AppraisalStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}
