//! Overall Evaluations Entity
//!
//! Exactly one per appraisal. `overall_rating_avg` is derived from the
//! competency ratings of completed reviews and is never written by callers;
//! NULL means "no completed ratings yet", which is distinct from zero.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "overall_evaluations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub appraisal_id: Uuid,
    pub overall_rating_avg: Option<f64>,
    pub ready_for_advanced_work: bool,
    pub ready_for_promotion: bool,
    pub summary_comment: String,
    pub appraisee_signature: Option<String>,
    pub appraisee_signed_at: Option<DateTimeUtc>,
    pub hr_signature: Option<String>,
    pub hr_signed_at: Option<DateTimeUtc>,
    pub finalized_at: Option<DateTimeUtc>,
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
}

impl Related<super::appraisals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appraisal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
