//! Competency Ratings Entity
//!
//! One scored criterion (1-5) within a category, recorded by one reviewer.
//! The range is validated at the API boundary, not by the database.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "competency_ratings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub review_id: Uuid,
    pub category: RatingCategory,
    pub criterion_name: String,
    pub rating: i16,
    pub comments: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::appraisal_reviews::Entity",
        from = "Column::ReviewId",
        to = "super::appraisal_reviews::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Review,
}

impl Related<super::appraisal_reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Competency category a criterion belongs to.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RatingCategory {
    #[sea_orm(string_value = "WORK_EFFICIENCY")]
    WorkEfficiency,
    /// Productivity & supervisory skills
    #[sea_orm(string_value = "PRODUCTIVITY")]
    Productivity,
    /// Personal attributes
    #[sea_orm(string_value = "PERSONAL")]
    Personal,
}

impl std::fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingCategory::WorkEfficiency => write!(f, "WORK_EFFICIENCY"),
            RatingCategory::Productivity => write!(f, "PRODUCTIVITY"),
            RatingCategory::Personal => write!(f, "PERSONAL"),
        }
    }
}

/// Human-readable label for a 1-5 rating value.
#[must_use]
pub fn rating_label(rating: i16) -> &'static str {
    match rating {
        1 => "Not Observed",
        2 => "Weak",
        3 => "As Expected",
        4 => "Good",
        5 => "Exceptional",
        _ => "Unknown",
    }
}
