//! # Overall Rating Aggregation
//!
//! Recomputes an appraisal's `overall_rating_avg` from the competency
//! ratings of its completed reviews. This is an explicit operation invoked
//! at every mutation that can change the result (review update, review
//! deletion, rating create/update/delete), always inside the same
//! transaction as the triggering write so concurrent reviewers cannot race a
//! stale average into the row.

use entity::{appraisal_reviews, competency_ratings, overall_evaluations};
use error::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// Arithmetic mean of rating values. None when there is nothing to average;
/// an empty set is explicitly not zero.
#[must_use]
pub fn mean_rating(ratings: &[i16]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let total: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    Some(total as f64 / ratings.len() as f64)
}

/// Recomputes and stores the overall rating average for an appraisal.
///
/// Gathers all ratings belonging to completed reviews of the appraisal and
/// writes their mean (or NULL) to the evaluation row. Idempotent: invoking
/// it twice without an intervening data change yields the same stored value.
/// A missing evaluation row is not an error; the computed value is still
/// returned.
///
/// # Errors
///
/// Returns an error if any query or the update fails.
pub async fn recompute_overall_rating<C: ConnectionTrait>(db: &C, appraisal_id: Uuid) -> Result<Option<f64>> {
    let completed_review_ids: Vec<Uuid> = appraisal_reviews::Entity::find()
        .filter(appraisal_reviews::Column::AppraisalId.eq(appraisal_id))
        .filter(appraisal_reviews::Column::IsCompleted.eq(true))
        .all(db)
        .await?
        .into_iter()
        .map(|review| review.id)
        .collect();

    let average = if completed_review_ids.is_empty() {
        None
    } else {
        let ratings: Vec<i16> = competency_ratings::Entity::find()
            .filter(competency_ratings::Column::ReviewId.is_in(completed_review_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|rating| rating.rating)
            .collect();
        mean_rating(&ratings)
    };

    if let Some(evaluation) = overall_evaluations::Entity::find()
        .filter(overall_evaluations::Column::AppraisalId.eq(appraisal_id))
        .one(db)
        .await?
    {
        let mut active: overall_evaluations::ActiveModel = evaluation.into();
        active.overall_rating_avg = Set(average);
        active.updated_at = Set(chrono::Utc::now());
        active.update(db).await?;
    }

    Ok(average)
}
