//! Request handlers, one module per resource.

pub mod appraisals;
pub mod auth;
pub mod companies;
pub mod cycles;
pub mod evaluations;
pub mod memberships;
pub mod projects;
pub mod ratings;
pub mod reviews;
pub mod users;

use error::Result;
use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, Select};

use crate::dto::common::{ListQuery, PaginationInfo};

/// Runs a select through the paginator and returns the requested page with
/// pagination metadata.
pub(crate) async fn fetch_page<'db, C, E>(
    db: &'db C,
    query: Select<E>,
    list: &ListQuery,
) -> Result<(Vec<E::Model>, PaginationInfo)>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: FromQueryResult + Sized + Send + Sync + 'db,
{
    let page = list.page();
    let per_page = list.per_page();

    let paginator = query.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let models = paginator.fetch_page(page.saturating_sub(1)).await?;

    Ok((models, PaginationInfo::new(page, per_page, total)))
}
