//! # Company Handlers
//!
//! Read-only company endpoints. Active companies are visible to any
//! authenticated caller.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use entity::companies::{Column as CompanyColumn, Entity as CompaniesEntity};
use error::{AppError, Result};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    dto::{
        common::ListQuery,
        companies::{CompanyListResponse, CompanyResponse},
    },
    AppState,
};

/// List active companies.
pub async fn list_companies_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<CompanyListResponse>> {
    let select = CompaniesEntity::find()
        .filter(CompanyColumn::IsActive.eq(true))
        .order_by_asc(CompanyColumn::Name);

    let (companies, pagination) = super::fetch_page(&state.db, select, &query).await?;

    Ok(Json(CompanyListResponse {
        success: true,
        companies: companies.iter().map(CompanyResponse::from_model).collect(),
        pagination,
    }))
}

/// Get a single active company.
pub async fn get_company_handler(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<CompanyResponse>> {
    let company = CompaniesEntity::find_by_id(company_id)
        .one(&state.db)
        .await?
        .filter(|c| c.is_active)
        .ok_or_else(|| AppError::not_found("Company not found"))?;

    Ok(Json(CompanyResponse::from_model(&company)))
}
