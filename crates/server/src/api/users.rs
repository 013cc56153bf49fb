//! # User Handlers
//!
//! Read-only user endpoints. Accounts are created out-of-band (CLI), so
//! there is no write surface here.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use entity::users::{Column as UserColumn, Entity as UsersEntity};
use error::{AppError, Result};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    dto::{
        common::ListQuery,
        users::{UserListResponse, UserResponse},
    },
    AppState,
};

/// List active users.
pub async fn list_users_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<UserListResponse>> {
    let select = UsersEntity::find()
        .filter(UserColumn::IsActive.eq(true))
        .order_by_asc(UserColumn::LastName)
        .order_by_asc(UserColumn::FirstName);

    let (users, pagination) = super::fetch_page(&state.db, select, &query).await?;

    Ok(Json(UserListResponse {
        success: true,
        users: users.iter().map(UserResponse::from_model).collect(),
        pagination,
    }))
}

/// Get a single active user.
pub async fn get_user_handler(State(state): State<AppState>, Path(user_id): Path<Uuid>) -> Result<Json<UserResponse>> {
    let user = UsersEntity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserResponse::from_model(&user)))
}
