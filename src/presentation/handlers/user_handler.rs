// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, QueryOrder};
use serde_json::json;
use validator::Validate;

use crate::application::dto::user_dto::{StatusDto, UserInDto, UserPath};
use crate::config::orm_config::DEFAULT_CONNECTION;
use crate::domain::errors::OrmError;
use crate::domain::registry::ConnectionRegistry;
use crate::infrastructure::database::entities::users;
use crate::infrastructure::database::registry::SeaOrmRegistry;
use crate::presentation::errors::AppError;

async fn find_user(
    registry: &SeaOrmRegistry,
    user_id: i32,
) -> Result<users::Model, AppError> {
    let db = registry.require(DEFAULT_CONNECTION)?;
    users::Entity::find_by_id(user_id)
        .one(&db)
        .await?
        .ok_or_else(|| OrmError::NotFound(format!("User {} not found", user_id)).into())
}

/// 列出全部用户
pub async fn get_users(
    Extension(registry): Extension<SeaOrmRegistry>,
) -> Result<Json<Vec<users::Model>>, AppError> {
    let db = registry.require(DEFAULT_CONNECTION)?;
    let users = users::Entity::find()
        .order_by_asc(users::Column::Id)
        .all(&db)
        .await?;
    Ok(Json(users))
}

/// 创建用户，用户名重复时返回完整性错误
pub async fn create_user(
    Extension(registry): Extension<SeaOrmRegistry>,
    Json(payload): Json<UserInDto>,
) -> Result<Json<users::Model>, AppError> {
    payload.validate()?;
    let db = registry.require(DEFAULT_CONNECTION)?;

    let user = users::ActiveModel {
        username: Set(payload.username),
        name: Set(payload.name),
        family_name: Set(payload.family_name),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    Ok(Json(user))
}

/// 获取单个用户
pub async fn get_user(
    Extension(registry): Extension<SeaOrmRegistry>,
    Path(path): Path<UserPath>,
) -> Result<Json<users::Model>, AppError> {
    path.validate()?;
    Ok(Json(find_user(&registry, path.user_id).await?))
}

/// 更新用户
pub async fn update_user(
    Extension(registry): Extension<SeaOrmRegistry>,
    Path(path): Path<UserPath>,
    Json(payload): Json<UserInDto>,
) -> Result<Json<users::Model>, AppError> {
    path.validate()?;
    payload.validate()?;
    let db = registry.require(DEFAULT_CONNECTION)?;

    let mut user: users::ActiveModel = find_user(&registry, path.user_id).await?.into();
    user.username = Set(payload.username);
    user.name = Set(payload.name);
    user.family_name = Set(payload.family_name);
    let user = user.update(&db).await?;

    Ok(Json(user))
}

/// 删除用户
///
/// 用户不存在时直接返回 404，不依赖异常处理器
pub async fn delete_user(
    Extension(registry): Extension<SeaOrmRegistry>,
    Path(path): Path<UserPath>,
) -> Result<Response, AppError> {
    path.validate()?;
    let db = registry.require(DEFAULT_CONNECTION)?;

    let result = users::Entity::delete_by_id(path.user_id).exec(&db).await?;
    if result.rows_affected == 0 {
        let detail = format!("User {} not found", path.user_id);
        return Ok((StatusCode::NOT_FOUND, Json(json!({ "detail": detail }))).into_response());
    }

    Ok(Json(StatusDto {
        message: format!("Deleted user {}", path.user_id),
    })
    .into_response())
}
