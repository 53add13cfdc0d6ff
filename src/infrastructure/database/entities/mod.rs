// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 示例服务的数据库实体
pub mod users;

use crate::infrastructure::database::schema::ModelCatalog;

/// 示例服务的模型目录，`models` 位置下包含全部实体
pub fn catalog() -> ModelCatalog {
    ModelCatalog::new().register("models", users::Entity)
}
