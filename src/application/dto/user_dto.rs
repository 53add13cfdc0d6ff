// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 创建/更新用户的请求DTO
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UserInDto {
    /// 用户名，唯一
    #[validate(length(min = 1, max = 20, message = "username must be 1-20 characters"))]
    pub username: String,
    /// 名
    #[validate(length(max = 50))]
    pub name: Option<String>,
    /// 姓
    #[validate(length(max = 50))]
    pub family_name: Option<String>,
}

/// 用户ID路径参数
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct UserPath {
    #[validate(range(min = 1, message = "user_id must be positive"))]
    pub user_id: i32,
}

/// 操作结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusDto {
    pub message: String,
}
