// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::config::orm_config::AppConfig;
use crate::domain::errors::OrmError;

/// 建表生成器特质
#[async_trait]
pub trait SchemaGenerator: Send + Sync {
    /// 校验所有应用的模型发现位置
    ///
    /// 在尝试任何连接之前调用
    fn validate(&self, apps: &BTreeMap<String, AppConfig>) -> Result<(), OrmError>;

    /// 在应用的默认连接上创建其模型对应的表
    ///
    /// `safe` 为 `true` 时只创建不存在的表，绝不删除已有结构
    async fn generate(
        &self,
        conn: &DatabaseConnection,
        app: &str,
        models: &[String],
        safe: bool,
    ) -> Result<(), OrmError>;
}
