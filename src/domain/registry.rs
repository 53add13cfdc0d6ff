// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr};

use crate::config::orm_config::OrmConfig;
use crate::domain::errors::OrmError;

/// 连接注册表特质
///
/// 进程级的 别名 -> 连接池 映射。实现必须是可克隆的句柄，
/// 克隆之间共享同一组连接。
#[async_trait]
pub trait ConnectionRegistry: Clone + Send + Sync + 'static {
    /// 按配置打开全部连接
    ///
    /// 无法解析连接 URL 时返回 [`OrmError::Configuration`] 且不打开任何连接；
    /// 打开失败时已打开的连接必须被关闭，数据库错误包装为 [`OrmError::Connection`]
    async fn open(&self, config: &OrmConfig) -> Result<(), OrmError>;

    /// 根据别名获取连接
    fn connection(&self, alias: &str) -> Option<DatabaseConnection>;

    /// 根据别名获取连接，连接未打开时返回错误
    fn require(&self, alias: &str) -> Result<DatabaseConnection, OrmError> {
        self.connection(alias)
            .ok_or_else(|| OrmError::UnknownConnection(alias.to_string()))
    }

    /// 当前已打开的连接别名（有序）
    fn aliases(&self) -> Vec<String>;

    /// 关闭全部连接
    async fn close_all(&self) -> Result<(), DbErr>;
}
