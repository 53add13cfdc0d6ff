// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::orm_config::ConnectionSpec;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// 连接池设置
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolSettings {
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

impl From<&ConnectionSpec> for PoolSettings {
    fn from(spec: &ConnectionSpec) -> Self {
        match spec {
            ConnectionSpec::Url(_) => PoolSettings::default(),
            ConnectionSpec::Descriptor(descriptor) => PoolSettings {
                max_connections: descriptor.max_connections,
                min_connections: descriptor.min_connections,
                connect_timeout: descriptor.connect_timeout,
                idle_timeout: descriptor.idle_timeout,
            },
        }
    }
}

/// 创建数据库连接池
///
/// 内存 SQLite 数据库只在连接存活期间存在，因此固定为单连接且不回收
///
/// # 参数
///
/// * `url` - 已规范化的连接URL
/// * `settings` - 连接池配置
///
/// # 返回值
///
/// * `Ok(DatabaseConnection)` - 数据库连接
/// * `Err(DbErr)` - 连接过程中出现的错误
pub async fn create_pool(url: &str, settings: &PoolSettings) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(url.to_owned());

    if url.starts_with("sqlite::memory:") {
        opt.max_connections(1).min_connections(1);
    } else {
        if let Some(max) = settings.max_connections {
            opt.max_connections(max);
        }

        if let Some(min) = settings.min_connections {
            opt.min_connections(min);
        }

        if let Some(idle) = settings.idle_timeout {
            opt.idle_timeout(Duration::from_secs(idle));
        }

        opt.max_lifetime(Duration::from_secs(3600));
    }

    if let Some(timeout) = settings.connect_timeout {
        opt.connect_timeout(Duration::from_secs(timeout));
        opt.acquire_timeout(Duration::from_secs(timeout));
    }

    opt.sqlx_logging(true);

    Database::connect(opt).await
}
