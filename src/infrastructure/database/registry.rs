// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use sea_orm::{DatabaseConnection, DbErr};
use tracing::{debug, warn};

use crate::config::orm_config::OrmConfig;
use crate::domain::errors::OrmError;
use crate::domain::registry::ConnectionRegistry;
use crate::infrastructure::database::connection::{create_pool, PoolSettings};
use crate::utils::concurrency::gather;

/// 基于 sea-orm 连接池的连接注册表
///
/// 克隆得到的句柄共享同一组连接
#[derive(Debug, Clone, Default)]
pub struct SeaOrmRegistry {
    connections: Arc<DashMap<String, DatabaseConnection>>,
}

impl SeaOrmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否没有任何打开的连接
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    async fn close_aliases(&self, aliases: Vec<String>) -> Result<(), DbErr> {
        let pools: Vec<(String, DatabaseConnection)> = aliases
            .into_iter()
            .filter_map(|alias| self.connections.remove(&alias))
            .collect();

        gather(pools.into_iter().map(|(alias, conn)| async move {
            conn.close().await?;
            debug!(alias = %alias, "Connection closed");
            Ok(())
        }))
        .await
    }
}

#[async_trait]
impl ConnectionRegistry for SeaOrmRegistry {
    async fn open(&self, config: &OrmConfig) -> Result<(), OrmError> {
        let targets = config
            .connections
            .iter()
            .map(|(alias, spec)| Ok((alias, spec.to_url()?, PoolSettings::from(spec))))
            .collect::<Result<Vec<_>, OrmError>>()?;

        let mut opened = Vec::with_capacity(targets.len());
        for (alias, url, settings) in targets {
            match create_pool(&url, &settings).await {
                Ok(conn) => {
                    debug!(alias = %alias, "Connection opened");
                    self.connections.insert(alias.clone(), conn);
                    opened.push(alias.clone());
                }
                Err(err) => {
                    warn!(alias = %alias, error = %err, "Failed to open connection");
                    if let Err(close_err) = self.close_aliases(opened).await {
                        warn!(error = %close_err, "Failed to close connections after open failure");
                    }
                    return Err(OrmError::Connection(err));
                }
            }
        }

        Ok(())
    }

    fn connection(&self, alias: &str) -> Option<DatabaseConnection> {
        self.connections.get(alias).map(|entry| entry.value().clone())
    }

    fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self
            .connections
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        aliases.sort();
        aliases
    }

    async fn close_all(&self) -> Result<(), DbErr> {
        self.close_aliases(self.aliases()).await
    }
}
