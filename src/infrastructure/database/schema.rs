// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, Schema};
use tracing::debug;

use crate::config::orm_config::AppConfig;
use crate::domain::errors::OrmError;
use crate::domain::schema::SchemaGenerator;

type TableBuilder = Box<dyn Fn(&Schema) -> TableCreateStatement + Send + Sync>;

/// 模型目录
///
/// 将模型发现位置映射到其包含的实体。Rust 无法在运行时导入模块，
/// 因此由调用方预先登记每个位置下的实体
#[derive(Default)]
pub struct ModelCatalog {
    modules: BTreeMap<String, Vec<TableBuilder>>,
}

impl fmt::Debug for ModelCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.modules.iter().map(|(k, v)| (k, v.len())))
            .finish()
    }
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个不包含实体的发现位置
    pub fn module(mut self, location: impl Into<String>) -> Self {
        self.modules.entry(location.into()).or_default();
        self
    }

    /// 在发现位置下登记实体，建表顺序与登记顺序一致
    pub fn register<E>(mut self, location: impl Into<String>, entity: E) -> Self
    where
        E: EntityTrait + Copy + Send + Sync + 'static,
    {
        self.modules
            .entry(location.into())
            .or_default()
            .push(Box::new(move |schema| schema.create_table_from_entity(entity)));
        self
    }

    pub fn contains(&self, location: &str) -> bool {
        self.modules.contains_key(location)
    }

    fn tables(&self, backend: DatabaseBackend, models: &[String], safe: bool) -> Vec<TableCreateStatement> {
        let schema = Schema::new(backend);
        models
            .iter()
            .filter_map(|location| self.modules.get(location))
            .flatten()
            .map(|build| {
                let mut table = build(&schema);
                if safe {
                    table.if_not_exists();
                }
                table
            })
            .collect()
    }
}

/// 基于实体定义的建表生成器
#[derive(Debug, Default)]
pub struct EntitySchemaGenerator {
    catalog: ModelCatalog,
}

impl EntitySchemaGenerator {
    pub fn new(catalog: ModelCatalog) -> Self {
        Self { catalog }
    }

    /// 生成建表 SQL
    ///
    /// `safe` 为 `true` 时每条语句带 `IF NOT EXISTS`；没有模型时返回空字符串
    pub fn schema_sql(&self, backend: DatabaseBackend, models: &[String], safe: bool) -> String {
        self.catalog
            .tables(backend, models, safe)
            .iter()
            .map(|table| format!("{};", backend.build(table)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl SchemaGenerator for EntitySchemaGenerator {
    fn validate(&self, apps: &BTreeMap<String, AppConfig>) -> Result<(), OrmError> {
        for (app, config) in apps {
            if let Some(missing) = config.models.iter().find(|m| !self.catalog.contains(m)) {
                return Err(OrmError::Configuration(format!(
                    "Module \"{}\" of app \"{}\" not found",
                    missing, app
                )));
            }
        }
        Ok(())
    }

    async fn generate(
        &self,
        conn: &DatabaseConnection,
        app: &str,
        models: &[String],
        safe: bool,
    ) -> Result<(), OrmError> {
        let backend = conn.get_database_backend();
        let tables = self.catalog.tables(backend, models, safe);
        if tables.is_empty() {
            debug!(app = %app, "No models to create");
            return Ok(());
        }

        debug!(app = %app, schema = %self.schema_sql(backend, models, safe), "Creating schema");
        for table in &tables {
            conn.execute(backend.build(table))
                .await
                .map_err(OrmError::Schema)?;
        }
        Ok(())
    }
}
