// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::integration::helpers::counting_registry::CountingRegistry;
use crate::integration::helpers::memory_options;
use crate::integration::helpers::recording_host::RecordingHost;
use orm_lifespan::application::lifespan::OrmLifespan;
use orm_lifespan::config::orm_config::{AppConfig, ConnectionSpec, OrmConfig, OrmOptions};
use orm_lifespan::domain::errors::{ErrorKind, OrmError};
use orm_lifespan::domain::lifecycle::LifecycleState;
use orm_lifespan::domain::registry::ConnectionRegistry;
use orm_lifespan::domain::schema::SchemaGenerator;
use orm_lifespan::infrastructure::database::bulk::bulk_insert;
use orm_lifespan::infrastructure::database::entities::{self, users};
use orm_lifespan::infrastructure::database::registry::SeaOrmRegistry;
use orm_lifespan::infrastructure::database::schema::{EntitySchemaGenerator, ModelCatalog};
use sea_orm::{ActiveValue::Set, DatabaseBackend, DbErr, EntityTrait, PaginatorTrait};
use std::collections::BTreeMap;
use std::sync::Arc;

fn coordinator(options: OrmOptions, registry: CountingRegistry) -> OrmLifespan<CountingRegistry> {
    OrmLifespan::with_registry(
        options,
        registry,
        Arc::new(EntitySchemaGenerator::new(entities::catalog())),
    )
}

/// 初始化与关闭的完整流程
#[tokio::test]
async fn init_then_close_releases_every_connection() {
    let registry = CountingRegistry::new();
    let mut orm = coordinator(memory_options(), registry.clone());
    assert_eq!(orm.state(), LifecycleState::Unstarted);

    orm.init().await.unwrap();
    assert_eq!(orm.state(), LifecycleState::Ready);
    assert_eq!(registry.aliases(), vec!["default".to_string()]);

    orm.close().await.unwrap();
    assert_eq!(orm.state(), LifecycleState::Closed);
    assert_eq!(registry.closes(), 1);
    assert!(registry.aliases().is_empty());
}

#[tokio::test]
async fn close_is_not_idempotent() {
    let registry = CountingRegistry::new();
    let mut orm = coordinator(memory_options(), registry.clone());
    orm.init().await.unwrap();
    orm.close().await.unwrap();

    let err = orm.close().await.unwrap_err();
    assert!(matches!(
        err,
        OrmError::Lifecycle {
            state: LifecycleState::Closed,
            ..
        }
    ));
    assert_eq!(registry.closes(), 1);
}

#[tokio::test]
async fn close_before_init_is_rejected() {
    let mut orm = coordinator(memory_options(), CountingRegistry::new());
    let err = orm.close().await.unwrap_err();
    assert!(matches!(
        err,
        OrmError::Lifecycle {
            state: LifecycleState::Unstarted,
            ..
        }
    ));
}

#[tokio::test]
async fn init_twice_is_rejected() {
    let mut orm = coordinator(memory_options(), CountingRegistry::new());
    orm.init().await.unwrap();
    assert!(matches!(
        orm.init().await,
        Err(OrmError::Lifecycle {
            state: LifecycleState::Ready,
            ..
        })
    ));
    orm.close().await.unwrap();
}

#[tokio::test]
async fn connection_failure_surfaces_unchanged_and_keeps_state() {
    let registry = CountingRegistry::failing();
    let mut orm = coordinator(memory_options(), registry.clone());

    let err = orm.init().await.unwrap_err();
    assert!(matches!(
        err,
        OrmError::Connection(DbErr::Custom(ref msg)) if msg == "connection refused"
    ));
    assert_eq!(err.to_string(), "Custom Error: connection refused");
    assert_eq!(orm.state(), LifecycleState::Unstarted);
    assert_eq!(registry.opens(), 1);
}

/// 无法解析的连接 URL 保持配置错误类型，且不会打开任何连接
#[tokio::test]
async fn registry_reports_bad_url_as_configuration_error() {
    let config = OrmConfig {
        connections: BTreeMap::from([
            (
                "default".to_string(),
                ConnectionSpec::Url("sqlite://:memory:".to_string()),
            ),
            (
                "reports".to_string(),
                ConnectionSpec::Url("redis://localhost/0".to_string()),
            ),
        ]),
        apps: BTreeMap::from([("models".to_string(), AppConfig::new(vec!["models".to_string()]))]),
    };
    let registry = SeaOrmRegistry::new();

    let err = registry.open(&config).await.unwrap_err();
    assert!(matches!(err, OrmError::Configuration(ref msg) if msg.contains("redis")));
    assert!(registry.aliases().is_empty());
}

#[tokio::test]
async fn unknown_model_module_is_configuration_error() {
    let registry = CountingRegistry::new();
    let options = OrmOptions::new()
        .with_db_url("sqlite://:memory:")
        .with_modules([("models", vec!["app.missing"])]);
    let mut orm = coordinator(options, registry.clone());

    let err = orm.init().await.unwrap_err();
    assert!(matches!(err, OrmError::Configuration(ref msg) if msg.contains("app.missing")));
    assert_eq!(registry.opens(), 0);
}

#[tokio::test]
async fn exception_handlers_require_ready_state() {
    let mut host = RecordingHost::new();
    let mut orm = coordinator(memory_options(), CountingRegistry::new());

    assert!(matches!(
        orm.register_exception_handlers(&mut host),
        Err(OrmError::Lifecycle {
            state: LifecycleState::Unstarted,
            ..
        })
    ));
    assert!(host.handlers.is_empty());

    orm.init().await.unwrap();
    orm.register_exception_handlers(&mut host).unwrap();
    assert_eq!(
        host.kinds(),
        vec![ErrorKind::NotFound, ErrorKind::IntegrityViolation]
    );
    orm.close().await.unwrap();
}

#[tokio::test]
async fn generate_schemas_creates_missing_tables() {
    let registry = CountingRegistry::new();
    let mut orm = coordinator(memory_options().generate_schemas(true), registry.clone());
    orm.init().await.unwrap();

    let db = registry.require("default").unwrap();
    assert_eq!(users::Entity::find().count(&db).await.unwrap(), 0);

    // Additive generation can run again against existing tables.
    let generator = EntitySchemaGenerator::new(entities::catalog());
    generator
        .generate(&db, "models", &["models".to_string()], true)
        .await
        .unwrap();

    orm.close().await.unwrap();
}

#[tokio::test]
async fn without_generate_schemas_no_table_exists() {
    let registry = CountingRegistry::new();
    let mut orm = coordinator(memory_options(), registry.clone());
    orm.init().await.unwrap();

    let db = registry.require("default").unwrap();
    assert!(users::Entity::find().count(&db).await.is_err());

    orm.close().await.unwrap();
}

#[test]
fn schema_sql_is_additive_when_safe() {
    let generator = EntitySchemaGenerator::new(entities::catalog());
    let models = vec!["models".to_string()];

    let safe = generator.schema_sql(DatabaseBackend::Sqlite, &models, true);
    assert!(safe.contains("CREATE TABLE IF NOT EXISTS \"users\""));

    let unsafe_sql = generator.schema_sql(DatabaseBackend::Sqlite, &models, false);
    assert!(unsafe_sql.starts_with("CREATE TABLE \"users\""));
    assert!(!unsafe_sql.to_uppercase().contains("DROP"));

    let empty = EntitySchemaGenerator::new(ModelCatalog::new().module("models"));
    assert!(empty.schema_sql(DatabaseBackend::Sqlite, &models, true).is_empty());
}

#[tokio::test]
async fn bulk_insert_writes_every_batch() {
    let registry = CountingRegistry::new();
    let mut orm = coordinator(memory_options().generate_schemas(true), registry.clone());
    orm.init().await.unwrap();
    let db = registry.require("default").unwrap();

    let models: Vec<users::ActiveModel> = (0..7)
        .map(|i| users::ActiveModel {
            username: Set(format!("user{}", i)),
            ..Default::default()
        })
        .collect();

    assert_eq!(bulk_insert(&db, models, Some(3)).await.unwrap(), 7);
    assert_eq!(users::Entity::find().count(&db).await.unwrap(), 7);
    assert_eq!(
        bulk_insert(&db, Vec::<users::ActiveModel>::new(), None)
            .await
            .unwrap(),
        0
    );

    orm.close().await.unwrap();
}
