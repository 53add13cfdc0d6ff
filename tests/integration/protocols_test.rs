// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::integration::helpers::counting_registry::CountingRegistry;
use crate::integration::helpers::memory_options;
use crate::integration::helpers::recording_host::RecordingHost;
use futures::FutureExt;
use orm_lifespan::application::lifespan::{register_orm, OrmLifespan};
use orm_lifespan::config::orm_config::OrmOptions;
use orm_lifespan::domain::errors::{ErrorKind, OrmError};
use orm_lifespan::domain::lifecycle::LifecycleState;
use orm_lifespan::domain::registry::ConnectionRegistry;
use orm_lifespan::infrastructure::database::entities;
use orm_lifespan::infrastructure::database::schema::EntitySchemaGenerator;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

fn coordinator(options: OrmOptions, registry: CountingRegistry) -> OrmLifespan<CountingRegistry> {
    OrmLifespan::with_registry(
        options,
        registry,
        Arc::new(EntitySchemaGenerator::new(entities::catalog())),
    )
}

fn full_options() -> OrmOptions {
    memory_options()
        .generate_schemas(true)
        .add_exception_handlers(true)
}

async fn panicking_body(_host: RecordingHost, _registry: CountingRegistry) -> Result<(), OrmError> {
    panic!("body failed")
}

/// 作用域方式：正常退出
#[tokio::test]
async fn scope_opens_registers_and_closes() {
    let registry = CountingRegistry::new();
    let orm = coordinator(full_options(), registry.clone());

    let (kinds, aliases) = orm
        .scope(RecordingHost::new(), |host, registry| async move {
            Ok::<_, OrmError>((host.kinds(), registry.aliases()))
        })
        .await
        .unwrap();

    assert_eq!(kinds, vec![ErrorKind::NotFound, ErrorKind::IntegrityViolation]);
    assert_eq!(aliases, vec!["default".to_string()]);
    assert_eq!(registry.opens(), 1);
    assert_eq!(registry.closes(), 1);
    assert!(registry.aliases().is_empty());
}

#[tokio::test]
async fn scope_closes_once_when_body_fails() {
    let registry = CountingRegistry::new();
    let orm = coordinator(full_options(), registry.clone());

    let result = orm
        .scope(RecordingHost::new(), |_host, _registry| async {
            Err::<(), OrmError>(OrmError::NotFound("boom".to_string()))
        })
        .await;

    assert!(matches!(result, Err(OrmError::NotFound(ref msg)) if msg == "boom"));
    assert_eq!(registry.closes(), 1);
}

#[tokio::test]
async fn scope_closes_once_when_body_panics() {
    let registry = CountingRegistry::new();
    let orm = coordinator(full_options(), registry.clone());

    let outcome = AssertUnwindSafe(orm.scope(RecordingHost::new(), panicking_body))
        .catch_unwind()
        .await;

    assert!(outcome.is_err());
    assert_eq!(registry.closes(), 1);
}

#[tokio::test]
async fn scope_skips_body_and_close_when_init_fails() {
    let registry = CountingRegistry::failing();
    let orm = coordinator(full_options(), registry.clone());

    let result = orm
        .scope(RecordingHost::new(), panicking_body)
        .await;

    assert!(matches!(result, Err(OrmError::Connection(_))));
    assert_eq!(registry.closes(), 0);
}

/// 显式两步方式
#[tokio::test]
async fn two_step_open_leaves_close_to_caller() {
    let registry = CountingRegistry::new();
    let mut host = RecordingHost::new();
    let mut orm = coordinator(full_options(), registry.clone());

    orm.open(&mut host).await.unwrap();
    assert_eq!(orm.state(), LifecycleState::Ready);
    assert_eq!(host.kinds().len(), 2);
    assert_eq!(registry.closes(), 0);

    orm.close().await.unwrap();
    assert_eq!(registry.closes(), 1);
    assert!(orm.into_registry().aliases().is_empty());
}

#[tokio::test]
async fn two_step_without_opt_in_registers_no_handlers() {
    let mut host = RecordingHost::new();
    let mut orm = coordinator(memory_options(), CountingRegistry::new());

    orm.open(&mut host).await.unwrap();
    assert!(host.handlers.is_empty());
    orm.close().await.unwrap();
}

/// 旧版单次调用方式：宿主钩子驱动初始化与关闭
#[tokio::test]
async fn legacy_registration_matches_scoped_end_state() {
    let registry = CountingRegistry::new();
    let mut host = RecordingHost::new();
    let lifespan = register_orm(&mut host, coordinator(full_options(), registry.clone())).unwrap();

    // Handlers are installed synchronously at registration time.
    assert_eq!(host.kinds(), vec![ErrorKind::NotFound, ErrorKind::IntegrityViolation]);
    let hooks = host.lifespan.clone().expect("lifespan installed");

    hooks.startup().await.unwrap();
    assert_eq!(lifespan.state().await, LifecycleState::Ready);
    assert_eq!(lifespan.registry().await.aliases(), vec!["default".to_string()]);

    hooks.shutdown().await.unwrap();
    assert_eq!(lifespan.state().await, LifecycleState::Closed);
    assert_eq!(registry.opens(), 1);
    assert_eq!(registry.closes(), 1);
    assert!(registry.aliases().is_empty());
}

#[tokio::test]
async fn legacy_background_init_runs_before_startup_hook() {
    let registry = CountingRegistry::new();
    let mut host = RecordingHost::new();
    let lifespan = register_orm(&mut host, coordinator(memory_options(), registry.clone())).unwrap();
    assert!(host.handlers.is_empty());

    let ready = async {
        while lifespan.state().await != LifecycleState::Ready {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(5), ready)
        .await
        .expect("background init finished");

    // The startup hook joins the scheduled init instead of running it again.
    let hooks = host.lifespan.clone().unwrap();
    hooks.startup().await.unwrap();
    assert_eq!(registry.opens(), 1);

    hooks.shutdown().await.unwrap();
    assert!(hooks.shutdown().await.is_err());
}

#[tokio::test]
async fn legacy_startup_surfaces_connection_error() {
    let mut host = RecordingHost::new();
    register_orm(&mut host, coordinator(memory_options(), CountingRegistry::failing())).unwrap();

    let err = host.lifespan.clone().unwrap().startup().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OrmError>(),
        Some(OrmError::Connection(_))
    ));
}

#[test]
fn legacy_registration_requires_runtime() {
    let mut host = RecordingHost::new();
    let result = register_orm(&mut host, coordinator(memory_options(), CountingRegistry::new()));
    assert!(matches!(result, Err(OrmError::Runtime(_))));
    assert!(host.lifespan.is_none());
}
