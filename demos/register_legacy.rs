// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 兼容旧版的单次调用方式：宿主的启动/关闭钩子驱动初始化与关闭

use orm_lifespan::application::lifespan::register_orm_with_options;
use orm_lifespan::config::orm_config::OrmOptions;
use orm_lifespan::infrastructure::database::entities;
use orm_lifespan::infrastructure::database::registry::SeaOrmRegistry;
use orm_lifespan::presentation::host::AppHost;
use orm_lifespan::presentation::routes;
use orm_lifespan::utils::telemetry;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();

    let options = OrmOptions::new()
        .with_db_url("sqlite://:memory:")
        .with_modules([("models", vec!["models"])])
        .generate_schemas(true)
        .add_exception_handlers(true);

    let registry = SeaOrmRegistry::new();
    let mut host = AppHost::new(routes::routes(registry.clone()));
    register_orm_with_options(&mut host, registry, options, entities::catalog())?;

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    info!("Server listening on 127.0.0.1:3000");
    host.serve(listener, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}
