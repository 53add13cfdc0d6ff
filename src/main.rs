// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use orm_lifespan::application::lifespan::OrmLifespan;
use orm_lifespan::config::settings::Settings;
use orm_lifespan::infrastructure::database::entities;
use orm_lifespan::presentation::host::AppHost;
use orm_lifespan::presentation::routes;
use orm_lifespan::utils::telemetry;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

/// 主函数
///
/// 以作用域方式管理 ORM：服务停止后连接一定被关闭
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();
    info!("Starting orm-lifespan...");

    let settings = Settings::new()?;
    info!("Configuration loaded");

    let orm = OrmLifespan::new(settings.orm.to_options(), entities::catalog());
    let host = AppHost::new(routes::routes(orm.registry().clone()));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    orm.scope(host, |host, _registry| async move {
        host.serve(listener, shutdown_signal()).await
    })
    .await
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }
}
