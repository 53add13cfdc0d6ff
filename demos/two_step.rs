// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 显式两步方式：先 `open`，服务结束后由调用方 `close`

use orm_lifespan::application::lifespan::OrmLifespan;
use orm_lifespan::config::orm_config::OrmOptions;
use orm_lifespan::infrastructure::database::entities;
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

    let mut orm = OrmLifespan::new(options, entities::catalog());
    let mut host = AppHost::new(routes::routes(orm.registry().clone()));
    orm.open(&mut host).await?;

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    info!("Server listening on 127.0.0.1:3000");
    let served = host
        .serve(listener, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    orm.close().await?;
    served
}
