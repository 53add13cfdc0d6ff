// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::domain::errors::ErrorKind;
use crate::domain::host::{ExceptionHandler, Host, Lifespan};
use crate::presentation::errors::CarriedError;

type HandlerTable = HashMap<ErrorKind, ExceptionHandler>;

/// 基于 axum 的宿主
///
/// 持有路由、异常处理器表以及可选的启动/关闭钩子
pub struct AppHost {
    router: Router,
    handlers: HandlerTable,
    lifespan: Option<Arc<dyn Lifespan>>,
}

impl AppHost {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            handlers: HashMap::new(),
            lifespan: None,
        }
    }

    /// 是否已为该错误类别注册处理器
    pub fn has_exception_handler(&self, kind: ErrorKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// 是否已安装启动/关闭钩子
    pub fn has_lifespan(&self) -> bool {
        self.lifespan.is_some()
    }

    /// 构建带异常翻译中间件的路由
    pub fn router(&self) -> Router {
        let handlers = Arc::new(self.handlers.clone());
        self.router
            .clone()
            .layer(middleware::from_fn_with_state(handlers, translate_errors))
    }

    /// 运行启动钩子
    pub async fn startup(&self) -> anyhow::Result<()> {
        if let Some(lifespan) = &self.lifespan {
            lifespan.startup().await?;
        }
        Ok(())
    }

    /// 运行关闭钩子
    pub async fn shutdown(&self) -> anyhow::Result<()> {
        if let Some(lifespan) = &self.lifespan {
            lifespan.shutdown().await?;
        }
        Ok(())
    }

    /// 启动服务
    ///
    /// 先运行启动钩子，收到 `signal` 后优雅停止，最后运行关闭钩子。
    /// 服务出错时关闭钩子仍会执行
    pub async fn serve<F>(self, listener: TcpListener, signal: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.startup().await?;

        info!("Host started");
        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await;

        let closed = self.shutdown().await;
        info!("Host stopped");

        served?;
        closed
    }
}

impl Host for AppHost {
    fn add_exception_handler(&mut self, kind: ErrorKind, handler: ExceptionHandler) {
        debug!(?kind, "Exception handler registered");
        self.handlers.insert(kind, handler);
    }

    fn set_lifespan(&mut self, lifespan: Arc<dyn Lifespan>) {
        self.lifespan = Some(lifespan);
    }
}

/// 异常翻译中间件
///
/// 响应携带的错误若有已注册的处理器，则用处理器的输出替换原响应
async fn translate_errors(
    State(handlers): State<Arc<HandlerTable>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    let Some(CarriedError(err)) = response.extensions().get::<CarriedError>().cloned() else {
        return response;
    };
    let Some(handler) = ErrorKind::of_error(&err).and_then(|kind| handlers.get(&kind)) else {
        return response;
    };

    debug!(error = %err, "Translating error response");
    handler(&err)
}
