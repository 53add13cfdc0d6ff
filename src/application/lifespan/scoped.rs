// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;
use tracing::warn;

use crate::application::lifespan::coordinator::OrmLifespan;
use crate::domain::errors::OrmError;
use crate::domain::host::Host;
use crate::domain::registry::ConnectionRegistry;

impl<R: ConnectionRegistry> OrmLifespan<R> {
    /// 作用域激活
    ///
    /// 进入时执行 [`OrmLifespan::open`]，随后把宿主和注册表句柄交给 `body`。
    /// 无论 `body` 正常返回、返回错误还是 panic，初始化成功后 `close` 都恰好执行一次。
    /// `body` 的错误优先于关闭错误返回
    pub async fn scope<H, F, Fut, T, E>(mut self, mut host: H, body: F) -> Result<T, E>
    where
        H: Host,
        F: FnOnce(H, R) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<OrmError>,
    {
        self.open(&mut host).await?;

        let outcome = AssertUnwindSafe(body(host, self.registry().clone()))
            .catch_unwind()
            .await;
        let closed = self.close().await;

        match outcome {
            Err(payload) => {
                if let Err(err) = closed {
                    warn!(error = %err, "Failed to close ORM after panic");
                }
                panic::resume_unwind(payload)
            }
            Ok(Err(err)) => {
                if let Err(close_err) = closed {
                    warn!(error = %close_err, "Failed to close ORM after error");
                }
                Err(err)
            }
            Ok(Ok(value)) => {
                closed?;
                Ok(value)
            }
        }
    }
}
