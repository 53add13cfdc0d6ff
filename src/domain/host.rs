// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;

use crate::domain::errors::ErrorKind;

/// 异常处理器：把错误转换为结构化响应
pub type ExceptionHandler = Arc<dyn Fn(&anyhow::Error) -> Response + Send + Sync>;

/// 宿主启动/关闭钩子
#[async_trait]
pub trait Lifespan: Send + Sync {
    /// 宿主开始处理请求之前调用
    async fn startup(&self) -> anyhow::Result<()>;

    /// 宿主停止处理请求之后调用
    async fn shutdown(&self) -> anyhow::Result<()>;
}

/// 宿主服务的集成点
pub trait Host {
    /// 为错误类别注册异常处理器，重复注册会覆盖之前的处理器
    fn add_exception_handler(&mut self, kind: ErrorKind, handler: ExceptionHandler);

    /// 安装启动/关闭钩子，替换已有钩子
    fn set_lifespan(&mut self, lifespan: Arc<dyn Lifespan>);
}
