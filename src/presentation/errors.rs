// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// 应用错误类型
///
/// 封装所有可能的应用层错误。未被异常处理器翻译的错误走宿主的通用错误路径
#[derive(Debug)]
pub struct AppError(anyhow::Error);

/// 随响应携带的原始错误，供异常处理中间件翻译
#[derive(Debug, Clone)]
pub struct CarriedError(pub Arc<anyhow::Error>);

impl AppError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let status = if self.0.downcast_ref::<validator::ValidationErrors>().is_some() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = Json(json!({ "error": error_message }));
        let mut response = (status, body).into_response();
        response
            .extensions_mut()
            .insert(CarriedError(Arc::new(self.0)));
        response
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
