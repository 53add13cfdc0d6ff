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

use crate::domain::errors::ErrorKind;
use crate::domain::host::Host;

/// 记录不存在：404，`{"detail": <message>}`
pub fn not_found_response(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": message }))).into_response()
}

/// 违反完整性约束：422，结构与请求校验失败的响应一致
pub fn integrity_error_response(message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "detail": [{ "loc": [], "msg": message, "type": "IntegrityError" }]
        })),
    )
        .into_response()
}

/// 向宿主注册 NotFound 与 IntegrityViolation 两个异常处理器
///
/// 错误信息会原样返回给客户端，生产环境中可能泄露内部数据
pub fn register_exception_handlers<H>(host: &mut H)
where
    H: Host + ?Sized,
{
    host.add_exception_handler(
        ErrorKind::NotFound,
        Arc::new(|err: &anyhow::Error| not_found_response(&err.to_string())),
    );
    host.add_exception_handler(
        ErrorKind::IntegrityViolation,
        Arc::new(|err: &anyhow::Error| integrity_error_response(&err.to_string())),
    );
}
