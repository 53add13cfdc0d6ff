// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 异常翻译测试模块
///
/// 验证状态码和响应体与既有客户端逐字节兼容
use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::Response;
use orm_lifespan::domain::errors::{ErrorKind, OrmError};
use orm_lifespan::presentation::exception_handlers::{
    integrity_error_response, not_found_response, register_exception_handlers,
};

use crate::integration::helpers::recording_host::RecordingHost;

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_not_found_response_shape() {
    let response = not_found_response("User 5 not found");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, r#"{"detail":"User 5 not found"}"#);
}

#[tokio::test]
async fn test_integrity_error_response_shape() {
    let response = integrity_error_response("UNIQUE constraint failed: users.username");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_string(response).await,
        r#"{"detail":[{"loc":[],"msg":"UNIQUE constraint failed: users.username","type":"IntegrityError"}]}"#
    );
}

#[tokio::test]
async fn test_registered_handlers_translate_orm_errors() {
    let mut host = RecordingHost::new();
    register_exception_handlers(&mut host);
    assert_eq!(
        host.kinds(),
        vec![ErrorKind::NotFound, ErrorKind::IntegrityViolation]
    );

    let err = anyhow::Error::new(OrmError::NotFound("User 5 not found".to_string()));
    let (_, handler) = &host.handlers[0];
    let response = handler(&err);
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, r#"{"detail":"User 5 not found"}"#);
}

#[test]
fn test_error_kind_classification() {
    let not_found = anyhow::Error::new(OrmError::NotFound("gone".to_string()));
    assert_eq!(ErrorKind::of_error(&not_found), Some(ErrorKind::NotFound));

    let integrity = anyhow::Error::new(OrmError::IntegrityViolation("dup".to_string()));
    assert_eq!(
        ErrorKind::of_error(&integrity),
        Some(ErrorKind::IntegrityViolation)
    );

    let record = anyhow::Error::new(sea_orm::DbErr::RecordNotFound("users".to_string()));
    assert_eq!(ErrorKind::of_error(&record), Some(ErrorKind::NotFound));

    let other = anyhow::Error::new(OrmError::Configuration("bad".to_string()));
    assert_eq!(ErrorKind::of_error(&other), None);
}
