// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::database::registry::SeaOrmRegistry;
use crate::presentation::handlers::user_handler;
use axum::{routing::get, Extension, Router};
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 参数
///
/// * `registry` - 处理器查询使用的连接注册表
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(registry: SeaOrmRegistry) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/users",
            get(user_handler::get_users).post(user_handler::create_user),
        )
        .route(
            "/user/{user_id}",
            get(user_handler::get_user)
                .put(user_handler::update_user)
                .delete(user_handler::delete_user),
        )
        .layer(Extension(registry))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查处理器
pub async fn health_check() -> &'static str {
    "OK"
}
