// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模块
///
/// 定义生命周期协调所依赖的错误类型、状态以及外部协作者接口
pub mod errors;
pub mod host;
pub mod lifecycle;
pub mod registry;
pub mod schema;
