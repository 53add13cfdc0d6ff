// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 包含 ORM 连接配置的解析与校验，以及示例服务的运行配置
pub mod orm_config;
pub mod settings;
