// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含 ORM 生命周期协调器及其三种激活方式
pub mod application;

/// 配置模块
///
/// 处理 ORM 连接配置和示例服务的运行配置
pub mod config;

/// 领域模块
///
/// 包含错误类型、生命周期状态以及连接注册表、建表生成器和宿主的接口
pub mod domain;

/// 基础设施模块
///
/// 提供基于 sea-orm 的连接注册表、建表和批量写入
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括宿主、异常翻译、路由和处理器
pub mod presentation;

/// 工具模块
///
/// 提供分批、结构化并发和日志初始化
pub mod utils;
