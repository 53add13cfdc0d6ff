// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库模块
///
/// 提供连接池、连接注册表、建表生成和批量写入
pub mod bulk;
pub mod connection;
pub mod entities;
pub mod registry;
pub mod schema;
