// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! ORM 生命周期协调
//!
//! 核心类型 [`OrmLifespan`] 提供 `init`、`close` 与
//! `register_exception_handlers` 三个原语，三种激活方式均建立在其上：
//!
//! - 作用域：[`OrmLifespan::scope`]，离开作用域时一定关闭连接
//! - 显式两步：[`OrmLifespan::open`] 后由调用方自行 [`OrmLifespan::close`]
//! - 兼容旧版的单次调用：[`register_orm`]，由宿主的启动/关闭钩子驱动

pub mod coordinator;
pub mod legacy;
pub mod scoped;

pub use coordinator::OrmLifespan;
pub use legacy::{register_orm, register_orm_with_options, LegacyLifespan};
