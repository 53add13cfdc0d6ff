// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::domain::lifecycle::LifecycleState;

/// ORM 生命周期错误类型
#[derive(Error, Debug)]
pub enum OrmError {
    /// 配置来源缺失、重复或格式错误
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// 连接注册表打开失败，原样传递底层错误
    #[error(transparent)]
    Connection(DbErr),
    /// 建表失败
    #[error("Schema generation failed: {0}")]
    Schema(#[source] DbErr),
    /// 调用顺序错误
    #[error("Cannot {operation} while the ORM lifecycle is {state}")]
    Lifecycle {
        operation: &'static str,
        state: LifecycleState,
    },
    /// 记录不存在
    #[error("{0}")]
    NotFound(String),
    /// 违反完整性约束
    #[error("{0}")]
    IntegrityViolation(String),
    /// 别名对应的连接尚未打开
    #[error("Connection \"{0}\" is not open")]
    UnknownConnection(String),
    /// 缺少异步运行时等环境问题
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<config::ConfigError> for OrmError {
    fn from(err: config::ConfigError) -> Self {
        OrmError::Configuration(err.to_string())
    }
}

impl OrmError {
    /// 构造调用顺序错误
    pub fn lifecycle(operation: &'static str, state: LifecycleState) -> Self {
        OrmError::Lifecycle { operation, state }
    }

    /// 返回可被异常处理器翻译的错误类别
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            OrmError::NotFound(_) => Some(ErrorKind::NotFound),
            OrmError::IntegrityViolation(_) => Some(ErrorKind::IntegrityViolation),
            OrmError::Connection(err) | OrmError::Schema(err) => ErrorKind::of_db_err(err),
            _ => None,
        }
    }
}

/// 可翻译为 HTTP 响应的 ORM 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 查询的记录不存在
    NotFound,
    /// 唯一键或外键约束冲突
    IntegrityViolation,
}

impl ErrorKind {
    /// 对 sea-orm 错误进行分类
    pub fn of_db_err(err: &DbErr) -> Option<Self> {
        if let DbErr::RecordNotFound(_) = err {
            return Some(ErrorKind::NotFound);
        }
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_))
            | Some(SqlErr::ForeignKeyConstraintViolation(_)) => Some(ErrorKind::IntegrityViolation),
            _ => None,
        }
    }

    /// 对任意错误进行分类
    ///
    /// 依次尝试 [`OrmError`] 与 [`DbErr`]，都不匹配时返回 `None`
    pub fn of_error(err: &anyhow::Error) -> Option<Self> {
        if let Some(orm_err) = err.downcast_ref::<OrmError>() {
            return orm_err.kind();
        }
        err.downcast_ref::<DbErr>().and_then(Self::of_db_err)
    }
}
