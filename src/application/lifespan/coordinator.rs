// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::orm_config::{OrmConfig, OrmOptions};
use crate::domain::errors::OrmError;
use crate::domain::host::Host;
use crate::domain::lifecycle::LifecycleState;
use crate::domain::registry::ConnectionRegistry;
use crate::domain::schema::SchemaGenerator;
use crate::infrastructure::database::registry::SeaOrmRegistry;
use crate::infrastructure::database::schema::{EntitySchemaGenerator, ModelCatalog};
use crate::presentation::exception_handlers;

/// ORM 生命周期协调器
///
/// 每个宿主进程构造一次，配置不可变。状态只能由调用方推进：
/// `init` 仅在 `Unstarted` 时有效，`close` 与异常处理器注册仅在 `Ready` 时有效。
///
/// 协调器内部不加锁，`init` 与 `close` 不能并发调用，
/// 也不能与操作同一注册表的其他协调器并发
pub struct OrmLifespan<R: ConnectionRegistry = SeaOrmRegistry> {
    options: OrmOptions,
    registry: R,
    generator: Arc<dyn SchemaGenerator>,
    state: LifecycleState,
}

impl OrmLifespan<SeaOrmRegistry> {
    /// 使用 sea-orm 注册表与实体建表生成器创建协调器
    ///
    /// # 参数
    ///
    /// * `options` - 生命周期选项
    /// * `catalog` - 模型发现位置到实体的映射
    pub fn new(options: OrmOptions, catalog: ModelCatalog) -> Self {
        Self::with_registry(
            options,
            SeaOrmRegistry::new(),
            Arc::new(EntitySchemaGenerator::new(catalog)),
        )
    }
}

impl<R: ConnectionRegistry> OrmLifespan<R> {
    pub fn with_registry(
        options: OrmOptions,
        registry: R,
        generator: Arc<dyn SchemaGenerator>,
    ) -> Self {
        Self {
            options,
            registry,
            generator,
            state: LifecycleState::Unstarted,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn options(&self) -> &OrmOptions {
        &self.options
    }

    /// 连接注册表句柄，`Ready` 期间由协调器持有
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// 交还注册表句柄，`close` 之后所有连接均已关闭
    pub fn into_registry(self) -> R {
        self.registry
    }

    /// 初始化
    ///
    /// 校验配置来源、打开连接注册表，按需建表，然后进入 `Ready`。
    /// 配置错误在尝试任何连接之前返回；打开失败时原样返回连接错误，状态不推进
    pub async fn init(&mut self) -> Result<(), OrmError> {
        if self.state != LifecycleState::Unstarted {
            return Err(OrmError::lifecycle("initialize", self.state));
        }

        let config = self.options.resolve()?.load()?;
        self.generator.validate(&config.apps)?;

        self.state = LifecycleState::Initializing;
        if let Err(err) = self.registry.open(&config).await {
            self.state = LifecycleState::Unstarted;
            return Err(err);
        }

        info!(
            connections = ?self.registry.aliases(),
            apps = ?config.apps.keys().collect::<Vec<_>>(),
            "ORM started"
        );

        if self.options.generate_schemas {
            if let Err(err) = self.generate_schemas(&config).await {
                if let Err(close_err) = self.registry.close_all().await {
                    warn!(error = %close_err, "Failed to close connections after schema failure");
                }
                self.state = LifecycleState::Unstarted;
                return Err(err);
            }
        }

        self.state = LifecycleState::Ready;
        Ok(())
    }

    async fn generate_schemas(&self, config: &OrmConfig) -> Result<(), OrmError> {
        info!("ORM generating schema");
        for (app, app_config) in &config.apps {
            let conn = self.registry.require(&app_config.default_connection)?;
            self.generator
                .generate(&conn, app, &app_config.models, true)
                .await?;
        }
        Ok(())
    }

    /// 关闭注册表中的全部连接
    ///
    /// 仅在 `Ready` 时有效且不可重复调用：注册表所有权此时已经交还
    pub async fn close(&mut self) -> Result<(), OrmError> {
        if self.state != LifecycleState::Ready {
            return Err(OrmError::lifecycle("close", self.state));
        }

        self.state = LifecycleState::Closed;
        self.registry
            .close_all()
            .await
            .map_err(OrmError::Connection)?;
        info!("ORM shutdown");
        Ok(())
    }

    /// 向宿主注册异常处理器
    ///
    /// 必须在 `Ready` 之后调用，否则返回调用顺序错误
    pub fn register_exception_handlers<H>(&self, host: &mut H) -> Result<(), OrmError>
    where
        H: Host + ?Sized,
    {
        if self.state != LifecycleState::Ready {
            return Err(OrmError::lifecycle("register exception handlers", self.state));
        }
        exception_handlers::register_exception_handlers(host);
        info!("ORM exception handlers registered");
        Ok(())
    }

    /// 显式两步激活的第一步：初始化并按需注册异常处理器
    ///
    /// 不会自动关闭，调用方负责之后调用 [`OrmLifespan::close`]
    pub async fn open<H>(&mut self, host: &mut H) -> Result<(), OrmError>
    where
        H: Host + ?Sized,
    {
        self.init().await?;
        if self.options.add_exception_handlers {
            self.register_exception_handlers(host)?;
        }
        Ok(())
    }
}
