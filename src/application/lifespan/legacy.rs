// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::application::lifespan::coordinator::OrmLifespan;
use crate::config::orm_config::OrmOptions;
use crate::domain::errors::OrmError;
use crate::domain::host::{Host, Lifespan};
use crate::domain::lifecycle::LifecycleState;
use crate::domain::registry::ConnectionRegistry;
use crate::infrastructure::database::registry::SeaOrmRegistry;
use crate::infrastructure::database::schema::{EntitySchemaGenerator, ModelCatalog};
use crate::presentation::exception_handlers;

type PendingInit = JoinHandle<Result<(), OrmError>>;

/// 旧版单次调用方式安装到宿主的启动/关闭钩子
pub struct LegacyLifespan<R: ConnectionRegistry> {
    orm: Arc<tokio::sync::Mutex<OrmLifespan<R>>>,
    pending: Mutex<Option<PendingInit>>,
}

impl<R: ConnectionRegistry> LegacyLifespan<R> {
    /// 当前生命周期状态
    pub async fn state(&self) -> LifecycleState {
        self.orm.lock().await.state()
    }

    /// 连接注册表句柄
    pub async fn registry(&self) -> R {
        self.orm.lock().await.registry().clone()
    }
}

/// 兼容旧版宿主的单次调用注册
///
/// 立即在后台调度 `init`，按需同步注册异常处理器，并把启动/关闭钩子交给宿主：
/// 启动钩子等待后台初始化完成，关闭钩子关闭全部连接。
///
/// 后台初始化不会在返回前完成；宿主若在运行启动钩子之前就开始处理请求，
/// 请求可能遇到尚未打开的连接
pub fn register_orm<H, R>(
    host: &mut H,
    orm: OrmLifespan<R>,
) -> Result<Arc<LegacyLifespan<R>>, OrmError>
where
    H: Host + ?Sized,
    R: ConnectionRegistry,
{
    let runtime = Handle::try_current().map_err(|e| OrmError::Runtime(e.to_string()))?;
    let add_exception_handlers = orm.options().add_exception_handlers;

    let orm = Arc::new(tokio::sync::Mutex::new(orm));
    let background = Arc::clone(&orm);
    let pending = runtime.spawn(async move { background.lock().await.init().await });
    warn!("ORM initialization scheduled in background; serve requests only after host startup");

    if add_exception_handlers {
        exception_handlers::register_exception_handlers(host);
    }

    let lifespan = Arc::new(LegacyLifespan {
        orm,
        pending: Mutex::new(Some(pending)),
    });
    host.set_lifespan(lifespan.clone());
    Ok(lifespan)
}

/// 由选项构造协调器后按 [`register_orm`] 注册
///
/// `registry` 是交给协调器的注册表句柄，宿主的路由通常持有它的克隆
pub fn register_orm_with_options<H>(
    host: &mut H,
    registry: SeaOrmRegistry,
    options: OrmOptions,
    catalog: ModelCatalog,
) -> Result<Arc<LegacyLifespan<SeaOrmRegistry>>, OrmError>
where
    H: Host + ?Sized,
{
    let orm = OrmLifespan::with_registry(
        options,
        registry,
        Arc::new(EntitySchemaGenerator::new(catalog)),
    );
    register_orm(host, orm)
}

#[async_trait]
impl<R: ConnectionRegistry> Lifespan for LegacyLifespan<R> {
    async fn startup(&self) -> anyhow::Result<()> {
        let pending = self.pending.lock().take();
        match pending {
            Some(handle) => handle.await.map_err(|e| OrmError::Runtime(e.to_string()))??,
            None => self.orm.lock().await.init().await?,
        }
        Ok(())
    }

    async fn shutdown(&self) -> anyhow::Result<()> {
        self.orm.lock().await.close().await?;
        Ok(())
    }
}
