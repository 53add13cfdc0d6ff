// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::config::orm_config::OrmOptions;

/// 示例服务的配置设置
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// ORM 配置
    pub orm: OrmSettings,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// ORM 配置设置
#[derive(Debug, Deserialize)]
pub struct OrmSettings {
    /// 数据库连接URL，未设置 `config_file` 时使用
    pub db_url: Option<String>,
    /// ORM 配置文件路径，设置后忽略 `db_url` 与 `models`
    pub config_file: Option<String>,
    /// `models` 应用的模型发现位置
    #[serde(default)]
    pub models: Vec<String>,
    /// 启动时建表
    pub generate_schemas: bool,
    /// 注册异常处理器
    pub add_exception_handlers: bool,
}

impl OrmSettings {
    /// 转换为生命周期选项
    ///
    /// `db_url` 带有默认值，因此 `config_file` 优先，只产生一个配置来源
    pub fn to_options(&self) -> OrmOptions {
        let options = OrmOptions::new()
            .generate_schemas(self.generate_schemas)
            .add_exception_handlers(self.add_exception_handlers);
        match (&self.config_file, &self.db_url) {
            (Some(path), _) => options.with_config_file(path.as_str()),
            (None, Some(db_url)) => options
                .with_db_url(db_url.as_str())
                .with_modules([("models", self.models.clone())]),
            (None, None) => options,
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次读取默认值、`config/default`、`config/{APP_ENVIRONMENT}` 与
    /// `ORM_LIFESPAN__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder(&env)?.build()?.try_deserialize()
    }

    /// 默认值与各配置来源组成的构建器
    pub(crate) fn builder(env: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("orm.db_url", "sqlite://:memory:")?
            .set_default("orm.models", vec!["models"])?
            .set_default("orm.generate_schemas", true)?
            .set_default("orm.add_exception_handlers", true)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("ORM_LIFESPAN").separator("__")))
    }
}
