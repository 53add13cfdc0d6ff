// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::domain::errors::OrmError;

/// 应用未指定默认连接时使用的别名
pub const DEFAULT_CONNECTION: &str = "default";

fn default_connection_alias() -> String {
    DEFAULT_CONNECTION.to_string()
}

/// ORM 结构化配置
///
/// 与配置文件的结构相同：`connections` 为 别名 -> 连接，
/// `apps` 为 应用名 -> 模型发现配置
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrmConfig {
    /// 连接配置
    pub connections: BTreeMap<String, ConnectionSpec>,
    /// 应用配置
    pub apps: BTreeMap<String, AppConfig>,
}

/// 单个连接：URL 字符串或结构化描述
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConnectionSpec {
    Url(String),
    Descriptor(ConnectionDescriptor),
}

/// 结构化连接描述
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConnectionDescriptor {
    /// 数据库引擎 (sqlite, postgres, mysql)
    pub engine: String,
    /// 连接凭据
    #[serde(default)]
    pub credentials: Credentials,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 连接凭据
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Credentials {
    pub host: Option<String>,
    pub port: Option<Port>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    /// SQLite 数据库文件路径
    pub file_path: Option<String>,
}

/// 端口，配置文件中可以写成数字或字符串
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Port {
    Number(u16),
    Text(String),
}

impl Port {
    fn as_u16(&self) -> Result<u16, OrmError> {
        match self {
            Port::Number(port) => Ok(*port),
            Port::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| OrmError::Configuration(format!("Invalid port: {}", text))),
        }
    }
}

/// 应用的模型发现配置
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    /// 模型发现位置
    pub models: Vec<String>,
    /// 默认连接别名
    #[serde(default = "default_connection_alias")]
    pub default_connection: String,
}

impl AppConfig {
    pub fn new(models: Vec<String>) -> Self {
        Self {
            models,
            default_connection: default_connection_alias(),
        }
    }
}

/// 数据库引擎
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Sqlite,
    Postgres,
    MySql,
}

impl Engine {
    fn from_name(name: &str) -> Result<Self, OrmError> {
        // Accept dotted backend paths such as "backends.asyncpg".
        let short = name.rsplit('.').next().unwrap_or(name);
        match short.to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Engine::Sqlite),
            "postgres" | "postgresql" | "asyncpg" | "psycopg" => Ok(Engine::Postgres),
            "mysql" | "asyncmy" => Ok(Engine::MySql),
            other => Err(OrmError::Configuration(format!(
                "Unknown database engine: {}",
                other
            ))),
        }
    }

    fn scheme(self) -> &'static str {
        match self {
            Engine::Sqlite => "sqlite",
            Engine::Postgres => "postgres",
            Engine::MySql => "mysql",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// 规范化数据库 URL
///
/// `sqlite://:memory:` 转换为 `sqlite::memory:`，SQLite 文件默认以
/// 读写并自动创建的模式打开；只接受 sqlite、postgres、mysql 三种协议。
pub fn normalize_db_url(db_url: &str) -> Result<String, OrmError> {
    let (scheme, rest) = db_url
        .split_once(':')
        .ok_or_else(|| OrmError::Configuration(format!("Malformed db_url: {}", db_url)))?;

    match Engine::from_name(scheme) {
        Ok(Engine::Sqlite) => {
            let path = rest.trim_start_matches("//");
            if path == ":memory:" {
                Ok("sqlite::memory:".to_string())
            } else if path.is_empty() {
                Err(OrmError::Configuration(
                    "SQLite db_url is missing a file path".to_string(),
                ))
            } else if path.contains('?') {
                Ok(format!("sqlite://{}", path))
            } else {
                Ok(format!("sqlite://{}?mode=rwc", path))
            }
        }
        Ok(_) => {
            Url::parse(db_url)
                .map_err(|e| OrmError::Configuration(format!("Malformed db_url: {}", e)))?;
            Ok(db_url.to_string())
        }
        Err(_) => Err(OrmError::Configuration(format!(
            "Unknown DB scheme: {}",
            scheme
        ))),
    }
}

impl ConnectionSpec {
    /// 解析为可直接连接的 URL
    pub fn to_url(&self) -> Result<String, OrmError> {
        match self {
            ConnectionSpec::Url(url) => normalize_db_url(url),
            ConnectionSpec::Descriptor(descriptor) => descriptor.to_url(),
        }
    }
}

impl ConnectionDescriptor {
    /// 由引擎与凭据拼接连接 URL，密码会被转义
    pub fn to_url(&self) -> Result<String, OrmError> {
        let engine = Engine::from_name(&self.engine)?;
        let creds = &self.credentials;

        if engine == Engine::Sqlite {
            let path = creds.file_path.as_deref().ok_or_else(|| {
                OrmError::Configuration("SQLite connection requires credentials.file_path".into())
            })?;
            return normalize_db_url(&format!("sqlite://{}", path));
        }

        let host = creds.host.as_deref().unwrap_or("localhost");
        let mut url = Url::parse(&format!("{}://{}", engine.scheme(), host))
            .map_err(|e| OrmError::Configuration(format!("Invalid host {}: {}", host, e)))?;

        let invalid = |field: &str| OrmError::Configuration(format!("Invalid {} for {}", field, engine));
        if let Some(user) = &creds.user {
            url.set_username(user).map_err(|_| invalid("user"))?;
        }
        if let Some(password) = &creds.password {
            url.set_password(Some(password)).map_err(|_| invalid("password"))?;
        }
        if let Some(port) = &creds.port {
            url.set_port(Some(port.as_u16()?)).map_err(|_| invalid("port"))?;
        }
        if let Some(database) = &creds.database {
            url.set_path(database);
        }

        Ok(url.to_string())
    }
}

impl OrmConfig {
    /// 由单个 URL 和模块列表构造配置，所有应用使用 `default` 连接
    pub fn from_url_and_modules(
        db_url: &str,
        modules: &BTreeMap<String, Vec<String>>,
    ) -> Self {
        let connections = BTreeMap::from([(
            DEFAULT_CONNECTION.to_string(),
            ConnectionSpec::Url(db_url.to_string()),
        )]);
        let apps = modules
            .iter()
            .map(|(app, models)| (app.clone(), AppConfig::new(models.clone())))
            .collect();
        Self { connections, apps }
    }

    /// 校验配置
    ///
    /// 至少包含一个连接和一个应用，且每个应用的默认连接必须存在
    pub fn validate(&self) -> Result<(), OrmError> {
        if self.connections.is_empty() {
            return Err(OrmError::Configuration(
                "Config must define at least one connection".to_string(),
            ));
        }
        if self.apps.is_empty() {
            return Err(OrmError::Configuration(
                "Config must define at least one app".to_string(),
            ));
        }
        for spec in self.connections.values() {
            spec.to_url()?;
        }
        for (name, app) in &self.apps {
            if !self.connections.contains_key(&app.default_connection) {
                return Err(OrmError::Configuration(format!(
                    "App \"{}\" refers to unknown connection \"{}\"",
                    name, app.default_connection
                )));
            }
        }
        Ok(())
    }

    /// 从配置文件加载，格式由扩展名决定 (json, yaml, toml)
    pub fn from_file(path: &Path) -> Result<Self, OrmError> {
        if !path.is_file() {
            return Err(OrmError::Configuration(format!(
                "Unable to find config file: {}",
                path.display()
            )));
        }
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

/// 已确定的唯一配置来源
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// 内联结构化配置
    Inline(OrmConfig),
    /// 外部配置文件
    File(PathBuf),
    /// 单个连接 URL 加模块发现列表
    UrlModules {
        db_url: String,
        modules: BTreeMap<String, Vec<String>>,
    },
}

impl ConfigSource {
    /// 加载并校验配置
    pub fn load(&self) -> Result<OrmConfig, OrmError> {
        let config = match self {
            ConfigSource::Inline(config) => config.clone(),
            ConfigSource::File(path) => OrmConfig::from_file(path)?,
            ConfigSource::UrlModules { db_url, modules } => {
                OrmConfig::from_url_and_modules(db_url, modules)
            }
        };
        config.validate()?;
        Ok(config)
    }
}

/// ORM 生命周期选项
///
/// `config`、`config_file` 与 `(db_url, modules)` 三者必须恰好提供一个
#[derive(Debug, Clone, Default)]
pub struct OrmOptions {
    pub config: Option<OrmConfig>,
    pub config_file: Option<PathBuf>,
    pub db_url: Option<String>,
    pub modules: Option<BTreeMap<String, Vec<String>>>,
    /// 连接后立即建表（只创建缺失的表）
    pub generate_schemas: bool,
    /// 注册 NotFound / IntegrityViolation 异常处理器。
    /// 可能向客户端泄露内部错误信息，不建议在生产环境开启
    pub add_exception_handlers: bool,
}

impl OrmOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: OrmConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn with_db_url(mut self, db_url: impl Into<String>) -> Self {
        self.db_url = Some(db_url.into());
        self
    }

    pub fn with_modules<A, M, I>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = (A, Vec<M>)>,
        A: Into<String>,
        M: Into<String>,
    {
        self.modules = Some(
            modules
                .into_iter()
                .map(|(app, models)| (app.into(), models.into_iter().map(Into::into).collect()))
                .collect(),
        );
        self
    }

    pub fn generate_schemas(mut self, enabled: bool) -> Self {
        self.generate_schemas = enabled;
        self
    }

    pub fn add_exception_handlers(mut self, enabled: bool) -> Self {
        self.add_exception_handlers = enabled;
        self
    }

    /// 确定唯一的配置来源
    pub fn resolve(&self) -> Result<ConfigSource, OrmError> {
        match (&self.config, &self.config_file, &self.db_url, &self.modules) {
            (Some(config), None, None, None) => Ok(ConfigSource::Inline(config.clone())),
            (None, Some(path), None, None) => Ok(ConfigSource::File(path.clone())),
            (None, None, Some(db_url), Some(modules)) => Ok(ConfigSource::UrlModules {
                db_url: db_url.clone(),
                modules: modules.clone(),
            }),
            (None, None, Some(_), None) => Err(OrmError::Configuration(
                "You must specify 'modules' together with 'db_url'".to_string(),
            )),
            (None, None, None, Some(_)) => Err(OrmError::Configuration(
                "You must specify 'db_url' together with 'modules'".to_string(),
            )),
            (None, None, None, None) => Err(OrmError::Configuration(
                "You must specify one of 'config', 'config_file' or 'db_url' + 'modules'"
                    .to_string(),
            )),
            _ => Err(OrmError::Configuration(
                "Only one of 'config', 'config_file' or 'db_url' + 'modules' may be specified"
                    .to_string(),
            )),
        }
    }
}
