use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::app_config::DEFAULT_LOG_DIR;
use crate::models::{AppConfig, ConfigError};

/// 接口前缀
pub const ENV_API_PREFIX: &str = "COOKIE_ADMIN_API_PREFIX";
/// 访问令牌
pub const ENV_API_TOKEN: &str = "COOKIE_ADMIN_API_TOKEN";
/// HTTP超时(秒)
pub const ENV_HTTP_TIMEOUT_SECS: &str = "COOKIE_ADMIN_HTTP_TIMEOUT_SECS";
/// 日志目录
pub const ENV_LOG_DIR: &str = "COOKIE_ADMIN_LOG_DIR";

/// 配置服务
///
/// 从环境变量加载 `AppConfig`,职责单一:
/// - 启动时读取 .env (可选)
/// - 先单独读取日志目录,供日志系统初始化
/// - 校验必需项与数值范围
pub struct ConfigService;

impl ConfigService {
    /// 读取 .env (可选) 到进程环境
    ///
    /// 此时日志系统尚未初始化,结果由调用方在日志就绪后记录。
    ///
    /// # 返回值
    /// - `Ok(Some(path))`: 已加载的 .env 路径
    /// - `Ok(None)`: 未找到 .env,仅使用进程环境
    /// - `Err(IoError)`: .env 存在但无法解析
    pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => Ok(Some(path)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(ConfigError::IoError(e.to_string())),
        }
    }

    /// 日志目录
    ///
    /// 日志必须先于完整配置初始化,这里单独读取,与 `load` 使用相同的键与默认值。
    pub fn log_dir() -> PathBuf {
        Self::log_dir_from_lookup(|key| env::var(key).ok())
    }

    /// 从进程环境读取配置
    ///
    /// # 错误处理
    /// - 必需项缺失或数值非法: 返回 MissingVar / InvalidValue
    pub fn load() -> Result<AppConfig, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn log_dir_from_lookup<F>(lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        non_empty(&lookup, ENV_LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
    }

    /// 从任意键值来源构造配置
    ///
    /// 空字符串等同于未设置。
    pub fn from_lookup<F>(lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(&lookup, key);

        let prefix = get(ENV_API_PREFIX)
            .ok_or_else(|| ConfigError::MissingVar(ENV_API_PREFIX.to_string()))?;
        if !(prefix.starts_with("http://") || prefix.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: ENV_API_PREFIX.to_string(),
                reason: format!("必须以 http:// 或 https:// 开头: {}", prefix),
            });
        }

        let mut config = AppConfig::new(prefix);

        if let Some(token) = get(ENV_API_TOKEN) {
            config = config.with_token(token);
        }

        if let Some(raw) = get(ENV_HTTP_TIMEOUT_SECS) {
            let secs = raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                key: ENV_HTTP_TIMEOUT_SECS.to_string(),
                reason: e.to_string(),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: ENV_HTTP_TIMEOUT_SECS.to_string(),
                    reason: "必须大于0".to_string(),
                });
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }

        config = config.with_log_dir(Self::log_dir_from_lookup(&lookup));

        tracing::info!(config = %config.summary_for_logging(), "已加载应用配置");
        Ok(config)
    }
}

/// 读取并修剪配置值,空字符串等同于未设置
fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
