use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 默认HTTP超时(秒)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// 默认日志目录
pub const DEFAULT_LOG_DIR: &str = "logs";

/// 应用配置
///
/// 连接远端Cookie服务所需的全部参数。
/// 扫码轮询的 50 次 × 2000ms 上限是固定契约,不在此处配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 接口前缀,总以 `/` 结尾
    ///
    /// 示例: "http://127.0.0.1:5700/api/"
    pub api_prefix: String,

    /// 访问令牌 (可选),以 `Authorization: Bearer` 发送
    pub api_token: Option<String>,

    /// 单次请求超时
    pub http_timeout: Duration,

    /// 日志目录
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// 创建新的配置
    ///
    /// # 示例
    /// ```
    /// use cookie_admin::models::AppConfig;
    ///
    /// let config = AppConfig::new("http://127.0.0.1:5700/api");
    /// assert_eq!(config.api_prefix, "http://127.0.0.1:5700/api/");
    /// ```
    pub fn new(api_prefix: impl Into<String>) -> Self {
        Self {
            api_prefix: normalize_prefix(api_prefix.into()),
            api_token: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }

    /// 设置访问令牌 (构建器模式)
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// 设置请求超时 (构建器模式)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// 设置日志目录 (构建器模式)
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    /// 拼接端点地址
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_prefix, path.trim_start_matches('/'))
    }

    /// 获取配置摘要 (用于日志,令牌脱敏)
    pub fn summary_for_logging(&self) -> String {
        format!(
            "prefix={} token={} timeout={}s",
            self.api_prefix,
            if self.api_token.is_some() { "***" } else { "none" },
            self.http_timeout.as_secs()
        )
    }
}

fn normalize_prefix(mut prefix: String) -> String {
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}
