use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 远端Cookie服务调用相关错误
///
/// 处理与远端服务交互时的各种失败场景。
/// 每个错误都包含足够的上下文信息,帮助调试和恢复。
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum ApiError {
    /// 网络请求失败
    ///
    /// 可能原因:
    /// - 网络连接中断
    /// - 服务不可达
    /// - 请求超时
    #[error("网络请求失败: {0}")]
    NetworkFailed(String),

    /// HTTP状态码错误
    ///
    /// 远端服务返回了非2xx状态码
    #[error("HTTP错误 {status}: {message}")]
    HttpStatusError { status: u16, message: String },

    /// JSON解析失败
    #[error("响应数据解析失败: {0}")]
    JsonParseFailed(String),

    /// 响应格式无效
    ///
    /// 响应可以解析,但缺少必要字段
    #[error("响应格式无效: {0}")]
    InvalidResponse(String),

    /// 请求地址无效
    ///
    /// 前缀与端点拼接后不是合法URL
    #[error("请求地址无效: {0}")]
    InvalidUrl(String),

    /// HTTP客户端初始化失败
    ///
    /// 令牌包含非法字符或TLS后端不可用
    #[error("HTTP客户端初始化失败: {0}")]
    ClientInit(String),
}

/// 列表注册表相关错误
///
/// 注册表不做I/O,这里的错误只代表调用方违反了唯一性或下标约束。
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum RegistryError {
    /// 同一账号出现多条记录
    #[error("账号重复: {account_id}")]
    DuplicateAccount { account_id: String },

    /// 下标越界
    #[error("下标越界: {index} (当前共 {len} 条)")]
    IndexOutOfRange { index: usize, len: usize },

    /// 下标处已是另一个账号 (列表在此期间被重新加载过)
    #[error("下标 {index} 处的账号已变为 {found},期望 {expected}")]
    AccountMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    /// 账号已不在列表中
    #[error("账号不在列表中: {account_id}")]
    AccountNotFound { account_id: String },
}

/// 配置加载相关错误
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum ConfigError {
    /// 必需的环境变量缺失
    #[error("缺少配置项: {0}")]
    MissingVar(String),

    /// 配置值无法解析或超出范围
    #[error("配置项 {key} 无效: {reason}")]
    InvalidValue { key: String, reason: String },

    /// I/O错误
    ///
    /// 读取 .env 或创建日志目录时的文件系统错误
    #[error("I/O错误: {0}")]
    IoError(String),
}

/// 应用级错误
///
/// 控制器向调用方返回的统一错误类型。
/// 到达这里的错误都已经通知过用户,调用方只需决定是否继续。
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 远端拒绝了变更操作 (删除/刷新状态)
    ///
    /// 携带原始响应,便于原样展示给用户
    #[error("操作被拒绝: {0}")]
    Rejected(String),
}

/// 实现从reqwest::Error到ApiError的转换
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::NetworkFailed("请求超时".to_string())
        } else if err.is_connect() {
            ApiError::NetworkFailed("无法连接到服务器".to_string())
        } else if err.is_decode() {
            ApiError::JsonParseFailed(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidUrl(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::HttpStatusError {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::NetworkFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::JsonParseFailed(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err.to_string())
    }
}
