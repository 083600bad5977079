use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 用户通知
///
/// 控制器发往展示层的提示消息,同时也是操作结果的审计记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// 通知级别
    pub level: NotificationLevel,

    /// 通知内容 (原样展示)
    pub message: String,

    /// 时间戳
    pub timestamp: DateTime<Utc>,
}

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    pub fn is_success(&self) -> bool {
        self.level == NotificationLevel::Success
    }
}
