use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::models::ConfigError;

/// 初始化日志系统
///
/// - JSON格式文件: 便于机器解析和日志分析
/// - 按天轮转: 文件命名 `cookie-admin.2025-10-05.log`
/// - 双输出: 控制台(开发) + 文件(生产)
/// - 环境变量控制: RUST_LOG=debug 可调整日志级别,默认 info
///
/// Cookie值不会出现在日志中,只记录账号ID与长度。
///
/// # 重要提示
/// 返回的guard必须被调用者保存,直到应用退出。
/// 如果guard被drop,文件写入器将被关闭。
pub fn init(log_dir: &Path) -> Result<WorkerGuard, ConfigError> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("cookie-admin")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| ConfigError::IoError(format!("无法创建日志文件: {}", e)))?;
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // 文件层: JSON格式
    let file_layer = fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false);

    // 控制台层: 人类可读格式
    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| ConfigError::IoError(format!("日志系统已初始化: {}", e)))?;

    Ok(guard)
}

/// 日志宏辅助模块
///
/// 提供结构化日志的便捷宏,字段语法与 `tracing` 一致 (支持 `%` / `?`)
pub mod macros {
    /// 记录业务事件
    ///
    /// 使用示例:
    /// ```no_run
    /// use cookie_admin::log_event;
    /// let account_id = "jd_abc";
    /// log_event!("CookieDeleted", account_id = %account_id);
    /// ```
    #[macro_export]
    macro_rules! log_event {
        ($event_type:expr, $($fields:tt)+) => {
            $crate::__tracing::info!(event_type = $event_type, $($fields)+)
        };
    }

    /// 记录错误事件
    ///
    /// 使用示例:
    /// ```no_run
    /// use cookie_admin::log_error;
    /// log_error!("CookieRefreshFailed", error = "connection timeout");
    /// ```
    #[macro_export]
    macro_rules! log_error {
        ($event_type:expr, $($fields:tt)+) => {
            $crate::__tracing::error!(event_type = $event_type, $($fields)+)
        };
    }
}
