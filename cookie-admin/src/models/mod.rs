//! 数据模型模块
//!
//! 包含所有核心数据结构:
//! - errors: 错误类型定义 (接口、注册表、配置、应用级错误)
//! - cookie_record: 账号Cookie记录与健康状态
//! - acquisition_session: 扫码获取Cookie的状态机
//! - notification: 发往展示层的通知
//! - app_config: 远端服务连接配置
//!
//! # 设计原则
//!
//! 1. **存在即合理**: 每个字段都有明确目的,无冗余
//! 2. **错误处理**: 所有验证返回 Result,提供完整上下文
//! 3. **日志安全**: Cookie值不记录到日志

pub mod acquisition_session;
pub mod app_config;
pub mod cookie_record;
pub mod errors;
pub mod notification;

// 重导出常用类型,简化外部引用
pub use acquisition_session::{
    AcquisitionOutcome, AcquisitionPhase, AcquisitionSession, PollStatus, PollStep,
};
pub use app_config::AppConfig;
pub use cookie_record::{CookieRecord, CookieStatus, Severity};
pub use errors::{ApiError, AppError, ConfigError, RegistryError};
pub use notification::{Notification, NotificationLevel};
