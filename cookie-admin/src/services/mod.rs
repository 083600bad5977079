//! 服务层模块
//!
//! 包含所有业务逻辑服务:
//! - `cookie_api`: 远端Cookie服务接缝与HTTP客户端
//! - `registry`: Cookie列表注册表 (内存中的唯一副本)
//! - `acquisition`: 扫码获取Cookie的轮询循环
//! - `session_manager`: 同一时间只允许一个扫码会话
//! - `cookie_controller`: 用户意图编排与对账
//! - `presenter`: 展示层接缝
//! - `config_service`: 环境变量配置加载
//! - `config_diff`: 配置对比数据源
//!
//! # 服务架构
//!
//! ```text
//!        ┌──────────────┐
//!        │  Presenter   │  (展示层,外部实现)
//!        └──────┬───────┘
//!               ▼
//!     ┌────────────────────┐
//!     │  CookieController  │
//!     └───┬───────────┬────┘
//!         ▼           ▼
//!  ┌────────────┐ ┌──────────────────────────┐
//!  │  Registry  │ │ run_acquisition          │
//!  └────────────┘ │ (SessionManager 限流)    │
//!                 └────────────┬─────────────┘
//!                              ▼
//!                     ┌────────────────┐
//!                     │ CookieService  │ ──> 远端服务
//!                     └────────────────┘
//! ```
//!
//! # 使用示例
//!
//! ```no_run
//! use std::sync::Arc;
//! use cookie_admin::models::AppConfig;
//! use cookie_admin::services::{ConsolePresenter, CookieController, HttpCookieService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = HttpCookieService::new(AppConfig::new("http://127.0.0.1:5700/api"))?;
//! let controller = CookieController::new(Arc::new(service), Arc::new(ConsolePresenter));
//!
//! controller.load_all().await?;
//! if let Some(session) = controller.acquire_new().await {
//!     println!("扫码结果: {}", session.outcome.label());
//! }
//! # Ok(())
//! # }
//! ```

pub mod acquisition;
pub mod config_diff;
pub mod config_service;
pub mod cookie_api;
pub mod cookie_controller;
pub mod presenter;
pub mod registry;
pub mod session_manager;

// 重导出常用类型,简化外部引用
pub use acquisition::run_acquisition;
pub use config_diff::{ConfigDiffService, ConfigKind, ConfigPair, ConfigSource};
pub use config_service::ConfigService;
pub use cookie_api::{CookieService, DeleteReceipt, HttpCookieService};
pub use cookie_controller::CookieController;
pub use presenter::{ConsolePresenter, EditorOutcome, Presenter};
pub use registry::{CookieRegistry, RegistrySnapshot};
pub use session_manager::SessionManager;
