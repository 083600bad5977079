//! Cookie管理核心
//!
//! 扫码获取账号Cookie、维护账号列表并对账远端变更。

pub mod models;
pub mod services;
pub mod state;
pub mod utils;

#[doc(hidden)]
pub use tracing as __tracing;
