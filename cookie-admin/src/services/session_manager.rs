//! 扫码会话管理器
//!
//! 职责: 确保同一时间只有一个进行中的扫码会话
//! 策略: 会话进行中时拒绝新的获取请求 (入口按钮应同时禁用)

use std::sync::{Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

/// 会话管理器
///
/// 持有当前会话的取消令牌。令牌既是"有会话在进行"的标记,
/// 也是对话框被关闭时通知轮询循环停止的通道。
pub struct SessionManager {
    current: Mutex<Option<CancellationToken>>,
}

/// 进行中会话的占位
///
/// 离开作用域时释放占位,之后才能开始新的会话。
pub struct ActiveSession<'a> {
    manager: &'a SessionManager,
    token: CancellationToken,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    /// 尝试开始新会话
    ///
    /// # 返回值
    /// - `Some(ActiveSession)`: 占位成功
    /// - `None`: 已有会话进行中,本次请求被忽略
    pub fn try_begin(&self) -> Option<ActiveSession<'_>> {
        let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_some() {
            tracing::warn!("已有扫码会话进行中,忽略新的获取请求");
            return None;
        }

        let token = CancellationToken::new();
        *guard = Some(token.clone());
        tracing::debug!("扫码会话占位成功");

        Some(ActiveSession {
            manager: self,
            token,
        })
    }

    /// 取消当前会话
    ///
    /// 用于对话框关闭或应用退出。只设置取消标记,进行中的请求照常完成。
    ///
    /// # 返回值
    /// 是否存在被取消的会话
    pub fn cancel_current(&self) -> bool {
        let guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => {
                tracing::info!("手动取消扫码会话");
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn release(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveSession<'_> {
    /// 本会话的取消令牌
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for ActiveSession<'_> {
    fn drop(&mut self) {
        self.manager.release();
        tracing::debug!("扫码会话占位已释放");
    }
}
