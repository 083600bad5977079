//! 展示层接缝
//!
//! 控制器通过 `Presenter` 与界面交互: 渲染列表、通知、确认框、编辑框、二维码对话框。
//! 界面实现不在本crate内;这里附带一个无交互的控制台实现供命令行使用。

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::models::{Notification, NotificationLevel};
use crate::services::registry::RegistrySnapshot;

/// 编辑框的关闭方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOutcome {
    /// 用户提交且编辑框已完成保存,需要刷新列表
    Saved,
    /// 用户关闭了编辑框
    Dismissed,
}

/// 展示层
#[async_trait]
pub trait Presenter: Send + Sync {
    /// 渲染列表的只读快照
    fn render(&self, records: RegistrySnapshot);

    /// 切换加载状态
    fn set_loading(&self, loading: bool);

    /// 弹出通知
    fn notify(&self, notification: Notification);

    /// 阻塞式确认框,返回用户是否确认
    async fn confirm(&self, title: &str, content: &str) -> bool;

    /// 打开Cookie编辑框
    ///
    /// 保存动作由编辑框自己完成,控制器只关心结果。
    async fn open_editor(&self, prior_cookie: Option<&str>) -> EditorOutcome;

    /// 展示二维码对话框
    ///
    /// 用户关闭对话框时应调用 `dismiss.cancel()`。
    fn show_qrcode(&self, qr_token: &str, dismiss: CancellationToken);

    /// 关闭二维码对话框
    fn close_qrcode(&self);

    /// 展示获取到的Cookie
    fn show_acquired_cookie(&self, cookie: &str);
}

/// 控制台展示层
///
/// 无交互: 确认框一律视为取消,编辑框一律视为关闭。
#[derive(Debug, Default)]
pub struct ConsolePresenter;

#[async_trait]
impl Presenter for ConsolePresenter {
    fn render(&self, records: RegistrySnapshot) {
        println!("{:<24} {:<16} {:<8} {}", "账号", "昵称", "状态", "值");
        for record in records.iter() {
            println!(
                "{:<24} {:<16} {:<8} {}",
                record.display_account_id(),
                record.nickname,
                record.status.label(),
                record.cookie_value
            );
        }
    }

    fn set_loading(&self, loading: bool) {
        tracing::debug!(loading = loading, "加载状态变化");
    }

    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => tracing::info!(message = %notification.message, "通知"),
            NotificationLevel::Warning => tracing::warn!(message = %notification.message, "通知"),
            NotificationLevel::Error => tracing::error!(message = %notification.message, "通知"),
        }
    }

    async fn confirm(&self, title: &str, _content: &str) -> bool {
        tracing::warn!(title = %title, "非交互模式,确认框默认取消");
        false
    }

    async fn open_editor(&self, _prior_cookie: Option<&str>) -> EditorOutcome {
        tracing::warn!("非交互模式,编辑框默认关闭");
        EditorOutcome::Dismissed
    }

    fn show_qrcode(&self, qr_token: &str, _dismiss: CancellationToken) {
        println!("请使用App扫描二维码: {}", qr_token);
    }

    fn close_qrcode(&self) {
        tracing::debug!("二维码对话框关闭");
    }

    fn show_acquired_cookie(&self, cookie: &str) {
        println!("获取Cookie成功: {}", cookie);
    }
}
