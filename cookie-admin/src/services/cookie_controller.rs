use std::sync::Arc;

use crate::models::{
    AcquisitionOutcome, AcquisitionSession, AppError, CookieRecord, Notification, RegistryError,
};
use crate::services::acquisition::run_acquisition;
use crate::services::presenter::{EditorOutcome, Presenter};
use crate::services::registry::{CookieRegistry, RegistrySnapshot};
use crate::services::session_manager::SessionManager;
use crate::services::CookieService;
use crate::{log_error, log_event};

/// Cookie列表控制器
///
/// 把用户意图 (新增/编辑/删除/刷新状态/扫码获取) 翻译为远端调用,
/// 并把结果对账回注册表。
///
/// 约定:
/// - 注册表只由控制器修改,每次对账后把快照交给展示层
/// - 所有失败都以通知告知用户,控制器自身不重试
/// - 变更失败时不做乐观更新
pub struct CookieController {
    service: Arc<dyn CookieService>,
    presenter: Arc<dyn Presenter>,
    registry: CookieRegistry,
    sessions: SessionManager,
}

impl CookieController {
    pub fn new(service: Arc<dyn CookieService>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            service,
            presenter,
            registry: CookieRegistry::new(),
            sessions: SessionManager::new(),
        }
    }

    /// 当前列表快照
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.registry.snapshot()
    }

    /// 是否有扫码会话进行中 (展示层据此禁用入口)
    pub fn is_acquiring(&self) -> bool {
        self.sessions.is_active()
    }

    /// 重新加载完整列表
    ///
    /// 加载期间打开加载状态,无论成败都会关闭。
    ///
    /// # 返回值
    /// 加载到的记录条数
    pub async fn load_all(&self) -> Result<usize, AppError> {
        self.presenter.set_loading(true);
        let result = self.reload().await;
        self.presenter.set_loading(false);
        result
    }

    async fn reload(&self) -> Result<usize, AppError> {
        let records = match self.service.list_cookies().await {
            Ok(records) => records,
            Err(e) => {
                log_error!("CookieListLoadFailed", error = %e);
                self.presenter
                    .notify(Notification::error(format!("获取Cookie列表失败: {}", e)));
                return Err(e.into());
            }
        };

        match self.registry.replace_all(records) {
            Ok(count) => {
                self.presenter.render(self.registry.snapshot());
                log_event!("CookieListLoaded", count = count);
                Ok(count)
            }
            Err(e) => {
                self.presenter
                    .notify(Notification::error(format!("Cookie列表数据异常: {}", e)));
                Err(e.into())
            }
        }
    }

    /// 新增Cookie (手动填写)
    pub async fn add(&self) -> Result<EditorOutcome, AppError> {
        self.edit_with(None).await
    }

    /// 编辑Cookie,编辑框预填当前值
    pub async fn edit(&self, record: &CookieRecord) -> Result<EditorOutcome, AppError> {
        self.edit_with(Some(&record.cookie_value)).await
    }

    async fn edit_with(&self, prior_cookie: Option<&str>) -> Result<EditorOutcome, AppError> {
        let outcome = self.presenter.open_editor(prior_cookie).await;
        if outcome == EditorOutcome::Saved {
            self.load_all().await?;
        }
        Ok(outcome)
    }

    /// 删除Cookie
    ///
    /// 先弹出确认框;确认后远端返回 `code == 200` 才算成功并重新加载,
    /// 否则把响应原样通知用户,列表保持不变。
    ///
    /// # 返回值
    /// - `Ok(true)`: 已删除
    /// - `Ok(false)`: 用户取消
    pub async fn delete(&self, record: &CookieRecord) -> Result<bool, AppError> {
        let content = format!("确认删除Cookie {} 吗", record.cookie_value);
        if !self.presenter.confirm("确认删除", &content).await {
            tracing::debug!(account_id = %record.account_id, "用户取消删除");
            return Ok(false);
        }

        let receipt = match self.service.delete_cookie(&record.cookie_value).await {
            Ok(receipt) => receipt,
            Err(e) => {
                log_error!("CookieDeleteFailed", account_id = %record.account_id, error = %e);
                self.presenter.notify(Notification::error(e.to_string()));
                return Err(e.into());
            }
        };

        if !receipt.is_success() {
            let message = receipt.describe();
            log_error!(
                "CookieDeleteRejected",
                account_id = %record.account_id,
                code = ?receipt.code
            );
            self.presenter.notify(Notification::error(message.clone()));
            return Err(AppError::Rejected(message));
        }

        log_event!("CookieDeleted", account_id = %record.account_id);
        self.presenter.notify(Notification::success("删除成功"));
        self.load_all().await?;
        Ok(true)
    }

    /// 刷新单条记录的状态
    ///
    /// 远端返回带Cookie的记录时只替换该账号的条目,不整表重载。
    /// `index` 来自展示层的快照,已过期时按账号重新定位。
    pub async fn refresh_status(
        &self,
        record: &CookieRecord,
        index: usize,
    ) -> Result<CookieRecord, AppError> {
        let refreshed = match self.service.refresh_cookie(&record.cookie_value).await {
            Ok(Some(refreshed)) => refreshed,
            Ok(None) => {
                log_error!("CookieRefreshRejected", account_id = %record.account_id);
                self.presenter.notify(Notification::error("更新状态失败"));
                return Err(AppError::Rejected("更新状态失败".to_string()));
            }
            Err(e) => {
                log_error!("CookieRefreshFailed", account_id = %record.account_id, error = %e);
                self.presenter
                    .notify(Notification::error(format!("更新状态失败: {}", e)));
                return Err(e.into());
            }
        };

        if let Err(e) = self.splice_refreshed(index, refreshed.clone()) {
            let notification = match &e {
                RegistryError::AccountNotFound { .. } => {
                    Notification::warning("账号已不在列表中,请重新加载列表")
                }
                _ => Notification::error(format!("更新状态失败: {}", e)),
            };
            self.presenter.notify(notification);
            return Err(e.into());
        }

        self.presenter.render(self.registry.snapshot());
        self.presenter.notify(Notification::success("更新状态成功"));
        log_event!(
            "CookieStatusRefreshed",
            account_id = %refreshed.account_id,
            status = refreshed.status.label()
        );
        Ok(refreshed)
    }

    /// 把刷新结果写回注册表
    ///
    /// 请求期间列表可能已被重新加载,`index` 不再指向同一账号时按账号重新定位;
    /// 账号已被移除则放弃写回。
    fn splice_refreshed(&self, index: usize, record: CookieRecord) -> Result<(), RegistryError> {
        match self.registry.splice_at(index, record.clone()) {
            Err(RegistryError::AccountMismatch { .. } | RegistryError::IndexOutOfRange { .. }) => {
                let position = self.registry.position(&record.account_id).ok_or_else(|| {
                    RegistryError::AccountNotFound {
                        account_id: record.account_id.clone(),
                    }
                })?;
                tracing::debug!(
                    account_id = %record.account_id,
                    stale_index = index,
                    index = position,
                    "刷新结果按账号重新定位"
                );
                self.registry.splice_at(position, record)
            }
            other => other,
        }
    }

    /// 为已有账号重新扫码获取Cookie
    pub async fn reacquire(&self, record: &CookieRecord) -> Option<AcquisitionSession> {
        self.acquire(Some(record.cookie_value.clone())).await
    }

    /// 扫码获取新账号的Cookie
    pub async fn acquire_new(&self) -> Option<AcquisitionSession> {
        self.acquire(None).await
    }

    /// 关闭二维码对话框
    ///
    /// 进行中的轮询在当前请求结束后停止。
    pub fn dismiss_qrcode(&self) -> bool {
        self.sessions.cancel_current()
    }

    /// 扫码会话的统一入口
    ///
    /// # 返回值
    /// - `None`: 已有会话进行中,本次请求被忽略
    /// - `Some(session)`: 已结束的会话
    async fn acquire(&self, prior_cookie: Option<String>) -> Option<AcquisitionSession> {
        let active = self.sessions.try_begin()?;
        let token = active.token().clone();

        let presenter = Arc::clone(&self.presenter);
        let dismiss = token.clone();
        let session = run_acquisition(&*self.service, prior_cookie, &token, move |qr| {
            presenter.show_qrcode(qr, dismiss)
        })
        .await;

        // 会话已结束,后续的重新加载不应阻止下一次获取
        drop(active);

        let dialog_shown = session.qr_token.is_some();
        match &session.outcome {
            AcquisitionOutcome::Succeeded { cookie } => {
                self.presenter.close_qrcode();
                self.presenter.notify(Notification::success("Cookie获取成功"));
                self.presenter.show_acquired_cookie(cookie);
                log_event!(
                    "CookieAcquired",
                    session_id = %session.session_id,
                    attempts = session.attempt,
                    cookie_len = cookie.len()
                );
                if let Err(e) = self.load_all().await {
                    tracing::warn!(error = %e, "获取成功后重新加载列表失败");
                }
            }
            AcquisitionOutcome::Failed { message } => {
                if dialog_shown {
                    self.presenter.close_qrcode();
                }
                self.presenter.notify(Notification::error(message.clone()));
            }
            AcquisitionOutcome::Exhausted => {
                self.presenter.close_qrcode();
                self.presenter
                    .notify(Notification::error("二维码等待超时,请重新获取"));
            }
            AcquisitionOutcome::Cancelled => {
                tracing::info!(session_id = %session.session_id, "用户关闭二维码对话框");
            }
            AcquisitionOutcome::Pending => {
                tracing::error!(session_id = %session.session_id, "会话未进入终态");
            }
        }

        Some(session)
    }
}
