//! 扫码获取Cookie的驱动循环
//!
//! 状态转换本身在 `models::acquisition_session` 中,这里只负责:
//! - 调用远端接口并把结果喂给会话
//! - 在两次轮询之间等待固定间隔
//! - 在每次轮询开始前检查取消标记

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::models::acquisition_session::{MAX_POLL_ATTEMPTS, POLL_INTERVAL};
use crate::models::{AcquisitionSession, PollStep};
use crate::services::CookieService;

/// 执行一次完整的扫码会话
///
/// # 参数
/// - `service`: 远端服务
/// - `prior_cookie`: 重新获取时的旧Cookie
/// - `cancel`: 对话框关闭时被取消的令牌
/// - `on_qrcode`: 拿到二维码后调用一次,用于展示二维码
///
/// # 返回值
/// 已进入终态的会话。调用方根据 `outcome` 决定通知与刷新。
///
/// # 取消语义
/// 取消标记只在开始新一轮轮询前检查;进行中的请求不会被打断。
/// 间隔等待期间收到取消会提前醒来,但不会再发出请求。
pub async fn run_acquisition<F>(
    service: &dyn CookieService,
    prior_cookie: Option<String>,
    cancel: &CancellationToken,
    on_qrcode: F,
) -> AcquisitionSession
where
    F: FnOnce(&str) + Send,
{
    let mut session = AcquisitionSession::new(prior_cookie);

    tracing::info!(
        session_id = %session.session_id,
        reacquire = session.prior_cookie.is_some(),
        "开始扫码获取Cookie"
    );

    if cancel.is_cancelled() {
        session.cancel();
        return session;
    }

    let token = match service.request_qrcode().await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(
                session_id = %session.session_id,
                error = %e,
                "二维码请求失败"
            );
            None
        }
    };
    session.on_token(token);

    let Some(qr_token) = session.qr_token.clone() else {
        tracing::warn!(session_id = %session.session_id, "未获取到二维码,会话结束");
        return session;
    };
    on_qrcode(&qr_token);

    loop {
        if cancel.is_cancelled() {
            session.cancel();
            break;
        }

        let reply = service.poll_cookie(session.poll_hint()).await;
        let step = match reply {
            Ok(status) => {
                tracing::trace!(
                    session_id = %session.session_id,
                    attempt = session.attempt,
                    errcode = ?status.errcode,
                    "轮询结果"
                );
                session.on_poll_reply(status)
            }
            Err(e) => {
                tracing::error!(
                    session_id = %session.session_id,
                    attempt = session.attempt,
                    error = %e,
                    "轮询请求失败"
                );
                session.on_poll_error(e.to_string());
                PollStep::Done
            }
        };

        if step == PollStep::Done {
            break;
        }

        tokio::select! {
            _ = sleep(POLL_INTERVAL) => session.record_delay(),
            _ = cancel.cancelled() => {
                session.cancel();
                break;
            }
        }
    }

    tracing::info!(
        session_id = %session.session_id,
        attempts = session.attempt,
        max_attempts = MAX_POLL_ATTEMPTS,
        delays = session.delays,
        duration_seconds = session.duration_seconds(),
        outcome = session.outcome.label(),
        "扫码会话结束"
    );

    session
}
