use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// 轮询次数上限 (0..50)
pub const MAX_POLL_ATTEMPTS: u32 = 50;

/// 两次轮询之间的固定间隔
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// "尚未扫码" 哨兵错误码,出现时继续轮询
pub const AWAITING_SCAN_ERRCODE: i64 = 176;

/// 二维码获取失败时的通用提示
pub const TOKEN_UNAVAILABLE_MESSAGE: &str = "获取二维码失败";

/// 远端返回失败但没有附带消息时的提示
pub const POLL_FAILED_MESSAGE: &str = "获取Cookie失败";

/// 扫码获取Cookie的会话
///
/// 从请求二维码到拿到Cookie (或失败) 的完整生命周期。
/// 只包含纯状态转换,不做I/O;驱动循环见 `services::acquisition`。
///
/// 状态转换流程:
/// ```text
/// RequestingToken -> Polling -> Succeeded
///        |              |-----> Failed
///        |              |-----> Exhausted (50次仍未扫码)
///        +-> Failed     +-----> Cancelled (用户关闭对话框)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionSession {
    /// 会话唯一ID (仅用于日志追踪)
    pub session_id: Uuid,

    /// 重新获取时携带的旧Cookie,新增账号时为空
    pub prior_cookie: Option<String>,

    /// 远端下发的二维码内容
    pub qr_token: Option<String>,

    /// 已发出的轮询次数 (下一次轮询的0起下标)
    pub attempt: u32,

    /// 已执行的轮询间隔等待次数
    pub delays: u32,

    /// 当前结果
    pub outcome: AcquisitionOutcome,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 进入终态的时间
    pub finished_at: Option<DateTime<Utc>>,
}

/// 会话所处阶段 (由会话字段推导)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionPhase {
    RequestingToken,
    Polling,
    Finished,
}

/// 会话结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AcquisitionOutcome {
    /// 尚未结束
    Pending,

    /// 获取成功
    Succeeded { cookie: String },

    /// 明确失败 (二维码不可用或远端返回非哨兵错误)
    Failed { message: String },

    /// 轮询次数用尽仍未扫码
    Exhausted,

    /// 用户关闭了二维码对话框
    Cancelled,
}

/// 轮询接口 `data` 字段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollStatus {
    #[serde(default)]
    pub cookie: Option<String>,

    #[serde(default)]
    pub errcode: Option<i64>,

    #[serde(default)]
    pub message: Option<String>,
}

/// 处理一次轮询结果后的下一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    /// 等待固定间隔后继续
    Wait,
    /// 会话已进入终态
    Done,
}

impl AcquisitionOutcome {
    pub fn is_final(&self) -> bool {
        !matches!(self, AcquisitionOutcome::Pending)
    }

    /// 日志用的结果名
    pub fn label(&self) -> &'static str {
        match self {
            AcquisitionOutcome::Pending => "pending",
            AcquisitionOutcome::Succeeded { .. } => "succeeded",
            AcquisitionOutcome::Failed { .. } => "failed",
            AcquisitionOutcome::Exhausted => "exhausted",
            AcquisitionOutcome::Cancelled => "cancelled",
        }
    }

    /// 成功时的Cookie
    pub fn cookie(&self) -> Option<&str> {
        match self {
            AcquisitionOutcome::Succeeded { cookie } => Some(cookie),
            _ => None,
        }
    }
}

impl PollStatus {
    /// 等待扫码中
    pub fn awaiting_scan() -> Self {
        Self {
            cookie: None,
            errcode: Some(AWAITING_SCAN_ERRCODE),
            message: Some("请扫描二维码".to_string()),
        }
    }

    /// 获取成功
    pub fn with_cookie(cookie: impl Into<String>) -> Self {
        Self {
            cookie: Some(cookie.into()),
            errcode: None,
            message: None,
        }
    }

    /// 远端失败
    pub fn failed(errcode: i64, message: impl Into<String>) -> Self {
        Self {
            cookie: None,
            errcode: Some(errcode),
            message: Some(message.into()),
        }
    }

    /// 非空Cookie (空字符串视为没有)
    fn present_cookie(&self) -> Option<&str> {
        self.cookie.as_deref().filter(|c| !c.is_empty())
    }
}

impl AcquisitionSession {
    /// 创建新的会话
    ///
    /// # 参数
    /// - `prior_cookie`: 重新获取时的旧Cookie,空字符串按无处理
    pub fn new(prior_cookie: Option<String>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            prior_cookie: prior_cookie.filter(|c| !c.is_empty()),
            qr_token: None,
            attempt: 0,
            delays: 0,
            outcome: AcquisitionOutcome::Pending,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn phase(&self) -> AcquisitionPhase {
        if self.outcome.is_final() {
            AcquisitionPhase::Finished
        } else if self.qr_token.is_some() {
            AcquisitionPhase::Polling
        } else {
            AcquisitionPhase::RequestingToken
        }
    }

    pub fn is_final(&self) -> bool {
        self.outcome.is_final()
    }

    /// 轮询时携带的旧Cookie提示,没有则为空字符串
    pub fn poll_hint(&self) -> &str {
        self.prior_cookie.as_deref().unwrap_or("")
    }

    /// 记录二维码请求结果
    ///
    /// 没有二维码 (缺失或为空) 直接失败,会话不会进入轮询阶段。
    pub fn on_token(&mut self, token: Option<String>) {
        if self.phase() != AcquisitionPhase::RequestingToken {
            return;
        }
        match token.filter(|t| !t.is_empty()) {
            Some(token) => self.qr_token = Some(token),
            None => self.finish(AcquisitionOutcome::Failed {
                message: TOKEN_UNAVAILABLE_MESSAGE.to_string(),
            }),
        }
    }

    /// 处理一次轮询响应
    ///
    /// - 有Cookie: 成功,立即结束
    /// - 错误码不是176: 失败,立即结束
    /// - 176且未达上限: 等待后继续
    /// - 176且已达上限: 用尽,不再等待
    pub fn on_poll_reply(&mut self, reply: PollStatus) -> PollStep {
        if self.phase() != AcquisitionPhase::Polling {
            return PollStep::Done;
        }
        self.attempt += 1;

        if let Some(cookie) = reply.present_cookie() {
            self.finish(AcquisitionOutcome::Succeeded {
                cookie: cookie.to_string(),
            });
            return PollStep::Done;
        }

        if reply.errcode != Some(AWAITING_SCAN_ERRCODE) {
            let message = reply
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| POLL_FAILED_MESSAGE.to_string());
            self.finish(AcquisitionOutcome::Failed { message });
            return PollStep::Done;
        }

        if self.attempt >= MAX_POLL_ATTEMPTS {
            self.finish(AcquisitionOutcome::Exhausted);
            return PollStep::Done;
        }

        PollStep::Wait
    }

    /// 轮询请求本身失败 (网络等),按明确失败处理
    pub fn on_poll_error(&mut self, message: String) {
        if self.phase() != AcquisitionPhase::Polling {
            return;
        }
        self.attempt += 1;
        self.finish(AcquisitionOutcome::Failed { message });
    }

    /// 记录一次间隔等待
    pub fn record_delay(&mut self) {
        self.delays += 1;
    }

    /// 用户取消; 已在终态时无效果
    pub fn cancel(&mut self) {
        if !self.is_final() {
            self.finish(AcquisitionOutcome::Cancelled);
        }
    }

    /// 会话持续时长(秒)
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at.unwrap_or_else(Utc::now) - self.created_at).num_seconds()
    }

    fn finish(&mut self, outcome: AcquisitionOutcome) {
        self.outcome = outcome;
        self.finished_at = Some(Utc::now());
    }
}
