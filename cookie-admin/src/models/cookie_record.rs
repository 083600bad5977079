use serde::{Deserialize, Serialize};

/// 账号Cookie记录
///
/// 远端服务列表中的一行。字段名沿用服务端的线上格式 (`pin` / `cookie`),
/// Rust侧使用语义化的名称。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieRecord {
    /// 账号ID (唯一键,服务端保存的是百分号编码后的形式)
    #[serde(rename = "pin")]
    pub account_id: String,

    /// 昵称 (仅展示)
    #[serde(default)]
    pub nickname: String,

    /// Cookie值 (不透明凭证,不写入日志)
    #[serde(rename = "cookie")]
    pub cookie_value: String,

    /// 健康状态
    #[serde(default)]
    pub status: CookieStatus,
}

/// Cookie健康状态
///
/// 线上格式为整数下标: 0 正常, 1 失效, 2 状态异常。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CookieStatus {
    #[default]
    Normal,
    Invalid,
    Abnormal,
}

/// 状态标签的严重程度,对应展示层的标签颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
    Warning,
}

impl CookieStatus {
    /// 展示文案
    pub fn label(&self) -> &'static str {
        match self {
            CookieStatus::Normal => "正常",
            CookieStatus::Invalid => "失效",
            CookieStatus::Abnormal => "状态异常",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            CookieStatus::Normal => Severity::Success,
            CookieStatus::Invalid => Severity::Error,
            CookieStatus::Abnormal => Severity::Warning,
        }
    }
}

impl TryFrom<u8> for CookieStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CookieStatus::Normal),
            1 => Ok(CookieStatus::Invalid),
            2 => Ok(CookieStatus::Abnormal),
            other => Err(format!("未知的Cookie状态: {}", other)),
        }
    }
}

impl From<CookieStatus> for u8 {
    fn from(status: CookieStatus) -> Self {
        match status {
            CookieStatus::Normal => 0,
            CookieStatus::Invalid => 1,
            CookieStatus::Abnormal => 2,
        }
    }
}

impl Severity {
    /// 标签颜色名
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl CookieRecord {
    /// 创建新的记录
    pub fn new(account_id: impl Into<String>, cookie_value: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            nickname: String::new(),
            cookie_value: cookie_value.into(),
            status: CookieStatus::Normal,
        }
    }

    /// 设置昵称 (构建器模式)
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }

    /// 设置状态 (构建器模式)
    pub fn with_status(mut self, status: CookieStatus) -> Self {
        self.status = status;
        self
    }

    /// 展示用账号ID
    ///
    /// 服务端保存的是百分号编码形式 (中文账号常见)。
    /// 解码失败时原样返回,展示层不应因为一个坏账号而整表失败。
    ///
    /// # 示例
    /// ```
    /// use cookie_admin::models::CookieRecord;
    ///
    /// let record = CookieRecord::new("%E5%BC%A0%E4%B8%89", "pt_key=xxx;");
    /// assert_eq!(record.display_account_id(), "张三");
    /// ```
    pub fn display_account_id(&self) -> String {
        urlencoding::decode(&self.account_id)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| self.account_id.clone())
    }
}
