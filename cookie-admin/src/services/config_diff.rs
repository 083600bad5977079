//! 配置对比数据源
//!
//! 对比页面左右两侧分别是当前配置与示例配置。渲染差异由展示层完成,
//! 这里只负责把两份文本一起取回。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::ApiError;
use crate::services::HttpCookieService;

/// 配置文件种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKind {
    /// 当前生效的配置 (`config/config`)
    Current,
    /// 示例配置 (`config/sample`)
    Sample,
}

impl ConfigKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ConfigKind::Current => "config/config",
            ConfigKind::Sample => "config/sample",
        }
    }
}

/// 配置文本来源
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn fetch_config(&self, kind: ConfigKind) -> Result<String, ApiError>;
}

#[async_trait]
impl<T: ConfigSource + ?Sized> ConfigSource for Arc<T> {
    async fn fetch_config(&self, kind: ConfigKind) -> Result<String, ApiError> {
        (**self).fetch_config(kind).await
    }
}

/// 一对待对比的配置文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPair {
    pub current: String,
    pub sample: String,
}

impl ConfigPair {
    /// 两侧文本是否一致 (忽略行尾空白与换行风格)
    pub fn is_identical(&self) -> bool {
        self.current.lines().map(str::trim_end).eq(self.sample.lines().map(str::trim_end))
    }
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl ConfigSource for HttpCookieService {
    async fn fetch_config(&self, kind: ConfigKind) -> Result<String, ApiError> {
        let request = self.client().get(self.url(kind.endpoint()));
        let response: ContentResponse = self.send_json(request, kind.endpoint()).await?;
        Ok(response.content.unwrap_or_default())
    }
}

/// 配置对比服务
pub struct ConfigDiffService<S> {
    source: S,
}

impl<S: ConfigSource> ConfigDiffService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// 并发取回两份配置
    ///
    /// 任一侧失败即整体失败,展示层不应只渲染半边。
    pub async fn load(&self) -> Result<ConfigPair, ApiError> {
        let (current, sample) = tokio::join!(
            self.source.fetch_config(ConfigKind::Current),
            self.source.fetch_config(ConfigKind::Sample),
        );

        let pair = ConfigPair {
            current: current?,
            sample: sample?,
        };

        tracing::debug!(
            current_len = pair.current.len(),
            sample_len = pair.sample.len(),
            identical = pair.is_identical(),
            "配置对比数据已加载"
        );
        Ok(pair)
    }
}
