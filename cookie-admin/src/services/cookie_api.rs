use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{ApiError, AppConfig, CookieRecord, PollStatus};

/// 远端Cookie服务
///
/// 控制器与扫码会话只通过这个接缝访问远端,测试中以脚本化的实现替换。
#[async_trait]
pub trait CookieService: Send + Sync {
    /// GET `cookies`: 完整列表 (保持服务端顺序)
    async fn list_cookies(&self) -> Result<Vec<CookieRecord>, ApiError>;

    /// GET `qrcode`: 二维码内容,缺失或为空时返回 `None`
    async fn request_qrcode(&self) -> Result<Option<String>, ApiError>;

    /// GET `cookie?cookie=<prior>`: 查询扫码结果
    async fn poll_cookie(&self, prior_cookie: &str) -> Result<PollStatus, ApiError>;

    /// POST `cookie/refresh`: 重新检查单条记录,响应不含Cookie时返回 `None`
    async fn refresh_cookie(&self, cookie: &str) -> Result<Option<CookieRecord>, ApiError>;

    /// DELETE `cookie`: 删除记录
    async fn delete_cookie(&self, cookie: &str) -> Result<DeleteReceipt, ApiError>;
}

/// 删除接口的回执
///
/// 只有 `code == 200` 视为成功;其余情况把原始响应交给用户。
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteReceipt {
    pub code: Option<i64>,
    pub payload: Value,
}

impl DeleteReceipt {
    pub fn from_payload(payload: Value) -> Self {
        Self {
            code: payload.get("code").and_then(Value::as_i64),
            payload,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(200)
    }

    /// 失败时展示给用户的文案: 优先取 `message`,否则原样输出响应
    pub fn describe(&self) -> String {
        self.payload
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.payload.to_string())
    }
}

/// `{ data: T }` 信封
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: Option<T>,
}

/// 二维码响应
#[derive(Debug, Deserialize)]
struct QrcodeResponse {
    #[serde(default)]
    qrcode: Option<String>,
}

/// 变更请求体 `{ cookie }`
#[derive(Debug, Serialize)]
struct CookieBody<'a> {
    cookie: &'a str,
}

/// 基于HTTP的远端Cookie服务客户端
///
/// 职责:
/// - 按配置的前缀拼接端点
/// - 携带访问令牌
/// - 把非2xx和解析失败统一映射为 `ApiError`
pub struct HttpCookieService {
    client: Client,
    config: AppConfig,
}

impl HttpCookieService {
    /// 创建新的客户端
    ///
    /// # 错误
    /// - `ApiError::ClientInit`: 令牌包含非法header字符,或客户端构建失败
    pub fn new(config: AppConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::ClientInit(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.http_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::ClientInit(e.to_string()))?;

        tracing::info!(
            config = %config.summary_for_logging(),
            "Cookie service client initialized"
        );

        Ok(Self { client, config })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// 发送请求并解析JSON响应
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(endpoint = %endpoint, error = %e, "Request failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = String::from_utf8_lossy(&body).into_owned();
            tracing::error!(
                endpoint = %endpoint,
                status = %status.as_u16(),
                body = %message,
                "Cookie service returned error status"
            );
            return Err(ApiError::HttpStatusError {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(
                endpoint = %endpoint,
                error = %e,
                "Failed to parse cookie service response"
            );
            ApiError::from(e)
        })
    }
}

#[async_trait]
impl CookieService for HttpCookieService {
    async fn list_cookies(&self) -> Result<Vec<CookieRecord>, ApiError> {
        let envelope: DataEnvelope<Vec<CookieRecord>> = self
            .send_json(self.client.get(self.url("cookies")), "cookies")
            .await?;
        let records = envelope.data.unwrap_or_default();

        tracing::debug!(count = records.len(), "Cookie list fetched");
        Ok(records)
    }

    async fn request_qrcode(&self) -> Result<Option<String>, ApiError> {
        let response: QrcodeResponse = self
            .send_json(self.client.get(self.url("qrcode")), "qrcode")
            .await?;
        Ok(response.qrcode.filter(|q| !q.is_empty()))
    }

    async fn poll_cookie(&self, prior_cookie: &str) -> Result<PollStatus, ApiError> {
        let request = self
            .client
            .get(self.url("cookie"))
            .query(&[("cookie", prior_cookie)]);
        let envelope: DataEnvelope<PollStatus> = self.send_json(request, "cookie").await?;

        envelope
            .data
            .ok_or_else(|| ApiError::InvalidResponse("轮询响应缺少 data 字段".to_string()))
    }

    async fn refresh_cookie(&self, cookie: &str) -> Result<Option<CookieRecord>, ApiError> {
        let request = self
            .client
            .post(self.url("cookie/refresh"))
            .json(&CookieBody { cookie });
        let envelope: DataEnvelope<Value> = self.send_json(request, "cookie/refresh").await?;

        // 只有携带非空cookie的data才算刷新成功
        let Some(data) = envelope.data else {
            return Ok(None);
        };
        let has_cookie = data
            .get("cookie")
            .and_then(Value::as_str)
            .is_some_and(|c| !c.is_empty());
        if !has_cookie {
            return Ok(None);
        }

        let record = serde_json::from_value(data)
            .map_err(|e| ApiError::InvalidResponse(format!("刷新结果不是有效记录: {}", e)))?;
        Ok(Some(record))
    }

    async fn delete_cookie(&self, cookie: &str) -> Result<DeleteReceipt, ApiError> {
        let request = self
            .client
            .delete(self.url("cookie"))
            .json(&CookieBody { cookie });
        let payload: Value = self.send_json(request, "cookie").await?;
        Ok(DeleteReceipt::from_payload(payload))
    }
}
