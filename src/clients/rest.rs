//! 托管后端的公共 HTTP 细节
//!
//! 每个请求都带 `apikey`（匿名 key）和 `Authorization`（登录后的 token，未登录时用匿名 key）

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// 访问托管后端需要的凭据
#[derive(Debug, Clone)]
pub struct BackendCredentials {
    pub anon_key: String,
    pub access_token: Option<String>,
}

impl BackendCredentials {
    pub fn new(config: &Config) -> Self {
        Self {
            anon_key: config.supabase_anon_key.clone(),
            access_token: None,
        }
    }

    pub fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }

    /// 给请求加上认证头
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }
}

/// 发送请求，非 2xx 转换成 `ApiError::BadResponse`
pub async fn send(endpoint: &str, request: RequestBuilder) -> AppResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| AppError::api_request_failed(endpoint, e))?;

    let status = response.status();
    debug!("{} -> {}", endpoint, status);

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::bad_response(
        endpoint,
        status.as_u16(),
        error_message(&body),
    ))
}

/// 发送请求并把响应体解析成 `T`
pub async fn send_json<T: DeserializeOwned>(endpoint: &str, request: RequestBuilder) -> AppResult<T> {
    let response = send(endpoint, request).await?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::api_request_failed(endpoint, e))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// 从错误响应体里挑出可读的消息
///
/// 各个后端接口的字段不一样：`message`、`msg`、`error_description`、`error`
fn error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Some(body.trim().to_string());
    };
    ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
        .or_else(|| Some(body.trim().to_string()))
}
