//! 认证客户端（`{supabase_url}/auth/v1/...`）

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::clients::rest::{self, BackendCredentials};
use crate::config::Config;
use crate::error::{ApiError, AppResult};

/// 登录用户
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// 登录会话
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// 注册结果
///
/// 需要邮箱验证时后端只返回用户，不返回会话
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    SignedIn(AuthSession),
    ConfirmationRequired(AuthUser),
}

/// 注册接口的两种响应形状
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpBody {
    Session(AuthSession),
    User(AuthUser),
}

#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    auth_url: String,
    credentials: BackendCredentials,
}

impl AuthClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            auth_url: format!("{}/auth/v1", config.supabase_url.trim_end_matches('/')),
            credentials: BackendCredentials::new(config),
        }
    }

    /// 注册，姓名写入用户元数据
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> AppResult<SignUpOutcome> {
        let endpoint = format!("{}/signup", self.auth_url);
        let request = self.credentials.apply(self.http.post(&endpoint)).json(&json!({
            "email": email,
            "password": password,
            "data": {
                "first_name": first_name,
                "last_name": last_name,
            }
        }));

        let body: SignUpBody = rest::send_json(&endpoint, request).await?;
        info!("✓ 注册成功: {}", email);
        Ok(match body {
            SignUpBody::Session(session) => SignUpOutcome::SignedIn(session),
            SignUpBody::User(user) => SignUpOutcome::ConfirmationRequired(user),
        })
    }

    /// 邮箱 + 密码登录
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let endpoint = format!("{}/token", self.auth_url);
        let request = self
            .credentials
            .apply(self.http.post(&endpoint))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let session: AuthSession = rest::send_json(&endpoint, request).await?;
        info!("✓ 登录成功: {}", session.user.id);
        Ok(session)
    }

    /// 退出登录，使 token 失效
    pub async fn sign_out(&self, session: &AuthSession) -> AppResult<()> {
        let endpoint = format!("{}/logout", self.auth_url);
        let request = self
            .http
            .post(&endpoint)
            .header("apikey", &self.credentials.anon_key)
            .bearer_auth(&session.access_token);

        rest::send(&endpoint, request).await?;
        Ok(())
    }

    /// 用 token 取当前用户，token 无效时返回 `Unauthorized`
    pub async fn current_user(&self, access_token: &str) -> AppResult<AuthUser> {
        let endpoint = format!("{}/user", self.auth_url);
        let request = self
            .http
            .get(&endpoint)
            .header("apikey", &self.credentials.anon_key)
            .bearer_auth(access_token);

        match rest::send_json(&endpoint, request).await {
            Err(crate::error::AppError::Api(ApiError::BadResponse { status: 401, .. })) => {
                Err(ApiError::Unauthorized { endpoint }.into())
            }
            other => other,
        }
    }
}
