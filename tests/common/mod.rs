//! 集成测试用的本地假服务（补全接口、托管后端）
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use study_portal::api::{self, AppState};
use study_portal::Config;

/// 在随机端口上启动路由，返回 `http://127.0.0.1:port`
pub async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

// ========== 假的补全接口 ==========

#[derive(Clone)]
pub enum LlmReply {
    Content(String),
    Unauthorized,
}

#[derive(Clone)]
pub struct MockLlm {
    pub base_url: String,
    reply: Arc<Mutex<LlmReply>>,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockLlm {
    pub fn set_reply(&self, reply: LlmReply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

pub async fn mock_llm(reply: LlmReply) -> MockLlm {
    let mock = MockLlm {
        base_url: String::new(),
        reply: Arc::new(Mutex::new(reply)),
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(mock.clone());
    let url = spawn(app).await;

    MockLlm {
        base_url: format!("{}/v1", url),
        ..mock
    }
}

async fn completions(State(mock): State<MockLlm>, Json(body): Json<Value>) -> impl IntoResponse {
    let model = body["model"].as_str().unwrap_or("unknown").to_string();
    mock.requests.lock().unwrap().push(body);

    let reply = mock.reply.lock().unwrap().clone();
    match reply {
        LlmReply::Content(content) => (
            StatusCode::OK,
            Json(json!({
                "id": "chatcmpl-test",
                "object": "chat.completion",
                "created": 1_700_000_000u32,
                "model": model,
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": content },
                    "finish_reason": "stop",
                    "logprobs": null
                }],
                "usage": { "prompt_tokens": 12, "completion_tokens": 34, "total_tokens": 46 }
            })),
        ),
        LlmReply::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": {
                    "message": "Incorrect API key provided",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": "invalid_api_key"
                }
            })),
        ),
    }
}

// ========== 假的托管后端（数据表 + 认证） ==========

pub const VALID_TOKEN: &str = "token-abc";
pub const PASSWORD: &str = "correct-horse";

#[derive(Clone, Default)]
pub struct MockBackend {
    pub base_url: String,
    pub profiles: Arc<Mutex<Vec<Value>>>,
    pub tests: Arc<Mutex<Vec<Value>>>,
    pub fail_writes: Arc<Mutex<bool>>,
    pub fail_reads: Arc<Mutex<bool>>,
    pub seen_api_keys: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn inserted_tests(&self) -> Vec<Value> {
        self.tests.lock().unwrap().clone()
    }
}

pub async fn mock_backend() -> MockBackend {
    let mock = MockBackend::default();
    let app = Router::new()
        .route("/rest/v1/profiles", get(list_profiles))
        .route("/rest/v1/tests", get(list_tests).post(insert_test))
        .route("/auth/v1/signup", post(signup))
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/logout", post(logout))
        .route("/auth/v1/user", get(current_user))
        .with_state(mock.clone());
    let url = spawn(app).await;
    MockBackend {
        base_url: url,
        ..mock
    }
}

fn remember_key(mock: &MockBackend, headers: &HeaderMap) {
    if let Some(key) = headers.get("apikey").and_then(|v| v.to_str().ok()) {
        mock.seen_api_keys.lock().unwrap().push(key.to_string());
    }
}

fn matches_user(row: &Value, params: &HashMap<String, String>) -> bool {
    match params.get("user_id") {
        Some(filter) => filter.strip_prefix("eq.") == row["user_id"].as_str(),
        None => true,
    }
}

async fn list_profiles(
    State(mock): State<MockBackend>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    remember_key(&mock, &headers);
    let rows: Vec<Value> = mock
        .profiles
        .lock()
        .unwrap()
        .iter()
        .filter(|row| matches_user(row, &params))
        .cloned()
        .collect();
    Json(Value::Array(rows))
}

async fn list_tests(
    State(mock): State<MockBackend>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    remember_key(&mock, &headers);
    if *mock.fail_reads.lock().unwrap() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "permission denied for table tests" })),
        );
    }
    let mut rows: Vec<Value> = mock
        .tests
        .lock()
        .unwrap()
        .iter()
        .filter(|row| matches_user(row, &params))
        .cloned()
        .collect();
    if params.get("order").map(String::as_str) == Some("created_at.desc") {
        rows.sort_by(|a, b| b["created_at"].as_str().cmp(&a["created_at"].as_str()));
    }
    (StatusCode::OK, Json(Value::Array(rows)))
}

async fn insert_test(
    State(mock): State<MockBackend>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> impl IntoResponse {
    remember_key(&mock, &headers);
    if *mock.fail_writes.lock().unwrap() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "new row violates row-level security policy" })),
        )
            .into_response();
    }
    let mut tests = mock.tests.lock().unwrap();
    body["id"] = json!(format!("test-{}", tests.len() + 1));
    body["created_at"] = json!(format!("2025-05-0{}T10:00:00+00:00", tests.len() + 1));
    tests.push(body);
    StatusCode::CREATED.into_response()
}

fn session(email: &str) -> Value {
    json!({
        "access_token": VALID_TOKEN,
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "refresh-1",
        "user": { "id": "user-1", "email": email }
    })
}

async fn signup(Json(body): Json<Value>) -> impl IntoResponse {
    let email = body["email"].as_str().unwrap_or_default();
    if email == "taken@example.com" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "code": 422, "msg": "User already registered" })),
        );
    }
    if email.starts_with("confirm") {
        return (
            StatusCode::OK,
            Json(json!({ "id": "user-2", "email": email, "user_metadata": body["data"] })),
        );
    }
    (StatusCode::OK, Json(session(email)))
}

async fn token(
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let is_password_grant = params.get("grant_type").map(String::as_str) == Some("password");
    if is_password_grant && body["password"] == PASSWORD {
        let email = body["email"].as_str().unwrap_or_default();
        return (StatusCode::OK, Json(session(email)));
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })),
    )
}

async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn current_user(headers: HeaderMap) -> impl IntoResponse {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {}", VALID_TOKEN).as_str());
    if authorized {
        (
            StatusCode::OK,
            Json(json!({ "id": "user-1", "email": "student@example.com" })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "invalid JWT" })),
        )
    }
}

// ========== 组装 ==========

/// 指向假服务的配置
pub fn config(llm_base: &str, backend_base: &str) -> Config {
    Config {
        llm_api_key: "sk-test".into(),
        llm_api_base_url: llm_base.into(),
        supabase_url: backend_base.into(),
        supabase_anon_key: "anon-key".into(),
        ..Config::default()
    }
}

/// 启动云函数服务，返回它的 `/functions/v1` 地址
pub async fn functions_server(config: &Config) -> String {
    let url = spawn(api::router(AppState::new(config))).await;
    format!("{}/functions/v1", url)
}
