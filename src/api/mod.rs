//! 云函数 HTTP 接口
//!
//! 对外暴露三个云函数和两个辅助接口：
//! - `POST /functions/v1/generate-test`
//! - `POST /functions/v1/get-study-materials`
//! - `POST /functions/v1/chat-with-ai`
//! - `GET /catalog`、`GET /health`

pub mod handlers;

use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub use handlers::AppState;

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/functions/v1/generate-test", post(handlers::generate_test))
        .route(
            "/functions/v1/get-study-materials",
            post(handlers::get_study_materials),
        )
        .route("/functions/v1/chat-with-ai", post(handlers::chat_with_ai))
        .route("/catalog", get(handlers::catalog))
        .route("/health", get(handlers::health))
        .layer(cors_layer())
        .with_state(state)
}

/// 允许任意来源；请求头与前端 SDK 发送的一致
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}
