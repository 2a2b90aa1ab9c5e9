use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult, BusinessError};
use crate::models::{Catalog, Question, StudySelection, StudyVideo};
use crate::services::{LlmService, QuestionGenerator, StudyMaterialService, TutorService};
use crate::utils::logging::truncate_text;

/// 处理器共享的服务
#[derive(Clone)]
pub struct AppState {
    pub questions: Arc<QuestionGenerator>,
    pub materials: Arc<StudyMaterialService>,
    pub tutor: Arc<TutorService>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let llm = Arc::new(LlmService::new(config));
        Self {
            questions: Arc::new(QuestionGenerator::new(
                Arc::clone(&llm),
                config.test_question_count,
            )),
            materials: Arc::new(StudyMaterialService::new(Arc::clone(&llm))),
            tutor: Arc::new(TutorService::new(llm)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub struct VideosResponse {
    pub videos: Vec<StudyVideo>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// 请求体解析失败也按 500 + `{error}` 返回
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        ApiError::JsonParseFailed {
            source: Box::new(rejection),
        }
        .into()
    })
}

pub async fn generate_test(
    State(state): State<AppState>,
    payload: Result<Json<StudySelection>, JsonRejection>,
) -> AppResult<Json<QuestionsResponse>> {
    let selection = body(payload)?;
    info!("📥 generate-test: {}", selection);

    let questions = state.questions.generate(&selection).await?;
    Ok(Json(QuestionsResponse { questions }))
}

pub async fn get_study_materials(
    State(state): State<AppState>,
    payload: Result<Json<StudySelection>, JsonRejection>,
) -> AppResult<Json<VideosResponse>> {
    let selection = body(payload)?;
    info!("📥 get-study-materials: {}", selection);

    let videos = state.materials.recommend(&selection).await?;
    Ok(Json(VideosResponse { videos }))
}

pub async fn chat_with_ai(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let request = body(payload)?;
    if request.question.trim().is_empty() {
        return Err(AppError::from(BusinessError::EmptyMessage));
    }
    info!("📥 chat-with-ai: {}", truncate_text(&request.question, 40));

    let response = state.tutor.answer(&request.question).await?;
    Ok(Json(ChatResponse { response }))
}

pub async fn catalog() -> Json<Catalog> {
    Json(Catalog::load())
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
