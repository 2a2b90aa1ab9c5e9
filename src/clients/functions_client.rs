//! 云函数调用客户端（`{functions_base_url}/{name}`）

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::clients::rest::{self, BackendCredentials};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{Question, StudySelection, StudyVideo};

pub const GENERATE_TEST: &str = "generate-test";
pub const GET_STUDY_MATERIALS: &str = "get-study-materials";
pub const CHAT_WITH_AI: &str = "chat-with-ai";

#[derive(Debug, Deserialize)]
struct QuestionsBody {
    #[serde(default)]
    questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct VideosBody {
    #[serde(default)]
    videos: Vec<StudyVideo>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    #[serde(default)]
    response: Option<String>,
}

/// 云函数客户端
#[derive(Clone)]
pub struct FunctionsClient {
    http: Client,
    base_url: String,
    credentials: BackendCredentials,
}

impl FunctionsClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.functions_url(),
            credentials: BackendCredentials::new(config),
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.credentials.access_token = Some(token.into());
        self
    }

    async fn invoke<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        name: &str,
        body: &B,
    ) -> AppResult<T> {
        let endpoint = format!("{}/{}", self.base_url, name);
        let request = self.credentials.apply(self.http.post(&endpoint)).json(body);
        rest::send_json(&endpoint, request).await
    }

    /// 调用 `generate-test`
    pub async fn generate_test(&self, selection: &StudySelection) -> AppResult<Vec<Question>> {
        let body: QuestionsBody = self.invoke(GENERATE_TEST, selection).await?;
        Ok(body.questions)
    }

    /// 调用 `get-study-materials`
    pub async fn study_materials(&self, selection: &StudySelection) -> AppResult<Vec<StudyVideo>> {
        let body: VideosBody = self.invoke(GET_STUDY_MATERIALS, selection).await?;
        Ok(body.videos)
    }

    /// 调用 `chat-with-ai`，没有 `response` 字段时返回 `None`
    pub async fn ask(&self, question: &str) -> AppResult<Option<String>> {
        let body: ChatBody = self.invoke(CHAT_WITH_AI, &ChatRequest { question }).await?;
        Ok(body.response.filter(|r| !r.trim().is_empty()))
    }
}
