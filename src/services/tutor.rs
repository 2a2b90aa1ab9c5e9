//! 答疑服务：`chat-with-ai` 云函数背后的能力

use std::sync::Arc;

use tracing::debug;

use crate::error::AppResult;
use crate::services::llm_service::{CompletionOptions, LlmService};

const SYSTEM_PROMPT: &str = "You are a friendly and knowledgeable AI study assistant for school students. Answer educational questions clearly and accurately, explain step by step when helpful, and keep answers concise.";

const OPTIONS: CompletionOptions = CompletionOptions {
    max_tokens: 1000,
    temperature: 0.7,
};

pub struct TutorService {
    llm: Arc<LlmService>,
}

impl TutorService {
    pub fn new(llm: Arc<LlmService>) -> Self {
        Self { llm }
    }

    /// 回答学生的问题
    pub async fn answer(&self, question: &str) -> AppResult<String> {
        debug!("收到提问: {} 字符", question.chars().count());
        self.llm
            .send_to_llm(question.trim(), Some(SYSTEM_PROMPT), OPTIONS)
            .await
    }
}
