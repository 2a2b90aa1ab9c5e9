//! AI 答疑会话
//!
//! 消息只保存在内存里，不落库

use tracing::error;

use crate::clients::FunctionsClient;
use crate::models::{ChatMessage, MessageKind, Notice};

pub const GREETING: &str =
    "Hello! I'm your AI study assistant. Ask me any educational question and I'll help you learn!";
pub const NO_ANSWER: &str = "Sorry, I could not process your question.";
pub const FAILED_ANSWER: &str = "Sorry, I encountered an error. Please try again.";

pub struct ChatSession {
    functions: FunctionsClient,
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatSession {
    pub fn new(functions: FunctionsClient) -> Self {
        Self {
            functions,
            messages: vec![ChatMessage::new(1, MessageKind::Ai, GREETING)],
            next_id: 2,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// 发送一条消息
    ///
    /// 空白输入直接忽略（返回 `None` 且不追加消息）。
    /// 调用失败时追加一条道歉回复，并返回错误提示。
    pub async fn send(&mut self, input: &str) -> Option<Notice> {
        if input.trim().is_empty() {
            return None;
        }
        self.push(MessageKind::User, input);

        match self.functions.ask(input).await {
            Ok(answer) => {
                let content = answer.unwrap_or_else(|| NO_ANSWER.to_string());
                self.push(MessageKind::Ai, content);
                None
            }
            Err(e) => {
                error!("❌ 发送消息失败: {}", e);
                self.push(MessageKind::Ai, FAILED_ANSWER);
                Some(Notice::destructive("Error sending message", "Please try again later."))
            }
        }
    }

    fn push(&mut self, kind: MessageKind, content: impl Into<String>) {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage::new(id, kind, content));
    }
}
