use chrono::{DateTime, Local};
use serde::Serialize;

/// 消息来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Ai,
}

/// 聊天消息（只存在于当前会话）
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: u64,
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(id: u64, kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            content: content.into(),
            timestamp: Local::now(),
        }
    }

    /// 显示用的时间
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}
