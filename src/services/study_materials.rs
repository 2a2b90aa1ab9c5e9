//! 学习资料服务：`get-study-materials` 云函数背后的能力

use std::sync::Arc;

use reqwest::Url;
use tracing::{info, warn};

use crate::error::AppResult;
use crate::models::{StudySelection, StudyVideo};
use crate::services::completion_json::parse_json_array;
use crate::services::llm_service::{CompletionOptions, LlmService};

const SYSTEM_PROMPT: &str = "You are an educational content curator. Provide 5-6 high-quality YouTube video suggestions for students.";

const OPTIONS: CompletionOptions = CompletionOptions {
    max_tokens: 1000,
    temperature: 0.7,
};

const YOUTUBE_SEARCH: &str = "https://youtube.com/results";

/// 学习视频推荐服务
pub struct StudyMaterialService {
    llm: Arc<LlmService>,
}

impl StudyMaterialService {
    pub fn new(llm: Arc<LlmService>) -> Self {
        Self { llm }
    }

    /// 推荐学习视频
    ///
    /// LLM 调用失败会返回错误；返回内容无法解析时使用兜底推荐。
    pub async fn recommend(&self, selection: &StudySelection) -> AppResult<Vec<StudyVideo>> {
        let user_message = build_user_message(selection);

        let content = self
            .llm
            .send_to_llm(&user_message, Some(SYSTEM_PROMPT), OPTIONS)
            .await?;

        match parse_json_array::<StudyVideo>(&content, "videos") {
            Some(videos) => {
                info!("✓ 推荐了 {} 个视频 ({})", videos.len(), selection);
                Ok(videos)
            }
            None => {
                warn!("⚠️ 无法解析 LLM 返回的视频列表，使用兜底推荐 ({})", selection);
                Ok(fallback_videos(selection))
            }
        }
    }
}

fn build_user_message(selection: &StudySelection) -> String {
    format!(
        "Find educational YouTube videos for {} students studying {} - {}. Return a JSON array with title, url, description, and duration for each video.",
        selection.class, selection.subject, selection.topic
    )
}

/// YouTube 搜索地址，空格编码为 `%20`
fn search_url(query: &str) -> String {
    let Ok(mut url) = Url::parse_with_params(YOUTUBE_SEARCH, &[("search_query", query)]) else {
        return YOUTUBE_SEARCH.to_string();
    };
    // 表单编码里的 `+` 只可能来自空格，原文的 `+` 已被编码为 `%2B`
    let query = url.query().map(|q| q.replace('+', "%20"));
    url.set_query(query.as_deref());
    url.into()
}

/// 指向 YouTube 搜索页的兜底推荐
pub fn fallback_videos(selection: &StudySelection) -> Vec<StudyVideo> {
    let query = format!(
        "{} {} {}",
        selection.class, selection.subject, selection.topic
    );
    let url = search_url(&query);

    vec![StudyVideo {
        title: format!("{} - Complete Tutorial", selection.topic),
        url,
        description: format!(
            "Comprehensive tutorial on {} for {} students",
            selection.topic, selection.class
        ),
        duration: Some("15-20 mins".to_string()),
    }]
}
