//! 学习资料流程

use tracing::error;

use crate::clients::FunctionsClient;
use crate::models::{Notice, StudySelection, StudyVideo};

/// 一次查询的结果：视频列表 + 提示
#[derive(Debug, Clone)]
pub struct StudyResult {
    pub videos: Vec<StudyVideo>,
    pub notice: Notice,
}

pub struct StudyFlow {
    functions: FunctionsClient,
}

impl StudyFlow {
    pub fn new(functions: FunctionsClient) -> Self {
        Self { functions }
    }

    /// 查询学习视频；失败时视频列表为空
    pub async fn load(&self, selection: &StudySelection) -> StudyResult {
        if selection.validate().is_err() {
            return StudyResult {
                videos: Vec::new(),
                notice: Notice::destructive(
                    "Please select all fields",
                    "Select class, subject, and topic to get study materials.",
                ),
            };
        }

        match self.functions.study_materials(selection).await {
            Ok(videos) => {
                let notice = Notice::info(
                    "Study materials loaded!",
                    format!("Found {} videos for {}", videos.len(), selection.topic),
                );
                StudyResult { videos, notice }
            }
            Err(e) => {
                error!("❌ 获取学习资料失败: {}", e);
                StudyResult {
                    videos: Vec::new(),
                    notice: Notice::destructive("Error loading materials", "Please try again later."),
                }
            }
        }
    }
}
