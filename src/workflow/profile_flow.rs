//! 个人中心：资料 + 测试历史 + 统计

use serde::Serialize;
use tracing::{error, warn};

use crate::clients::TableStore;
use crate::models::record::percentage;
use crate::models::{Notice, Profile, TestRecord};
use crate::workflow::test_session::{review, QuestionReview};

/// 成绩档位（对应界面上的颜色）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    /// ≥ 80%
    Excellent,
    /// ≥ 60%
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn of(score: u32, total: u32) -> Self {
        if total == 0 {
            return ScoreBand::Poor;
        }
        let pct = f64::from(score) / f64::from(total) * 100.0;
        if pct >= 80.0 {
            ScoreBand::Excellent
        } else if pct >= 60.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }
}

/// 历史统计
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub total_tests: usize,
    /// 各次百分比的平均值（不取整）
    pub average_percent: f64,
    pub best_percent: f64,
}

impl ProgressSummary {
    pub fn from_history(history: &[TestRecord]) -> Self {
        let ratios: Vec<f64> = history
            .iter()
            .filter(|t| t.total_questions > 0)
            .map(|t| f64::from(t.score) / f64::from(t.total_questions))
            .collect();

        if history.is_empty() {
            return Self {
                total_tests: 0,
                average_percent: 0.0,
                best_percent: 0.0,
            };
        }

        let average = ratios.iter().sum::<f64>() / history.len() as f64 * 100.0;
        let best = ratios.iter().copied().fold(0.0_f64, f64::max) * 100.0;

        Self {
            total_tests: history.len(),
            average_percent: average,
            best_percent: best,
        }
    }

    pub fn average_rounded(&self) -> u32 {
        self.average_percent.round() as u32
    }
}

/// 历史记录中某一次测试的回顾
#[derive(Debug, Clone, Serialize)]
pub struct TestReview {
    pub subject: String,
    pub topic: String,
    pub percentage: u32,
    pub passed: bool,
    pub questions: Vec<QuestionReview>,
}

impl TestReview {
    /// 以记录里保存的正确答案为准逐题对照
    pub fn from_record(record: &TestRecord) -> Self {
        let mut questions = record.decoded_questions();
        let correct = record.decoded_correct_answers();
        for (q, c) in questions.iter_mut().zip(correct) {
            if let Ok(c) = usize::try_from(c) {
                q.correct_answer = c;
            }
        }
        let answers = record.decoded_student_answers();

        Self {
            subject: record.subject.clone(),
            topic: record.topic.clone(),
            percentage: percentage(record.score, record.total_questions),
            passed: record.passed(),
            questions: review(&questions, &answers),
        }
    }
}

/// 个人中心页面数据
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub profile: Option<Profile>,
    pub history: Vec<TestRecord>,
    pub summary: ProgressSummary,
    pub notice: Option<Notice>,
}

pub struct ProfileFlow {
    store: TableStore,
}

impl ProfileFlow {
    pub fn new(store: TableStore) -> Self {
        Self { store }
    }

    /// 同时读取资料和历史
    ///
    /// 资料读取失败只记日志；历史读取失败给出提示
    pub async fn load(&self, user_id: &str) -> ProfileView {
        let (profile, history) = futures::join!(
            self.store.fetch_profile(user_id),
            self.store.fetch_tests(user_id)
        );

        let profile = profile.unwrap_or_else(|e| {
            warn!("⚠️ 读取用户资料失败: {}", e);
            None
        });

        let (history, notice) = match history {
            Ok(history) => (history, None),
            Err(e) => {
                error!("❌ 读取测试历史失败: {}", e);
                (
                    Vec::new(),
                    Some(Notice::destructive(
                        "Error loading test history",
                        "Please try again later.",
                    )),
                )
            }
        };

        ProfileView {
            summary: ProgressSummary::from_history(&history),
            profile,
            history,
            notice,
        }
    }
}
