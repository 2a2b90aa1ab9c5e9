//! 测试流程 - 流程层
//!
//! 出题 → 作答 → 提交（手动 / 最后一题 / 倒计时）→ 保存一条记录

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{error, info, warn};

use crate::clients::{FunctionsClient, TableStore};
use crate::error::AppResult;
use crate::models::{NewTestRecord, Notice, StudySelection};
use crate::workflow::test_session::{Advance, TestOutcome, TestSession};

/// 测试流程
///
/// - 持有当前测试的状态机（`Arc<Mutex<_>>`，倒计时任务共享同一份）
/// - 同一时刻只有一个倒计时任务；换题或重置时旧任务被取消
/// - 出题走云函数，保存走数据表
/// - 保存失败只记日志，不影响用户看到的结果
#[derive(Clone)]
pub struct TestFlow {
    functions: FunctionsClient,
    store: TableStore,
    session: Arc<Mutex<TestSession>>,
    countdown: Arc<std::sync::Mutex<Option<AbortHandle>>>,
    user_id: Option<String>,
}

impl TestFlow {
    pub fn new(functions: FunctionsClient, store: TableStore, time_limit_secs: u32) -> Self {
        Self {
            functions,
            store,
            session: Arc::new(Mutex::new(TestSession::new(time_limit_secs))),
            countdown: Arc::new(std::sync::Mutex::new(None)),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn session(&self) -> Arc<Mutex<TestSession>> {
        Arc::clone(&self.session)
    }

    /// 出题并开始测试
    pub async fn generate(&self, selection: StudySelection) -> Notice {
        if selection.validate().is_err() {
            return Notice::destructive(
                "Please select all fields",
                "Select class, subject, and topic to generate a test.",
            );
        }

        info!("📝 正在生成测试: {}", selection);
        let questions = match self.functions.generate_test(&selection).await {
            Ok(questions) => questions,
            Err(e) => {
                error!("❌ 生成测试失败: {}", e);
                return generate_failed();
            }
        };

        self.stop_countdown();
        let count = questions.len();
        let topic = selection.topic.clone();
        if let Err(e) = self.session.lock().await.start(selection, questions) {
            error!("❌ 无法开始测试: {}", e);
            return generate_failed();
        }

        Notice::info(
            "Test generated!",
            format!("{} questions ready for {}", count, topic),
        )
    }

    pub async fn select_answer(&self, index: usize) -> AppResult<()> {
        self.session.lock().await.select_answer(index)?;
        Ok(())
    }

    /// 下一题；最后一题时提交并返回提示
    pub async fn next(&self) -> AppResult<Option<Notice>> {
        let advance = self.session.lock().await.next()?;
        match advance {
            Advance::Moved { .. } => Ok(None),
            Advance::Submitted(outcome) => Ok(Some(self.complete(&outcome).await)),
        }
    }

    pub async fn previous(&self) -> AppResult<usize> {
        Ok(self.session.lock().await.previous()?)
    }

    /// 手动提交
    pub async fn submit(&self) -> AppResult<Notice> {
        let outcome = self.session.lock().await.submit()?;
        Ok(self.complete(&outcome).await)
    }

    pub async fn reset(&self) {
        self.stop_countdown();
        self.session.lock().await.reset();
    }

    /// 倒计时，每个 `period` 走一秒
    ///
    /// 只对开始时的那一次测试生效：时间到自动提交并返回提示；
    /// 测试提前结束（手动提交、重置或换了新测试）时返回 `None`
    pub async fn run_countdown(&self, period: Duration) -> Option<Notice> {
        let generation = self.session.lock().await.generation();
        let mut interval = tokio::time::interval(period);
        interval.tick().await;

        loop {
            interval.tick().await;
            let fired = {
                let mut session = self.session.lock().await;
                if session.generation() != generation || !session.is_running() {
                    return None;
                }
                session.tick()
            };
            if let Some(outcome) = fired {
                warn!("⏰ 时间到，自动提交");
                return Some(self.complete(&outcome).await);
            }
        }
    }

    /// 在后台运行倒计时，并取消之前的倒计时任务
    pub fn spawn_countdown(&self, period: Duration) -> JoinHandle<Option<Notice>> {
        let flow = self.clone();
        let handle = tokio::spawn(async move { flow.run_countdown(period).await });
        if let Ok(mut current) = self.countdown.lock() {
            if let Some(previous) = current.replace(handle.abort_handle()) {
                previous.abort();
            }
        }
        handle
    }

    fn stop_countdown(&self) {
        if let Ok(mut current) = self.countdown.lock() {
            if let Some(previous) = current.take() {
                previous.abort();
            }
        }
    }

    async fn complete(&self, outcome: &TestOutcome) -> Notice {
        info!(
            "✓ 测试完成: {} ({}/{})",
            outcome.selection, outcome.score, outcome.total_questions
        );
        self.save(outcome).await;
        Notice::info("Test submitted!", outcome.summary_line())
    }

    async fn save(&self, outcome: &TestOutcome) {
        let record = match self.build_record(outcome) {
            Ok(record) => record,
            Err(e) => {
                error!("❌ 无法序列化测试结果: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.insert_test(&record).await {
            error!("❌ 保存测试结果失败: {}", e);
        }
    }

    fn build_record(&self, outcome: &TestOutcome) -> AppResult<NewTestRecord> {
        Ok(NewTestRecord {
            user_id: self.user_id.clone(),
            class: outcome.selection.class.clone(),
            subject: outcome.selection.subject.clone(),
            topic: outcome.selection.topic.clone(),
            questions: serde_json::to_string(&outcome.questions)?,
            correct_answers: serde_json::to_string(&outcome.correct_answers())?,
            student_answers: serde_json::to_string(&NewTestRecord::encode_answers(
                &outcome.answers,
            ))?,
            score: outcome.score,
            total_questions: outcome.total_questions,
        })
    }
}

fn generate_failed() -> Notice {
    Notice::destructive("Error generating test", "Please try again later.")
}
