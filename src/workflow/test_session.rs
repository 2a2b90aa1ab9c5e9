//! 一次测试的状态机
//!
//! 状态：Idle → Running → Finished → (reset) Idle
//!
//! - `Running` 时才能作答、翻页、倒计时
//! - 提交只会发生一次：手动提交、最后一题"下一题"、倒计时归零三者谁先到算谁
//! - 作答记录按题目下标保存，`None` 表示未作答

use serde::Serialize;

use crate::error::BusinessError;
use crate::models::record::{passed, percentage};
use crate::models::{Question, StudySelection};
use crate::utils::logging::format_duration;

/// 默认时长：10 分钟
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 600;
/// 剩余时间少于这个值时高亮显示
pub const URGENT_THRESHOLD_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Finished,
}

/// 提交是怎么触发的
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitReason {
    Manual,
    LastQuestion,
    TimeUp,
}

/// 翻到下一题的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Moved { index: usize },
    Submitted(TestOutcome),
}

/// 单题回顾
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionReview {
    pub number: usize,
    pub question: Question,
    pub answer: Option<usize>,
    pub is_correct: bool,
}

/// 测试结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestOutcome {
    pub selection: StudySelection,
    pub questions: Vec<Question>,
    pub answers: Vec<Option<usize>>,
    pub score: usize,
    pub total_questions: usize,
    pub reason: SubmitReason,
}

impl TestOutcome {
    pub fn correct_answers(&self) -> Vec<usize> {
        self.questions.iter().map(|q| q.correct_answer).collect()
    }

    pub fn percentage(&self) -> u32 {
        percentage(self.score as u32, self.total_questions as u32)
    }

    /// 达到 70% 显示为通过
    pub fn passed(&self) -> bool {
        passed(self.score as u32, self.total_questions as u32)
    }

    pub fn review(&self) -> Vec<QuestionReview> {
        review(&self.questions, &self.answers)
    }

    pub fn summary_line(&self) -> String {
        format!(
            "You scored {}/{} ({}%)",
            self.score,
            self.total_questions,
            self.percentage()
        )
    }
}

/// 按下标逐题对照答案
pub fn review(questions: &[Question], answers: &[Option<usize>]) -> Vec<QuestionReview> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let answer = answers.get(i).copied().flatten();
            QuestionReview {
                number: i + 1,
                question: q.clone(),
                answer,
                is_correct: q.is_correct(answer),
            }
        })
        .collect()
}

/// 得分 = 作答与正确答案下标一致的题数
pub fn score(questions: &[Question], answers: &[Option<usize>]) -> usize {
    questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| q.is_correct(**a))
        .count()
}

/// 一次测试
#[derive(Debug, Clone)]
pub struct TestSession {
    state: SessionState,
    selection: StudySelection,
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    current: usize,
    selected: Option<usize>,
    time_limit: u32,
    time_left: u32,
    outcome: Option<TestOutcome>,
    /// 每次 `start` / `reset` 加一，倒计时据此判断自己是否过期
    generation: u64,
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_LIMIT_SECS)
    }
}

impl TestSession {
    /// 时长至少 1 秒，否则倒计时永远不会触发提交
    pub fn new(time_limit: u32) -> Self {
        let time_limit = time_limit.max(1);
        Self {
            state: SessionState::Idle,
            selection: StudySelection::default(),
            questions: Vec::new(),
            answers: Vec::new(),
            current: 0,
            selected: None,
            time_limit,
            time_left: time_limit,
            outcome: None,
            generation: 0,
        }
    }

    /// 开始一次新测试（会覆盖当前状态）
    pub fn start(
        &mut self,
        selection: StudySelection,
        questions: Vec<Question>,
    ) -> Result<(), BusinessError> {
        if questions.is_empty() {
            return Err(BusinessError::EmptyQuestionSet);
        }
        self.answers = vec![None; questions.len()];
        self.questions = questions;
        self.selection = selection;
        self.current = 0;
        self.selected = None;
        self.time_left = self.time_limit;
        self.outcome = None;
        self.state = SessionState::Running;
        self.generation += 1;
        Ok(())
    }

    // ========== 查询 ==========

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selection(&self) -> &StudySelection {
        &self.selection
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.is_running() {
            self.questions.get(self.current)
        } else {
            None
        }
    }

    pub fn selected_answer(&self) -> Option<usize> {
        self.selected
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.is_running() && self.current > 0
    }

    pub fn can_advance(&self) -> bool {
        self.is_running() && self.selected.is_some()
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// `m:ss`
    pub fn time_label(&self) -> String {
        format_duration(self.time_left)
    }

    pub fn is_time_urgent(&self) -> bool {
        self.time_left < URGENT_THRESHOLD_SECS
    }

    /// 进度百分比：(当前题号) / 总题数
    pub fn progress_percent(&self) -> f64 {
        if self.questions.is_empty() {
            0.0
        } else {
            (self.current + 1) as f64 / self.questions.len() as f64 * 100.0
        }
    }

    pub fn outcome(&self) -> Option<&TestOutcome> {
        self.outcome.as_ref()
    }

    // ========== 操作 ==========

    /// 选中当前题的某个选项（尚未确认）
    pub fn select_answer(&mut self, index: usize) -> Result<(), BusinessError> {
        let question = self
            .current_question()
            .ok_or(BusinessError::TestNotRunning)?;
        if index >= question.options.len() {
            return Err(BusinessError::AnswerOutOfRange {
                index,
                max_index: question.options.len().saturating_sub(1),
            });
        }
        self.selected = Some(index);
        Ok(())
    }

    /// 确认当前选择并翻到下一题；最后一题时提交
    pub fn next(&mut self) -> Result<Advance, BusinessError> {
        if !self.is_running() {
            return Err(BusinessError::TestNotRunning);
        }
        if self.selected.is_none() {
            return Err(BusinessError::NoAnswerSelected);
        }
        self.commit_selection();

        if self.is_last_question() {
            return self.finish(SubmitReason::LastQuestion).map(Advance::Submitted);
        }

        self.current += 1;
        self.selected = self.answers[self.current];
        Ok(Advance::Moved {
            index: self.current,
        })
    }

    /// 回到上一题，第一题时不动
    pub fn previous(&mut self) -> Result<usize, BusinessError> {
        if !self.is_running() {
            return Err(BusinessError::TestNotRunning);
        }
        if self.current > 0 {
            self.commit_selection();
            self.current -= 1;
            self.selected = self.answers[self.current];
        }
        Ok(self.current)
    }

    /// 倒计时走一秒；归零时自动提交并返回结果
    pub fn tick(&mut self) -> Option<TestOutcome> {
        if !self.is_running() || self.time_left == 0 {
            return None;
        }
        self.time_left -= 1;
        if self.time_left == 0 {
            return self.finish(SubmitReason::TimeUp).ok();
        }
        None
    }

    /// 手动提交
    pub fn submit(&mut self) -> Result<TestOutcome, BusinessError> {
        self.finish(SubmitReason::Manual)
    }

    /// 回到初始状态
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self::new(self.time_limit);
        self.generation = generation;
    }

    fn commit_selection(&mut self) {
        if let Some(answer) = self.selected {
            self.answers[self.current] = Some(answer);
        }
    }

    fn finish(&mut self, reason: SubmitReason) -> Result<TestOutcome, BusinessError> {
        if !self.is_running() {
            return Err(BusinessError::TestNotRunning);
        }
        self.commit_selection();

        let outcome = TestOutcome {
            selection: self.selection.clone(),
            questions: self.questions.clone(),
            answers: self.answers.clone(),
            score: score(&self.questions, &self.answers),
            total_questions: self.questions.len(),
            reason,
        };

        self.state = SessionState::Finished;
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }
}
