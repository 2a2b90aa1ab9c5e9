//! 出题服务：`generate-test` 云函数背后的能力

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::AppResult;
use crate::models::{Question, StudySelection};
use crate::services::completion_json::parse_json_array;
use crate::services::llm_service::{CompletionOptions, LlmService};

const SYSTEM_PROMPT_TEMPLATE: &str = "You are an educational assessment creator. Generate exactly {count} multiple-choice questions with 4 options each, correct answer index (0-3), and explanations. Return valid JSON only.";

const OPTIONS: CompletionOptions = CompletionOptions {
    max_tokens: 2000,
    temperature: 0.7,
};

/// 出题服务
pub struct QuestionGenerator {
    llm: Arc<LlmService>,
    question_count: usize,
}

impl QuestionGenerator {
    pub fn new(llm: Arc<LlmService>, question_count: usize) -> Self {
        Self {
            llm,
            question_count,
        }
    }

    /// 生成一套选择题
    ///
    /// LLM 调用失败会返回错误；返回内容无法解析时使用兜底题目。
    pub async fn generate(&self, selection: &StudySelection) -> AppResult<Vec<Question>> {
        let (user_message, system_message) = self.build_messages(selection);

        let content = self
            .llm
            .send_to_llm(&user_message, Some(&system_message), OPTIONS)
            .await?;

        let questions = parse_json_array::<Question>(&content, "questions").map(|questions| {
            questions
                .into_iter()
                .filter(Question::is_well_formed)
                .collect::<Vec<_>>()
        });

        match questions {
            Some(questions) if !questions.is_empty() => {
                info!("✓ 已生成 {} 道题目 ({})", questions.len(), selection);
                Ok(questions)
            }
            _ => {
                warn!("⚠️ 无法解析 LLM 返回的题目，使用兜底题目 ({})", selection);
                Ok(fallback_questions(&selection.topic))
            }
        }
    }

    /// 返回 (user_message, system_message)
    fn build_messages(&self, selection: &StudySelection) -> (String, String) {
        let count = self.question_count;
        let system_message = SYSTEM_PROMPT_TEMPLATE.replace("{count}", &count.to_string());
        let user_message = format!(
            r#"Create {count} multiple-choice questions for {} students on {} - {}. Format: [{{"id":1,"question":"...","options":["A","B","C","D"],"correctAnswer":0,"explanation":"..."}}]"#,
            selection.class, selection.subject, selection.topic
        );
        (user_message, system_message)
    }
}

/// 解析失败时的兜底题目
pub fn fallback_questions(topic: &str) -> Vec<Question> {
    vec![Question {
        id: 1,
        question: format!("What is a key concept in {}?", topic),
        options: ["Option A", "Option B", "Option C", "Option D"]
            .iter()
            .map(|o| o.to_string())
            .collect(),
        correct_answer: 0,
        explanation: format!("This is a fundamental concept in {}.", topic),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn prompt_mentions_selection_and_count() {
        let generator = QuestionGenerator::new(Arc::new(LlmService::new(&Config::default())), 10);
        let (user, system) =
            generator.build_messages(&StudySelection::new("Class 10", "Chemistry", "Acids and Bases"));

        assert!(system.contains("exactly 10 multiple-choice"));
        assert!(user.starts_with(
            "Create 10 multiple-choice questions for Class 10 students on Chemistry - Acids and Bases."
        ));
        assert!(user.contains(r#""correctAnswer":0"#));
    }

    #[test]
    fn fallback_is_single_placeholder() {
        let questions = fallback_questions("Optics");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "What is a key concept in Optics?");
        assert_eq!(questions[0].options.len(), 4);
        assert_eq!(questions[0].correct_answer, 0);
    }
}
