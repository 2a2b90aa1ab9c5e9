//! 托管数据表中的记录（`profiles`、`tests`）

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::question::Question;

/// 未作答在 `student_answers` 中的编码
pub const UNANSWERED: i64 = -1;

/// 用户资料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// 写入 `tests` 表的一次测试结果
///
/// 三个数组列按 JSON 字符串写入
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTestRecord {
    pub user_id: Option<String>,
    pub class: String,
    pub subject: String,
    pub topic: String,
    pub questions: String,
    pub correct_answers: String,
    pub student_answers: String,
    pub score: usize,
    pub total_questions: usize,
}

impl NewTestRecord {
    pub fn encode_answers(answers: &[Option<usize>]) -> Vec<i64> {
        answers
            .iter()
            .map(|a| a.map(|i| i as i64).unwrap_or(UNANSWERED))
            .collect()
    }
}

/// 从 `tests` 表读回的记录
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestRecord {
    #[serde(default)]
    pub id: JsonValue,
    #[serde(default)]
    pub user_id: Option<String>,
    pub class: String,
    pub subject: String,
    pub topic: String,
    #[serde(default)]
    pub questions: JsonValue,
    #[serde(default)]
    pub correct_answers: JsonValue,
    #[serde(default)]
    pub student_answers: JsonValue,
    pub score: u32,
    pub total_questions: u32,
    pub created_at: DateTime<Utc>,
}

impl TestRecord {
    /// 百分比（四舍五入），总题数为 0 时为 0
    pub fn percentage(&self) -> u32 {
        percentage(self.score, self.total_questions)
    }

    /// 达到 70% 视为通过
    pub fn passed(&self) -> bool {
        passed(self.score, self.total_questions)
    }

    pub fn decoded_questions(&self) -> Vec<Question> {
        decode_array(&self.questions)
    }

    pub fn decoded_correct_answers(&self) -> Vec<i64> {
        decode_array(&self.correct_answers)
    }

    /// 学生答案，`-1` 还原为 `None`
    pub fn decoded_student_answers(&self) -> Vec<Option<usize>> {
        decode_array::<i64>(&self.student_answers)
            .into_iter()
            .map(|a| usize::try_from(a).ok())
            .collect()
    }
}

/// 四舍五入的百分比
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(score) / f64::from(total) * 100.0).round() as u32
}

pub fn passed(score: u32, total: u32) -> bool {
    total > 0 && f64::from(score) >= f64::from(total) * 0.7
}

/// 数组列可能是原生 JSON 数组，也可能是 JSON 字符串
fn decode_array<T: DeserializeOwned>(value: &JsonValue) -> Vec<T> {
    let parsed = match value {
        JsonValue::String(raw) => serde_json::from_str::<Vec<T>>(raw),
        other => serde_json::from_value::<Vec<T>>(other.clone()),
    };
    parsed.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(questions: JsonValue, answers: JsonValue) -> TestRecord {
        serde_json::from_value(json!({
            "id": "b3c1",
            "user_id": "u-1",
            "class": "Class 8",
            "subject": "Science",
            "topic": "Energy",
            "questions": questions,
            "correct_answers": "[1,2]",
            "student_answers": answers,
            "score": 1,
            "total_questions": 2,
            "created_at": "2025-03-01T09:30:00.123456+00:00"
        }))
        .unwrap()
    }

    #[test]
    fn answers_decode_from_string_or_array() {
        let from_string = record(JsonValue::Null, json!("[1,-1]"));
        let from_array = record(JsonValue::Null, json!([1, -1]));
        assert_eq!(from_string.decoded_student_answers(), vec![Some(1), None]);
        assert_eq!(from_array.decoded_student_answers(), vec![Some(1), None]);
        assert_eq!(from_string.decoded_correct_answers(), vec![1, 2]);
    }

    #[test]
    fn garbage_columns_decode_to_empty() {
        let r = record(json!("not json"), json!(42));
        assert!(r.decoded_questions().is_empty());
        assert!(r.decoded_student_answers().is_empty());
    }

    #[test]
    fn percentage_rounds_and_handles_zero() {
        assert_eq!(percentage(7, 10), 70);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(0, 0), 0);
        assert!(passed(7, 10));
        assert!(!passed(6, 10));
        assert!(!passed(0, 0));
    }

    #[test]
    fn encode_unanswered_as_minus_one() {
        assert_eq!(
            NewTestRecord::encode_answers(&[Some(2), None, Some(0)]),
            vec![2, -1, 0]
        );
    }
}
