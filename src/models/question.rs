use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// 一道选择题（字段名与 LLM 输出的 JSON 一致，驼峰）
///
/// LLM 常把数字写成字符串（`"id": "1"`），`id` 和 `correctAnswer` 两种写法都接受
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    #[serde(deserialize_with = "number_or_string")]
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    pub fn is_correct(&self, answer: Option<usize>) -> bool {
        answer == Some(self.correct_answer)
    }

    /// 有选项，且正确答案指向其中之一
    pub fn is_well_formed(&self) -> bool {
        self.correct_answer < self.options.len()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    Text(String),
}

fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
{
    match NumberOrString::<T>::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("不是数字: {:?}", s))),
    }
}

/// 题号只用于展示，无法识别时记为 0
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(match NumberOrString::<u32>::deserialize(deserializer) {
        Ok(NumberOrString::Number(n)) => n,
        Ok(NumberOrString::Text(s)) => s.trim().parse().unwrap_or(0),
        Err(_) => 0,
    })
}

/// 学习视频推荐
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyVideo {
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}
