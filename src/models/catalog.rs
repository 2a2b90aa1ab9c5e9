//! 班级 / 科目 / 知识点目录

use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::error::BusinessError;

/// 可选班级
pub const CLASSES: &[&str] = &[
    "Class 6", "Class 7", "Class 8", "Class 9", "Class 10", "Class 11", "Class 12",
];

/// 可选科目（保持下拉框中的顺序）
pub const SUBJECTS: &[&str] = &[
    "Mathematics",
    "Science",
    "English",
    "History",
    "Geography",
    "Physics",
    "Chemistry",
    "Biology",
];

const MATHEMATICS: &[&str] = &["Algebra", "Geometry", "Trigonometry", "Calculus", "Statistics"];
const SCIENCE: &[&str] = &["Forces and Motion", "Energy", "Matter", "Life Processes", "Genetics"];
const ENGLISH: &[&str] = &["Grammar", "Literature", "Writing Skills", "Comprehension", "Poetry"];
const HISTORY: &[&str] = &[
    "Ancient History",
    "Medieval History",
    "Modern History",
    "World Wars",
    "Independence Movement",
];
const GEOGRAPHY: &[&str] = &[
    "Physical Geography",
    "Human Geography",
    "Economic Geography",
    "Environmental Geography",
];
const PHYSICS: &[&str] = &["Mechanics", "Thermodynamics", "Optics", "Electricity", "Modern Physics"];
const CHEMISTRY: &[&str] = &[
    "Atomic Structure",
    "Chemical Bonding",
    "Acids and Bases",
    "Organic Chemistry",
    "Inorganic Chemistry",
];
const BIOLOGY: &[&str] = &["Cell Biology", "Genetics", "Evolution", "Ecology", "Human Physiology"];

/// 科目 → 知识点
static TOPICS: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "Mathematics" => MATHEMATICS,
    "Science" => SCIENCE,
    "English" => ENGLISH,
    "History" => HISTORY,
    "Geography" => GEOGRAPHY,
    "Physics" => PHYSICS,
    "Chemistry" => CHEMISTRY,
    "Biology" => BIOLOGY,
};

/// 某科目下的知识点，未知科目返回 `None`
pub fn topics_for(subject: &str) -> Option<&'static [&'static str]> {
    TOPICS.get(subject).copied()
}

/// 完整目录（`GET /catalog` 的响应体）
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub classes: Vec<&'static str>,
    pub subjects: Vec<&'static str>,
    pub topics: Vec<SubjectTopics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectTopics {
    pub subject: &'static str,
    pub topics: Vec<&'static str>,
}

impl Catalog {
    pub fn load() -> Self {
        Self {
            classes: CLASSES.to_vec(),
            subjects: SUBJECTS.to_vec(),
            topics: SUBJECTS
                .iter()
                .map(|&subject| SubjectTopics {
                    subject,
                    topics: topics_for(subject).unwrap_or_default().to_vec(),
                })
                .collect(),
        }
    }
}

/// 用户选择的 班级 + 科目 + 知识点
///
/// 字段名 `class` 与云函数请求体保持一致
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySelection {
    pub class: String,
    pub subject: String,
    pub topic: String,
}

impl StudySelection {
    pub fn new(
        class: impl Into<String>,
        subject: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            subject: subject.into(),
            topic: topic.into(),
        }
    }

    /// 三个字段都填写了才算完整
    pub fn is_complete(&self) -> bool {
        [&self.class, &self.subject, &self.topic]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), BusinessError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(BusinessError::IncompleteSelection)
        }
    }

    /// 是否来自内置目录（云函数本身不要求这一点）
    pub fn is_in_catalog(&self) -> bool {
        CLASSES.contains(&self.class.as_str())
            && topics_for(&self.subject).is_some_and(|topics| topics.contains(&self.topic.as_str()))
    }
}

impl std::fmt::Display for StudySelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} / {}", self.class, self.subject, self.topic)
    }
}
