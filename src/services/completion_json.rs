//! 从 LLM 返回的文本中取出 JSON 数组

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::utils::logging::truncate_text;

/// 解析补全内容为 `Vec<T>`
///
/// 接受三种形状：
/// - 裸 JSON 数组
/// - 包在 ```json 代码块里的数组
/// - 形如 `{ "<wrapper_key>": [...] }` 的对象
///
/// 数组里不符合 `T` 的元素会被丢弃；一个都留不下（或根本不是数组）时返回 `None`，
/// 由调用方决定兜底内容。空数组原样返回。
pub fn parse_json_array<T: DeserializeOwned>(content: &str, wrapper_key: &str) -> Option<Vec<T>> {
    let body = strip_code_fence(content);

    let value: JsonValue = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            debug!("补全内容不是合法 JSON ({}): {}", e, truncate_text(body, 80));
            return None;
        }
    };

    let items = match value {
        JsonValue::Array(items) => items,
        JsonValue::Object(mut map) => match map.remove(wrapper_key)? {
            JsonValue::Array(items) => items,
            _ => return None,
        },
        _ => return None,
    };

    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .filter_map(|item| {
            serde_json::from_value(item)
                .map_err(|e| debug!("丢弃不符合预期的元素: {}", e))
                .ok()
        })
        .collect();

    if parsed.len() < total {
        warn!("⚠️ 丢弃了 {} 个无法解析的元素", total - parsed.len());
    }
    if total > 0 && parsed.is_empty() {
        return None;
    }
    Some(parsed)
}

/// 去掉 Markdown 代码块包裹
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Ok(re) = Regex::new(r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```$") else {
        return trimmed;
    };
    match re.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array() {
        let parsed: Option<Vec<u32>> = parse_json_array("[1, 2, 3]", "items");
        assert_eq!(parsed, Some(vec![1, 2, 3]));
    }

    #[test]
    fn fenced_array() {
        let content = "```json\n[\"a\", \"b\"]\n```";
        let parsed: Option<Vec<String>> = parse_json_array(content, "items");
        assert_eq!(parsed, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn wrapped_object() {
        let parsed: Option<Vec<u32>> = parse_json_array(r#"{"items": [4]}"#, "items");
        assert_eq!(parsed, Some(vec![4]));
        let wrong_key: Option<Vec<u32>> = parse_json_array(r#"{"other": [4]}"#, "items");
        assert_eq!(wrong_key, None);
    }

    #[test]
    fn prose_is_rejected() {
        let parsed: Option<Vec<u32>> =
            parse_json_array("Here are some great videos for you!", "items");
        assert_eq!(parsed, None);
    }

    #[test]
    fn malformed_items_are_dropped() {
        let parsed: Option<Vec<u32>> = parse_json_array(r#"[1, "two", 3]"#, "items");
        assert_eq!(parsed, Some(vec![1, 3]));
    }

    #[test]
    fn all_malformed_is_rejected_but_empty_is_kept() {
        let parsed: Option<Vec<u32>> = parse_json_array(r#"["a", "b"]"#, "items");
        assert_eq!(parsed, None);
        let empty: Option<Vec<u32>> = parse_json_array("[]", "items");
        assert_eq!(empty, Some(Vec::new()));
    }
}
