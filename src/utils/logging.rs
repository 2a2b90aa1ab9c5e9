/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;

/// 记录服务启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 服务启动 - 云函数模式");
    info!("🌐 监听地址: {}", config.server_addr);
    info!("🤖 LLM 模型: {}", config.llm_model_name);
    info!(
        "📝 每套测试 {} 题，限时 {}",
        config.test_question_count,
        format_duration(config.test_time_limit_secs)
    );
    if config.llm_api_key.is_empty() {
        info!("⚠️ 未配置 LLM_API_KEY，调用 LLM 将会失败");
    }
    info!("{}", "=".repeat(60));
}

/// 把秒数格式化成 `m:ss`
///
/// 这也是测试倒计时的显示格式
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_pads_seconds() {
        assert_eq!(format_duration(600), "10:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(61), "1:01");
        assert_eq!(format_duration(0), "0:00");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("光合作用的原理", 4), "光合作用...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
