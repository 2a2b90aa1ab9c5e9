use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 云函数服务监听地址
    pub server_addr: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 托管后端配置 ---
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// 云函数地址，未设置时使用 `{supabase_url}/functions/v1`
    pub functions_base_url: Option<String>,
    // --- 测试配置 ---
    /// 每套测试的题目数量
    pub test_question_count: usize,
    /// 测试时长（秒）
    pub test_time_limit_secs: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "0.0.0.0:8000".to_string(),
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: String::new(),
            functions_base_url: None,
            test_question_count: 10,
            test_time_limit_secs: 600,
        }
    }
}

impl Config {
    /// 只从环境变量读取（以默认值为基础）
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// 读取配置：默认值 → TOML 文件（`CONFIG_FILE`，可选）→ 环境变量
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::from_toml_file(&path)?,
            Err(_) => Self::default(),
        };
        base.with_env_overrides()
    }

    /// 从 TOML 文件读取，缺省字段取默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileLoadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })?;
        Self::from_toml_str(&content).map_err(|e| {
            ConfigError::FileLoadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            }
            .into()
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn with_env_overrides(self) -> AppResult<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// 用 `lookup` 提供的值覆盖配置；数值或布尔值无法解析时报错
    fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let env = &lookup;

        Ok(Self {
            server_addr: env("SERVER_ADDR").unwrap_or(self.server_addr),
            verbose_logging: parsed(env, "VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
            llm_api_key: env("LLM_API_KEY")
                .or_else(|| env("OPENAI_API_KEY"))
                .unwrap_or(self.llm_api_key),
            llm_api_base_url: env("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: env("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            supabase_url: env("SUPABASE_URL").unwrap_or(self.supabase_url),
            supabase_anon_key: env("SUPABASE_ANON_KEY").unwrap_or(self.supabase_anon_key),
            functions_base_url: env("FUNCTIONS_BASE_URL").or(self.functions_base_url),
            test_question_count: parsed(env, "TEST_QUESTION_COUNT", "usize")?
                .unwrap_or(self.test_question_count),
            test_time_limit_secs: parsed(env, "TEST_TIME_LIMIT_SECS", "u32")?
                .unwrap_or(self.test_time_limit_secs),
        })
    }

    /// 云函数的基础地址
    pub fn functions_url(&self) -> String {
        match &self.functions_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}/functions/v1", self.supabase_url.trim_end_matches('/')),
        }
    }
}

/// 读取并解析一个变量；未设置时返回 `None`
fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var_name: &str,
    expected_type: &str,
) -> AppResult<Option<T>> {
    let Some(value) = lookup(var_name) else {
        return Ok(None);
    };
    match value.trim().parse() {
        Ok(parsed) => Ok(Some(parsed)),
        Err(_) => Err(ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::error::AppError;

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config = Config::from_toml_str(
            r#"
            llm_model_name = "gpt-4o"
            supabase_url = "https://demo.supabase.co/"
            "#,
        )
        .unwrap();

        assert_eq!(config.llm_model_name, "gpt-4o");
        assert_eq!(config.test_question_count, 10);
        assert_eq!(config.test_time_limit_secs, 600);
        assert_eq!(
            config.functions_url(),
            "https://demo.supabase.co/functions/v1"
        );
    }

    #[test]
    fn explicit_functions_url_wins() {
        let config = Config {
            functions_base_url: Some("http://127.0.0.1:9000/functions/v1/".into()),
            ..Config::default()
        };
        assert_eq!(config.functions_url(), "http://127.0.0.1:9000/functions/v1");
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = Config::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("配置错误"));
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn numeric_overrides_are_parsed() {
        let config = Config::default()
            .with_overrides(lookup(&[
                ("TEST_TIME_LIMIT_SECS", "300"),
                ("TEST_QUESTION_COUNT", "5"),
                ("VERBOSE_LOGGING", "true"),
                ("OPENAI_API_KEY", "sk-alias"),
            ]))
            .unwrap();

        assert_eq!(config.test_time_limit_secs, 300);
        assert_eq!(config.test_question_count, 5);
        assert!(config.verbose_logging);
        assert_eq!(config.llm_api_key, "sk-alias");
        assert_eq!(config.llm_model_name, "gpt-4o-mini");
    }

    #[test]
    fn bad_number_is_reported_with_variable_name() {
        let err = Config::default()
            .with_overrides(lookup(&[("TEST_TIME_LIMIT_SECS", "ten minutes")]))
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Config(ConfigError::EnvVarParseFailed { ref var_name, .. })
                if var_name == "TEST_TIME_LIMIT_SECS"
        ));
        assert!(err.to_string().contains("ten minutes"));
    }
}
