//! 数据表客户端（REST 接口：`{supabase_url}/rest/v1/{table}`）

use reqwest::Client;
use tracing::{debug, info};

use crate::clients::rest::{self, BackendCredentials};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{NewTestRecord, Profile, TestRecord};

const PROFILES: &str = "profiles";
const TESTS: &str = "tests";

/// 数据表客户端
#[derive(Clone)]
pub struct TableStore {
    http: Client,
    rest_url: String,
    credentials: BackendCredentials,
}

impl TableStore {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            rest_url: format!("{}/rest/v1", config.supabase_url.trim_end_matches('/')),
            credentials: BackendCredentials::new(config),
        }
    }

    /// 以登录用户身份访问（行级权限依赖这个 token）
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.credentials.access_token = Some(token.into());
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    /// 读取用户资料，不存在时返回 `None`
    pub async fn fetch_profile(&self, user_id: &str) -> AppResult<Option<Profile>> {
        let endpoint = self.table_url(PROFILES);
        let request = self.credentials.apply(self.http.get(&endpoint)).query(&[
            ("select", "*".to_string()),
            ("user_id", format!("eq.{}", user_id)),
            ("limit", "1".to_string()),
        ]);

        let rows: Vec<Profile> = rest::send_json(&endpoint, request).await?;
        Ok(rows.into_iter().next())
    }

    /// 读取某个用户的测试记录，新的在前
    pub async fn fetch_tests(&self, user_id: &str) -> AppResult<Vec<TestRecord>> {
        let endpoint = self.table_url(TESTS);
        let request = self.credentials.apply(self.http.get(&endpoint)).query(&[
            ("select", "*".to_string()),
            ("user_id", format!("eq.{}", user_id)),
            ("order", "created_at.desc".to_string()),
        ]);

        let rows: Vec<TestRecord> = rest::send_json(&endpoint, request).await?;
        debug!("读取到 {} 条测试记录", rows.len());
        Ok(rows)
    }

    /// 写入一条测试结果
    pub async fn insert_test(&self, record: &NewTestRecord) -> AppResult<()> {
        let endpoint = self.table_url(TESTS);
        let request = self
            .credentials
            .apply(self.http.post(&endpoint))
            .header("Prefer", "return=minimal")
            .json(record);

        rest::send(&endpoint, request).await?;
        info!(
            "✓ 测试结果已保存: {} - {} ({}/{})",
            record.subject, record.topic, record.score, record.total_questions
        );
        Ok(())
    }
}
