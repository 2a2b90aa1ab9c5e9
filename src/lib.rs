//! # Study Portal
//!
//! 学生学习平台的后端：AI 出题、学习视频推荐、AI 答疑，以及配套的客户端流程
//!
//! ## 架构设计
//!
//! ### ① 能力层（Services）
//! - `services/` - 描述"我能做什么"，每个服务只做一件事
//! - `LlmService` - 调用补全接口
//! - `QuestionGenerator` / `StudyMaterialService` / `TutorService` - 提示词 + 解析 + 兜底
//!
//! ### ② 接口层（Api）
//! - `api/` - 把能力包装成云函数 HTTP 接口
//!
//! ### ③ 客户端（Clients）
//! - `clients/` - 托管后端的数据表、认证、云函数调用
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 仪表盘上每个操作的完整流程
//! - `TestSession` - 测试状态机（翻页、倒计时、计分）
//! - `TestFlow` - 出题 → 作答 → 提交 → 保存
//!
//! ## 模块结构

pub mod api;
pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Question, StudySelection, StudyVideo};
pub use workflow::{TestFlow, TestSession};
