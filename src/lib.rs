//! # Quiz Lens
//!
//! 在 Moodle 测验页面上自动识别题目、查询答案并标注到页面上的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//! - `PageBridge` - 页面快照、补丁写回、页脚按钮监听
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单道题
//! - `classifier` / `extractor` - 题型识别与题目抽取
//! - `reconciler` / `annotation` - 答案近似匹配与页面标注
//! - `LlmService` / `StaticDataset` - 答案来源
//! - `SettingsStore` - 设置持久化
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个页面"的处理流程
//! - `PageSession` - 页面会话上下文（每道题的状态 + 汇总区域原始内容）
//! - `ContentFlow` - 扫描 → 请求 → 回填，以及设置变化时的清除与重新处理
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 主循环，管理浏览器、定时器和通道
//! - `orchestrator/answer_worker` - 答案服务，持有 API Key
//!
//! `dom/` 是页面文档的内存表示，上面各层的纯逻辑都只操作它，可以脱离浏览器测试。
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod dom;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::connect_to_browser_and_page;
pub use config::Config;
pub use dom::Document;
pub use error::{AppError, AppResult};
pub use infrastructure::{JsExecutor, PageBridge};
pub use models::{Question, QuestionType, Settings};
pub use orchestrator::{AnswerWorker, App};
pub use workflow::{AnswerRequest, ContentFlow, PageEvent, PageSession};
