//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层持有浏览器、设置和通道，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用主循环
//! - 管理应用生命周期（初始化、运行、清理）
//! - 定时扫描页面、挂载页脚按钮监听
//! - 把答案服务的事件回填到页面
//!
//! ### `answer_worker` - 答案服务
//! - 接收答案请求，查询补全服务或静态题库
//! - 通过事件通道把结果发回页面
//! - 维护面板状态
//!
//! ## 层次关系
//!
//! ```text
//! app (页面快照 / 补丁 / 定时器)
//!     ↓                    ↑ PageEvent
//! workflow::ContentFlow → answer_worker
//!     ↓                    ↓
//! services (抽取 / 回填)   services (补全 / 题库)
//!     ↓
//! infrastructure (PageBridge / JsExecutor)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有 Browser 和设置存储
//! 2. **消息传递**：页面一侧与答案服务之间只传递自有数据
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure

pub mod answer_worker;
pub mod app;

pub use answer_worker::AnswerWorker;
pub use app::App;
