//! 答案服务 - 编排层
//!
//! ## 职责
//!
//! 接收页面发来的 [`AnswerRequest`]，向补全服务或静态题库要答案，
//! 再把结果以 [`PageEvent`] 发回页面。
//!
//! - 收到请求后立即发出 `ShowLoading`，再开始任何异步工作
//! - 每个请求在独立的 tokio 任务中执行，不重试
//! - 持有 API Key 等敏感设置，页面一侧只拿到答案
//! - 最近一次问答通过 watch 通道对外暴露（面板状态）

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, CompletionError};
use crate::models::{AnswerSource, CompletionAnswer, PanelState, Settings};
use crate::services::{LlmService, StaticDataset};
use crate::utils::truncate_text;
use crate::workflow::{AnswerRequest, PageEvent};

/// 题库中找不到题目时的说明
pub const DATASET_MISS_EXPLANATION: &str = "No matching question in the bundled dataset.";

pub struct AnswerWorker {
    config: Arc<Config>,
    settings: watch::Receiver<Settings>,
    events: mpsc::UnboundedSender<PageEvent>,
    panel: Arc<watch::Sender<PanelState>>,
    dataset: Option<Arc<StaticDataset>>,
}

impl AnswerWorker {
    pub fn new(
        config: Arc<Config>,
        settings: watch::Receiver<Settings>,
        events: mpsc::UnboundedSender<PageEvent>,
    ) -> Self {
        let (panel, _) = watch::channel(PanelState::default());
        Self {
            config,
            settings,
            events,
            panel: Arc::new(panel),
            dataset: None,
        }
    }

    pub fn with_dataset(mut self, dataset: StaticDataset) -> Self {
        self.dataset = Some(Arc::new(dataset));
        self
    }

    /// 尝试加载配置中的静态题库，文件不存在或无法解析时不使用题库
    pub async fn load_dataset(self) -> Self {
        let path = Path::new(&self.config.dataset_file);
        if !path.exists() {
            debug!("静态题库不存在: {}", path.display());
            return self;
        }
        match StaticDataset::load(path).await {
            Ok(dataset) => self.with_dataset(dataset),
            Err(e) => {
                warn!("⚠️ 静态题库加载失败，忽略: {}", e);
                self
            }
        }
    }

    /// 订阅面板状态
    pub fn panel(&self) -> watch::Receiver<PanelState> {
        self.panel.subscribe()
    }

    /// 处理一个答案请求
    ///
    /// 同步发出加载提示和面板状态，然后在后台任务中查询答案。
    pub fn handle(&self, request: AnswerRequest) -> JoinHandle<()> {
        if self.events.send(PageEvent::ShowLoading).is_err() {
            debug!("页面一侧已关闭，加载提示未送达");
        }
        self.panel.send_replace(PanelState::loading(
            request.transcript.as_str(),
            request.question_type,
        ));

        let settings = self.settings.borrow().clone();
        let job = AnswerJob {
            config: Arc::clone(&self.config),
            events: self.events.clone(),
            panel: Arc::clone(&self.panel),
            dataset: self.dataset.clone(),
        };
        tokio::spawn(async move { job.run(request, settings).await })
    }
}

/// 一次请求在后台任务中需要的全部资源
struct AnswerJob {
    config: Arc<Config>,
    events: mpsc::UnboundedSender<PageEvent>,
    panel: Arc<watch::Sender<PanelState>>,
    dataset: Option<Arc<StaticDataset>>,
}

impl AnswerJob {
    async fn run(self, request: AnswerRequest, settings: Settings) {
        if !settings.is_enabled {
            return;
        }
        let question = request.transcript.as_str();

        match self.resolve(&request, &settings).await {
            Ok(answer) => {
                info!(
                    "✓ {} 得到 {} 个答案: {}",
                    request,
                    answer.answers.len(),
                    truncate_text(&answer.answers.join(" | "), 80)
                );
                self.panel.send_replace(PanelState::answered(
                    question,
                    request.question_type,
                    &answer,
                ));
                if settings.is_background && !answer.answers.is_empty() {
                    let event = PageEvent::HighlightAnswers {
                        question_id: request.question_id.clone(),
                        question_type: request.question_type,
                        answers: answer.answers,
                    };
                    if self.events.send(event).is_err() {
                        debug!("页面一侧已关闭，丢弃 {} 的答案", request);
                    }
                }
            }
            Err(AppError::Completion(CompletionError::MissingApiKey { provider })) => {
                error!("❌ 服务商 {} 未配置 API Key，跳过 {}", provider, request);
            }
            Err(e) => {
                error!("❌ {} 查询答案失败: {}", request, e);
                self.panel.send_replace(PanelState::failed(
                    question,
                    request.question_type,
                    &e.user_message(),
                ));
            }
        }
    }

    async fn resolve(&self, request: &AnswerRequest, settings: &Settings) -> AppResult<CompletionAnswer> {
        match settings.answer_source {
            AnswerSource::Completion => {
                let service = LlmService::from_settings(&self.config, settings)?;
                info!(
                    "🤖 {} 询问 {} ({})",
                    request,
                    service.provider(),
                    service.model_name()
                );
                service.ask(&request.transcript).await
            }
            AnswerSource::Dataset => {
                let answer = self
                    .dataset
                    .as_ref()
                    .and_then(|dataset| dataset.answer_for(&request.prompt));
                Ok(answer.unwrap_or_else(|| {
                    warn!("⚠️ 题库中没有 {}", request);
                    CompletionAnswer {
                        answers: Vec::new(),
                        explanation: DATASET_MISS_EXPLANATION.to_string(),
                    }
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::models::{QuestionType, Transcript};

    const DATASET: &str = r#"
[[question]]
text = "What is the capital of France?"
options = [{ text = "Paris", correct = true }, { text = "London" }]
"#;

    fn request(prompt: &str) -> AnswerRequest {
        AnswerRequest {
            question_id: "q1".to_string(),
            question_type: QuestionType::Standard,
            prompt: prompt.to_string(),
            transcript: Transcript(format!("Question: {}\n\nOptions:\n- Paris\n- London", prompt)),
        }
    }

    fn worker(settings: Settings) -> (AnswerWorker, mpsc::UnboundedReceiver<PageEvent>, watch::Sender<Settings>) {
        let (settings_tx, settings_rx) = watch::channel(settings);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let worker = AnswerWorker::new(Arc::new(Config::default()), settings_rx, events_tx);
        (worker, events_rx, settings_tx)
    }

    #[tokio::test]
    async fn test_dataset_answer_is_highlighted() {
        let settings = Settings {
            answer_source: AnswerSource::Dataset,
            ..Settings::default()
        };
        let (worker, mut events, _settings) = worker(settings);
        let worker = worker.with_dataset(StaticDataset::from_toml_str(DATASET, "test").unwrap());
        let panel = worker.panel();

        worker
            .handle(request("What is the capital of France?"))
            .await
            .unwrap();

        assert_eq!(events.recv().await, Some(PageEvent::ShowLoading));
        assert_eq!(
            events.recv().await,
            Some(PageEvent::HighlightAnswers {
                question_id: "q1".to_string(),
                question_type: QuestionType::Standard,
                answers: vec!["Paris".to_string()],
            })
        );
        let state = panel.borrow().clone();
        assert!(!state.is_loading);
        assert_eq!(state.last_answer.as_deref(), Some("Paris"));
    }

    #[tokio::test]
    async fn test_dataset_miss_does_not_highlight() {
        let settings = Settings {
            answer_source: AnswerSource::Dataset,
            ..Settings::default()
        };
        let (worker, mut events, _settings) = worker(settings);
        let panel = worker.panel();

        worker.handle(request("Who wrote Hamlet?")).await.unwrap();

        assert_eq!(events.recv().await, Some(PageEvent::ShowLoading));
        assert!(events.try_recv().is_err());
        assert_eq!(
            panel.borrow().last_explanation.as_deref(),
            Some(DATASET_MISS_EXPLANATION)
        );
    }

    #[tokio::test]
    async fn test_missing_key_logs_only() {
        let (worker, mut events, _settings) = worker(Settings::default());
        let panel = worker.panel();

        worker.handle(request("Anything?")).await.unwrap();

        assert_eq!(events.recv().await, Some(PageEvent::ShowLoading));
        let next = tokio::time::timeout(Duration::from_millis(50), events.recv()).await;
        assert!(next.is_err());
        assert!(panel.borrow().is_loading);
    }

    #[tokio::test]
    async fn test_highlighting_off_only_updates_panel() {
        let settings = Settings {
            answer_source: AnswerSource::Dataset,
            is_background: false,
            ..Settings::default()
        };
        let (worker, mut events, _settings) = worker(settings);
        let worker = worker.with_dataset(StaticDataset::from_toml_str(DATASET, "test").unwrap());
        let panel = worker.panel();

        worker
            .handle(request("What is the capital of France?"))
            .await
            .unwrap();

        assert_eq!(events.recv().await, Some(PageEvent::ShowLoading));
        assert!(events.try_recv().is_err());
        assert_eq!(panel.borrow().last_answer.as_deref(), Some("Paris"));
    }

    /// 依赖本机 9 端口上没有服务
    #[tokio::test]
    #[ignore]
    async fn test_unreachable_provider_reports_error() {
        let settings = Settings {
            openai_key: Some("sk-test".to_string()),
            ..Settings::default()
        };
        let (settings_tx, settings_rx) = watch::channel(settings);
        let (events_tx, mut events) = mpsc::unbounded_channel();
        let config = Config {
            openai_api_base_url: "http://127.0.0.1:9/v1".to_string(),
            ..Config::default()
        };
        let worker = AnswerWorker::new(Arc::new(config), settings_rx, events_tx);
        let panel = worker.panel();

        worker.handle(request("Anything?")).await.unwrap();

        assert_eq!(events.recv().await, Some(PageEvent::ShowLoading));
        assert!(events.try_recv().is_err());
        let state = panel.borrow().clone();
        assert!(!state.is_loading);
        assert!(state.last_answer.unwrap().starts_with("Error: "));
        drop(settings_tx);
    }
}
