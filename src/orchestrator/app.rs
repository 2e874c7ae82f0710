//! 应用主循环 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：加载设置、连接浏览器、创建页面桥接和答案服务
//! 2. **页面观察**：定时读取页面快照，发现新题目后交给答案服务
//! 3. **事件回填**：把答案服务发回的事件应用到快照上，再把补丁写回页面
//! 4. **设置同步**：设置文件或页脚按钮改变设置时，清除或重新处理页面
//! 5. **退出清理**：收到 Ctrl+C 后清除页面上的全部标记
//!
//! 页面文档只在当前任务中使用，不跨线程；答案服务通过通道与这里通信。

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::dom::Document;
use crate::error::AppResult;
use crate::infrastructure::{JsExecutor, PageBridge};
use crate::models::{PanelState, Settings, SettingsChange};
use crate::orchestrator::AnswerWorker;
use crate::services::SettingsStore;
use crate::utils::logging::log_startup;
use crate::utils::truncate_text;
use crate::workflow::{AnswerRequest, ContentFlow, PageEvent, PresentationPatch};

/// 应用主结构
pub struct App {
    config: Arc<Config>,
    _browser: Browser,
    page: PageSide,
    events: mpsc::UnboundedReceiver<PageEvent>,
}

/// 页面一侧持有的全部资源
struct PageSide {
    bridge: PageBridge,
    store: SettingsStore,
    settings_tx: watch::Sender<Settings>,
    worker: AnswerWorker,
    flow: ContentFlow,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let store = SettingsStore::open(&config.settings_file)
            .await
            .with_context(|| format!("无法加载设置文件: {}", config.settings_file))?;

        log_startup(&config, store.current());

        let (browser, page) = browser::connect_to_browser_and_page(
            config.browser_debug_port,
            Some(&config.target_url),
            config.target_title.as_deref(),
        )
        .await
        .context("连接浏览器失败")?;

        let bridge = PageBridge::new(JsExecutor::new(page));

        let config = Arc::new(config);
        let (settings_tx, settings_rx) = watch::channel(store.current().clone());
        let (events_tx, events) = mpsc::unbounded_channel();
        let worker = AnswerWorker::new(Arc::clone(&config), settings_rx, events_tx)
            .load_dataset()
            .await;

        Ok(Self {
            config,
            _browser: browser,
            page: PageSide {
                bridge,
                store,
                settings_tx,
                worker,
                flow: ContentFlow::new(),
            },
            events,
        })
    }

    /// 运行主循环，直到收到 Ctrl+C
    pub async fn run(self) -> Result<()> {
        let Self {
            config,
            _browser,
            mut page,
            mut events,
        } = self;

        let mut scan_timer = interval(Duration::from_millis(config.scan_interval_ms));
        scan_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut button_timer = interval(Duration::from_millis(config.button_poll_interval_ms));
        button_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut panel = page.worker.panel();

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        info!("👀 开始观察页面 (每 {}ms 扫描一次)", config.scan_interval_ms);

        loop {
            tokio::select! {
                _ = scan_timer.tick() => {
                    if let Err(e) = page.on_scan_tick().await {
                        warn!("⚠️ 扫描页面失败: {}", e);
                    }
                }
                _ = button_timer.tick() => {
                    if let Err(e) = page.on_button_tick().await {
                        warn!("⚠️ 检查页脚按钮失败: {}", e);
                    }
                }
                Some(event) = events.recv() => {
                    if let Err(e) = page.on_page_event(event).await {
                        error!("❌ 回填答案失败: {}", e);
                    }
                }
                Ok(()) = panel.changed() => {
                    log_panel(&panel.borrow_and_update());
                }
                _ = &mut shutdown => {
                    info!("收到退出信号，正在清除页面标记...");
                    break;
                }
            }
        }

        page.shutdown().await;
        info!("👋 程序已退出");
        Ok(())
    }
}

impl PageSide {
    fn settings(&self) -> Settings {
        self.store.current().clone()
    }

    /// 读取快照、修改、写回
    ///
    /// 只有展示层确实变化时才写回页面。
    async fn edit_page<R>(
        &mut self,
        edit: impl FnOnce(&mut ContentFlow, &Document, &Settings) -> R,
    ) -> AppResult<R> {
        let doc = self.bridge.snapshot().await?;
        let before = PresentationPatch::collect(&doc);
        let settings = self.settings();

        let result = edit(&mut self.flow, &doc, &settings);

        let after = PresentationPatch::collect(&doc);
        if after != before {
            self.bridge.apply(&after).await?;
        }
        Ok(result)
    }

    fn dispatch(&self, requests: Vec<AnswerRequest>) {
        for request in requests {
            debug!("发送答案请求 {}", request);
            // 任务结果通过事件通道返回，不需要等待
            drop(self.worker.handle(request));
        }
    }

    async fn on_scan_tick(&mut self) -> AppResult<()> {
        if let Some(change) = self.store.reload().await {
            self.on_settings_changed(change).await?;
        }
        let requests = self
            .edit_page(|flow, doc, settings| flow.scan(doc, settings))
            .await?;
        self.dispatch(requests);
        Ok(())
    }

    /// 挂载页脚按钮监听，并处理上次检查以来的点击
    async fn on_button_tick(&mut self) -> AppResult<()> {
        self.bridge.ensure_footer_listener().await?;
        let toggles = self.bridge.take_toggles().await?;
        if toggles % 2 == 1 {
            let change = self.store.toggle_highlighting().await?;
            self.on_settings_changed(change).await?;
        }
        Ok(())
    }

    async fn on_settings_changed(&mut self, change: SettingsChange) -> AppResult<()> {
        self.settings_tx.send_replace(self.settings());
        let requests = self
            .edit_page(|flow, doc, settings| flow.on_settings_changed(doc, &change, settings))
            .await?;
        self.dispatch(requests);
        Ok(())
    }

    async fn on_page_event(&mut self, event: PageEvent) -> AppResult<()> {
        self.edit_page(|flow, doc, settings| flow.apply(doc, event, settings))
            .await?;
        Ok(())
    }

    async fn shutdown(&mut self) {
        if let Err(e) = self.edit_page(|flow, doc, _| flow.disable(doc)).await {
            warn!("⚠️ 清除页面标记失败: {}", e);
        }
    }
}

fn log_panel(state: &PanelState) {
    if state.is_loading {
        info!(
            "⏳ 正在查询: {}",
            truncate_text(state.last_question.as_deref().unwrap_or_default(), 60)
        );
        return;
    }
    if let Some(answer) = &state.last_answer {
        info!("💡 答案: {}", truncate_text(&answer.replace('\n', " | "), 120));
    }
    if let Some(explanation) = state.last_explanation.as_deref().filter(|e| !e.is_empty()) {
        debug!("📖 解释: {}", truncate_text(explanation, 300));
    }
}
