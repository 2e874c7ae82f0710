//! 页面处理流程 - 流程层
//!
//! 核心职责：决定页面上的每道题"何时处理、是否处理"
//!
//! - 扫描页面，为新出现的题目生成答案请求
//! - 页面自带正确答案（已提交的测验）时直接回填，不发请求
//! - 接收答案服务的事件并回填
//! - 根据设置变化清除或重新处理
//!
//! 所有状态保存在 [`PageSession`] 中，不使用全局变量。

use tracing::{debug, info, warn};

use crate::dom::{select_first, selectors, text_of, Document};
use crate::models::{Settings, SettingsChange};
use crate::services::answer_text::parse_right_answer;
use crate::services::{annotation, classify, extract_question, reconcile};
use crate::workflow::messages::{AnswerRequest, PageEvent};
use crate::workflow::session::{AnnotationState, PageSession};

/// 页面处理流程
///
/// - 持有页面会话
/// - 只操作传入的 [`Document`]，不接触浏览器和网络
#[derive(Debug, Default)]
pub struct ContentFlow {
    session: PageSession,
}

impl ContentFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    /// 扫描页面上尚未处理的题目
    ///
    /// 只在扩展开启且处于自动模式时工作。每道题只处理一次（直到 reset）。
    pub fn scan(&mut self, doc: &Document, settings: &Settings) -> Vec<AnswerRequest> {
        if !settings.is_enabled || !settings.is_auto_mode {
            return Vec::new();
        }

        let pruned = self.session.prune(doc);
        if pruned > 0 {
            debug!("清除了 {} 道已不在页面上的题目状态", pruned);
        }

        let mut requests = Vec::new();
        for (question_id, root) in doc.questions() {
            if !self.session.mark_pending(&question_id) {
                continue;
            }
            let question_type = classify(&root);

            if let Some(feedback) = select_first(&root, selectors::RIGHT_ANSWER) {
                let answers = parse_right_answer(&text_of(&feedback));
                info!(
                    "📋 题目 {} 已有正确答案，直接回填 ({} 条)",
                    question_id,
                    answers.len()
                );
                if settings.should_highlight() {
                    reconcile(
                        doc,
                        &mut self.session,
                        &question_id,
                        question_type,
                        &answers,
                        settings.display_mode,
                    );
                }
                self.session.mark_annotated(&question_id);
                continue;
            }

            let Some(question) = extract_question(&root, question_type) else {
                debug!("题目 {} 没有题干，跳过", question_id);
                continue;
            };

            let request = AnswerRequest {
                question_id: question_id.clone(),
                question_type,
                transcript: question.transcript(),
                prompt: question.prompt,
            };
            info!("📝 发现新题目 {}", request);
            requests.push(request);
        }

        requests
    }

    /// 处理答案服务发来的事件，返回页面是否被修改
    pub fn apply(&mut self, doc: &Document, event: PageEvent, settings: &Settings) -> bool {
        match event {
            PageEvent::ShowLoading => {
                if !settings.is_enabled {
                    return false;
                }
                annotation::show_loading(doc);
                true
            }
            PageEvent::HighlightAnswers {
                question_id,
                question_type,
                answers,
            } => {
                if !settings.should_highlight() {
                    debug!("标记已关闭，忽略题目 {} 的答案", question_id);
                    return false;
                }
                if self.session.state(&question_id) != Some(AnnotationState::Pending) {
                    warn!("⚠️ 题目 {} 不在等待状态，丢弃迟到的答案", question_id);
                    return false;
                }
                let reconciled = reconcile(
                    doc,
                    &mut self.session,
                    &question_id,
                    question_type,
                    &answers,
                    settings.display_mode,
                );
                match reconciled {
                    Some(_) => {
                        self.session.mark_annotated(&question_id);
                        true
                    }
                    None => {
                        warn!("⚠️ 题目 {} 已不在页面上，丢弃答案", question_id);
                        false
                    }
                }
            }
            PageEvent::ClearHighlights => {
                annotation::clear(doc, &mut self.session, None);
                true
            }
        }
    }

    /// 响应设置变化
    ///
    /// 关闭扩展、标记或自动模式时清除全部标记；重新开启扩展或标记，
    /// 或者切换标记样式时，重置状态并重新扫描，返回新产生的答案请求。
    pub fn on_settings_changed(
        &mut self,
        doc: &Document,
        change: &SettingsChange,
        settings: &Settings,
    ) -> Vec<AnswerRequest> {
        if change.turns_off_visuals() {
            info!("🧹 设置已关闭，清除页面上的所有标记");
            self.disable(doc);
            return Vec::new();
        }
        if change.turns_on_visuals() {
            info!("🔄 设置已重新开启，重新处理页面上的题目");
            annotation::clear(doc, &mut self.session, None);
            self.session.reset();
            return self.scan(doc, settings);
        }
        if let Some((from, to)) = change.display_mode {
            info!("🎨 标记样式 {:?} → {:?}，重新处理页面上的题目", from, to);
            annotation::clear(doc, &mut self.session, None);
            self.session.reset();
            return self.scan(doc, settings);
        }
        if matches!(change.is_auto_mode, Some((false, true))) {
            return self.scan(doc, settings);
        }
        Vec::new()
    }

    /// 清除所有标记和汇总内容，并重置会话
    pub fn disable(&mut self, doc: &Document) {
        annotation::clear(doc, &mut self.session, None);
        self.session.reset();
    }
}
