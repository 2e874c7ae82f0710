//! 页面会话上下文
//!
//! 一个页面生命周期内的全部可变状态：每道题的处理状态，以及汇总区域被
//! 覆盖前的原始内容。显式传入各个处理阶段，并提供 `reset`。

use std::collections::HashMap;

use crate::dom::Document;

/// 单道题的标记状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationState {
    /// 已发出答案请求，等待结果
    Pending,
    /// 已完成标记
    Annotated,
}

/// 页面会话
#[derive(Debug, Default)]
pub struct PageSession {
    states: HashMap<String, AnnotationState>,
    original_summary: Option<String>,
}

impl PageSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, question_id: &str) -> Option<AnnotationState> {
        self.states.get(question_id).copied()
    }

    /// 是否已经处理过（请求中或已标记）
    pub fn is_processed(&self, question_id: &str) -> bool {
        self.states.contains_key(question_id)
    }

    /// 标记为等待中；已经处理过的题目返回 `false`
    pub fn mark_pending(&mut self, question_id: &str) -> bool {
        if self.is_processed(question_id) {
            return false;
        }
        self.states
            .insert(question_id.to_string(), AnnotationState::Pending);
        true
    }

    pub fn mark_annotated(&mut self, question_id: &str) {
        self.states
            .insert(question_id.to_string(), AnnotationState::Annotated);
    }

    /// 清除已经不在页面上的题目的状态，返回清除的数量
    pub fn prune(&mut self, doc: &Document) -> usize {
        let present: Vec<String> = doc.questions().into_iter().map(|(id, _)| id).collect();
        let before = self.states.len();
        self.states.retain(|id, _| present.contains(id));
        before - self.states.len()
    }

    /// 清空所有题目状态
    pub fn reset(&mut self) {
        self.states.clear();
    }

    pub fn tracked_count(&self) -> usize {
        self.states.len()
    }

    pub fn original_summary(&self) -> Option<&str> {
        self.original_summary.as_deref()
    }

    /// 第一次改动汇总区域前保存原始内容，之后的调用不再覆盖
    pub(crate) fn capture_summary(&mut self, capture: impl FnOnce() -> String) {
        if self.original_summary.is_none() {
            self.original_summary = Some(capture());
        }
    }

    pub(crate) fn take_original_summary(&mut self) -> Option<String> {
        self.original_summary.take()
    }
}
