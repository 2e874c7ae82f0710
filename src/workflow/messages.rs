//! 页面与答案服务之间的消息
//!
//! 页面一侧发出 [`AnswerRequest`]，答案服务一侧回复 [`PageEvent`]。
//! 消息只携带自有数据，可以跨任务传递。

use std::fmt::Display;

use crate::models::{QuestionType, Transcript};

/// 页面 → 答案服务：请求一道题的答案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRequest {
    /// 页面上的题目元素 id
    pub question_id: String,
    pub question_type: QuestionType,
    /// 题干（用于面板展示和题库查找）
    pub prompt: String,
    /// 发送给补全服务的完整文本
    pub transcript: Transcript,
}

impl Display for AnswerRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[题目 #{} 类型 {}]", self.question_id, self.question_type)
    }
}

/// 答案服务 → 页面：展示层指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// 在汇总区域显示加载提示
    ShowLoading,
    /// 把答案回填到指定题目
    HighlightAnswers {
        question_id: String,
        question_type: QuestionType,
        answers: Vec<String>,
    },
    /// 清除页面上的所有标记
    ClearHighlights,
}
