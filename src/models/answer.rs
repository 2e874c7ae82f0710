use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::question::QuestionType;

/// 一次答案查询的结构化结果
///
/// 无论来自补全服务还是静态题库，都统一成这个形状。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionAnswer {
    /// 被视为正确的答案文本
    pub answers: Vec<String>,
    pub explanation: String,
}

/// 弹窗面板展示的状态
///
/// 对应浏览器扩展里 session 存储中的最近一次问答记录。
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub is_loading: bool,
    pub last_question: Option<String>,
    /// 多个答案以换行拼接；失败时为 `Error: <message>`
    pub last_answer: Option<String>,
    pub last_explanation: Option<String>,
    pub question_type: Option<QuestionType>,
    pub updated_at: DateTime<Local>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            is_loading: false,
            last_question: None,
            last_answer: None,
            last_explanation: None,
            question_type: None,
            updated_at: Local::now(),
        }
    }
}

impl PanelState {
    /// 请求已发出，等待结果
    pub fn loading(question: &str, question_type: QuestionType) -> Self {
        Self {
            is_loading: true,
            last_question: Some(question.to_string()),
            last_answer: None,
            last_explanation: None,
            question_type: Some(question_type),
            updated_at: Local::now(),
        }
    }

    pub fn answered(question: &str, question_type: QuestionType, answer: &CompletionAnswer) -> Self {
        Self {
            is_loading: false,
            last_question: Some(question.to_string()),
            last_answer: Some(answer.answers.join("\n")),
            last_explanation: Some(answer.explanation.clone()),
            question_type: Some(question_type),
            updated_at: Local::now(),
        }
    }

    pub fn failed(question: &str, question_type: QuestionType, message: &str) -> Self {
        Self {
            is_loading: false,
            last_question: Some(question.to_string()),
            last_answer: Some(format!("Error: {}", message)),
            last_explanation: Some(String::new()),
            question_type: Some(question_type),
            updated_at: Local::now(),
        }
    }
}
