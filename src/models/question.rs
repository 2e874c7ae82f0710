use std::fmt;

use serde::{Deserialize, Serialize};

/// 题目结构类型
///
/// 由题目 DOM 的结构决定，见 `services::classifier`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    /// 普通选择题（单选 / 多选）
    Standard,
    /// 句中下拉填空
    GapFill,
    /// 表格连线匹配
    Matching,
    /// 拖拽排序
    Ordering,
}

impl QuestionType {
    /// 标签名称（与页面消息中使用的名称一致）
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Standard => "standard",
            QuestionType::GapFill => "gapFill",
            QuestionType::Matching => "matching",
            QuestionType::Ordering => "ordering",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 题目的选项部分，按结构类型区分
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionBody {
    Standard {
        options: Vec<String>,
    },
    GapFill {
        /// 题干中下拉框位置替换为 `[BLANK]` 后的句子
        sentence: String,
        candidates: Vec<String>,
    },
    Matching {
        /// 左列：待匹配的术语
        terms: Vec<String>,
        /// 右列：第一行下拉框中的候选描述
        descriptions: Vec<String>,
    },
    Ordering {
        /// 页面当前顺序（尚未排序）
        items: Vec<String>,
    },
}

impl QuestionBody {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionBody::Standard { .. } => QuestionType::Standard,
            QuestionBody::GapFill { .. } => QuestionType::GapFill,
            QuestionBody::Matching { .. } => QuestionType::Matching,
            QuestionBody::Ordering { .. } => QuestionType::Ordering,
        }
    }
}

/// 从页面中抽取出来的一道题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 页面分配的元素 id（同一次渲染内唯一）
    pub id: String,
    /// 题干文本
    pub prompt: String,
    pub body: QuestionBody,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        self.body.question_type()
    }

    /// 生成文本化的题目描述
    ///
    /// 既作为 LLM 的用户消息，也可作为查找键。某种结构下没有抽取到选项时，
    /// 退化为只包含题干。
    pub fn transcript(&self) -> Transcript {
        let text = match &self.body {
            QuestionBody::Standard { options } if !options.is_empty() => format!(
                "Question: {}\n\nOptions:\n{}",
                self.prompt,
                bullet_list(options)
            ),
            QuestionBody::GapFill {
                sentence,
                candidates,
            } if !candidates.is_empty() => format!(
                "Fill in the blank.\n\nSentence: {}\n\nOptions:\n{}",
                sentence,
                bullet_list(candidates)
            ),
            QuestionBody::Matching {
                terms,
                descriptions,
            } if !terms.is_empty() && !descriptions.is_empty() => format!(
                "Question: {}\n\nMatch the following terms:\n{}\n\nWith one of the following descriptions:\n{}",
                self.prompt,
                bullet_list(terms),
                bullet_list(descriptions)
            ),
            QuestionBody::Ordering { items } if !items.is_empty() => {
                format!("Question: {}\n{}", self.prompt, bullet_list(items))
            }
            _ => self.prompt.clone(),
        };
        Transcript(text)
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 题目的文本化描述
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(pub String);

impl Transcript {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(body: QuestionBody) -> Question {
        Question {
            id: "question-1-1".to_string(),
            prompt: "What is the capital of France?".to_string(),
            body,
        }
    }

    #[test]
    fn standard_transcript_lists_options() {
        let q = question(QuestionBody::Standard {
            options: vec!["Paris".to_string(), "London".to_string()],
        });
        assert_eq!(
            q.transcript().as_str(),
            "Question: What is the capital of France?\n\nOptions:\n- Paris\n- London"
        );
    }

    #[test]
    fn empty_options_fall_back_to_prompt() {
        let q = question(QuestionBody::Ordering { items: vec![] });
        assert_eq!(q.transcript().as_str(), "What is the capital of France?");
    }

    #[test]
    fn question_type_serializes_camel_case() {
        let json = serde_json::to_string(&QuestionType::GapFill).unwrap();
        assert_eq!(json, "\"gapFill\"");
        assert_eq!(QuestionType::GapFill.to_string(), "gapFill");
    }
}
