//! 题目内容抽取
//!
//! 按题型从 DOM 中抽取题干和选项，生成结构化的 [`Question`] 及其文本描述。
//! 抽取是纯读取操作，对同一个未修改的 DOM 多次调用结果相同。

use kuchikiki::NodeRef;

use crate::dom::{self, attr, normalize_text, select_all, select_first, selectors, text_of};
use crate::models::{Question, QuestionBody, QuestionType, Transcript};

/// 填空位置的占位标记
pub const BLANK_MARKER: &str = "[BLANK]";

/// 抽取题目的文本描述
///
/// 找不到题干节点时返回 `None`，调用方直接跳过这道题。
pub fn extract(question_root: &NodeRef, question_type: QuestionType) -> Option<Transcript> {
    extract_question(question_root, question_type).map(|q| q.transcript())
}

/// 抽取结构化的题目
pub fn extract_question(question_root: &NodeRef, question_type: QuestionType) -> Option<Question> {
    let qtext = select_first(question_root, selectors::QUESTION_TEXT)?;
    let prompt = replace_selects(&qtext, "");

    let body = match question_type {
        QuestionType::Standard => QuestionBody::Standard {
            options: standard_options(question_root),
        },
        QuestionType::GapFill => QuestionBody::GapFill {
            sentence: replace_selects(&qtext, BLANK_MARKER),
            candidates: gap_candidates(question_root),
        },
        QuestionType::Matching => {
            let (terms, descriptions) = matching_columns(question_root);
            QuestionBody::Matching {
                terms,
                descriptions,
            }
        }
        QuestionType::Ordering => QuestionBody::Ordering {
            items: ordering_items(question_root),
        },
    };

    Some(Question {
        id: attr(question_root, "id").unwrap_or_default(),
        prompt,
        body,
    })
}

/// 普通选择题的选项文本
pub(crate) fn standard_options(question_root: &NodeRef) -> Vec<String> {
    non_empty_texts(select_all(question_root, selectors::STANDARD_OPTION))
}

/// 填空题下拉框中的候选文本
pub(crate) fn gap_candidates(question_root: &NodeRef) -> Vec<String> {
    select_first(question_root, selectors::GAP_SELECT)
        .map(|select| non_empty_texts(select_all(&select, "option")))
        .unwrap_or_default()
}

/// 匹配题的左列术语和右列候选描述
///
/// 候选描述只从第一行的下拉框读取，假定所有行共用同一组选项。
/// 空 `value` 的选项是"请选择"占位，跳过。
pub(crate) fn matching_columns(question_root: &NodeRef) -> (Vec<String>, Vec<String>) {
    let Some(table) = select_first(question_root, selectors::MATCHING_TABLE) else {
        return (Vec::new(), Vec::new());
    };

    let mut terms = Vec::new();
    let mut descriptions = Vec::new();

    for (index, row) in select_all(&table, "tr").iter().enumerate() {
        if let Some(term) = select_first(row, selectors::MATCHING_TERM) {
            let term = text_of(&term);
            if !term.is_empty() {
                terms.push(term);
            }
        }
        if index == 0 {
            if let Some(select) = select_first(row, "select") {
                descriptions = select_all(&select, "option")
                    .iter()
                    .filter(|opt| attr(opt, "value").is_some_and(|v| !v.is_empty()))
                    .map(text_of)
                    .filter(|text| !text.is_empty())
                    .collect();
            }
        }
    }

    (terms, descriptions)
}

/// 排序题条目的当前顺序
pub(crate) fn ordering_items(question_root: &NodeRef) -> Vec<String> {
    select_first(question_root, selectors::ORDERING_CONTAINER)
        .map(|container| non_empty_texts(select_all(&container, selectors::ORDERING_ITEM)))
        .unwrap_or_default()
}

/// 题干文本，每个下拉框替换为 `placeholder`
///
/// 下拉框中的选项文本不会出现在结果里。
fn replace_selects(qtext: &NodeRef, placeholder: &str) -> String {
    fn walk(node: &NodeRef, placeholder: &str, out: &mut String) {
        for child in node.children() {
            if let Some(text) = child.as_text() {
                out.push_str(&text.borrow());
            } else if child
                .as_element()
                .is_some_and(|el| &*el.name.local == "select")
            {
                out.push(' ');
                out.push_str(placeholder);
                out.push(' ');
            } else {
                walk(&child, placeholder, out);
            }
        }
    }

    let mut raw = String::new();
    walk(qtext, placeholder, &mut raw);
    normalize_text(&raw)
}

fn non_empty_texts(nodes: Vec<NodeRef>) -> Vec<String> {
    nodes
        .iter()
        .map(dom::text_of)
        .filter(|text| !text.is_empty())
        .collect()
}
