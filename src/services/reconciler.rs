//! 答案回填
//!
//! 把"被认为正确"的答案文本通过近似匹配对应回页面上的选项，并按题型
//! 决定如何展示。每次回填前先清除这道题之前的标记，所以重复调用结果一致。

use std::collections::HashSet;

use kuchikiki::NodeRef;
use tracing::{debug, info};

use crate::dom::{closest_with_class, select_all, select_first, selectors, text_of, Document};
use crate::models::{DisplayMode, QuestionType};
use crate::services::annotation::{self, SummaryLine};
use crate::services::answer_text::{split_matching_answer, strip_ordinal};
use crate::services::extractor::{gap_candidates, ordering_items};
use crate::services::matcher::{best_match_index, find_match};
use crate::workflow::PageSession;

/// 排序题缩写的最短长度
///
/// 条目比已有缩写还短且与其相同时（如 `["Apple pie", "App"]`），条目用尽仍会
/// 得到重复的缩写 `App, App`。
pub const MIN_ABBREVIATION_LEN: usize = 3;

/// 回填结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// 加上标记的选项行数
    pub marked_rows: usize,
    /// 写入汇总区域的内容
    pub summary: Vec<SummaryLine>,
}

impl ReconcileOutcome {
    pub fn is_empty(&self) -> bool {
        self.marked_rows == 0 && self.summary.is_empty()
    }
}

/// 把答案回填到指定题目上
///
/// 题目节点不存在时不做任何事并返回 `None`；没有匹配上的答案静默丢弃。
pub fn reconcile(
    doc: &Document,
    session: &mut PageSession,
    question_id: &str,
    question_type: QuestionType,
    answers: &[String],
    mode: DisplayMode,
) -> Option<ReconcileOutcome> {
    let root = doc.element_by_id(question_id)?;

    annotation::clear(doc, session, Some(question_id));

    let outcome = match question_type {
        QuestionType::Standard => reconcile_standard(&root, answers, mode),
        QuestionType::GapFill => reconcile_gap_fill(&root, answers),
        QuestionType::Matching => reconcile_matching(&root, answers),
        QuestionType::Ordering => reconcile_ordering(&root, answers),
    };

    annotation::display_summary(doc, session, &outcome.summary);

    if outcome.is_empty() {
        debug!("题目 {} 没有匹配到任何答案", question_id);
    } else {
        info!(
            "✓ 题目 {} ({}) 已标记: {} 个选项, {} 行汇总",
            question_id,
            question_type,
            outcome.marked_rows,
            outcome.summary.len()
        );
    }

    Some(outcome)
}

fn reconcile_standard(root: &NodeRef, answers: &[String], mode: DisplayMode) -> ReconcileOutcome {
    let mut matched: HashSet<&str> = HashSet::new();
    let mut marked_rows = 0;

    for option in select_all(root, selectors::STANDARD_OPTION) {
        let text = text_of(&option);
        if text.is_empty() {
            continue;
        }
        let Some(answer) = find_match(&text, answers) else {
            continue;
        };
        matched.insert(answer.as_str());
        if let Some(row) = closest_with_class(&option, selectors::STANDARD_ROW_CLASS) {
            if !annotation::is_marked(&row) {
                annotation::mark_row(&row, mode);
                marked_rows += 1;
            }
        }
    }

    let summary = answers
        .iter()
        .filter(|answer| matched.contains(answer.as_str()))
        .map(|answer| SummaryLine::Text(answer.clone()))
        .collect();

    ReconcileOutcome {
        marked_rows,
        summary,
    }
}

/// 填空题只看第一个答案，下拉框本身不改动
fn reconcile_gap_fill(root: &NodeRef, answers: &[String]) -> ReconcileOutcome {
    let Some(answer) = answers.first() else {
        return ReconcileOutcome::default();
    };
    let candidates = gap_candidates(root);
    let summary = find_match(answer, &candidates)
        .map(|candidate| vec![SummaryLine::Text(candidate.clone())])
        .unwrap_or_default();

    ReconcileOutcome {
        marked_rows: 0,
        summary,
    }
}

fn reconcile_matching(root: &NodeRef, answers: &[String]) -> ReconcileOutcome {
    let mapping: Vec<(String, String)> = answers
        .iter()
        .filter_map(|answer| split_matching_answer(answer))
        .collect();
    if mapping.is_empty() {
        return ReconcileOutcome::default();
    }

    let Some(table) = select_first(root, selectors::MATCHING_TABLE) else {
        return ReconcileOutcome::default();
    };

    let keys: Vec<&str> = mapping.iter().map(|(key, _)| key.as_str()).collect();
    let summary = select_all(&table, "tr")
        .iter()
        .filter_map(|row| select_first(row, selectors::MATCHING_TERM))
        .map(|term| text_of(&term))
        .filter(|term| !term.is_empty())
        .filter_map(|term| {
            best_match_index(&term, &keys).map(|index| SummaryLine::Pair {
                term,
                description: mapping[index].1.clone(),
            })
        })
        .collect();

    ReconcileOutcome {
        marked_rows: 0,
        summary,
    }
}

/// 排序题不移动页面元素，只把正确顺序渲染为各条目的缩写序列
fn reconcile_ordering(root: &NodeRef, answers: &[String]) -> ReconcileOutcome {
    let items = ordering_items(root);
    if items.is_empty() {
        return ReconcileOutcome::default();
    }
    let codes = abbreviations(&items);

    let sequence: Vec<&str> = answers
        .iter()
        .map(|answer| strip_ordinal(answer))
        .filter_map(|answer| best_match_index(&answer, &items).map(|index| codes[index].as_str()))
        .collect();

    let summary = if sequence.is_empty() {
        Vec::new()
    } else {
        vec![SummaryLine::Text(sequence.join(", "))]
    };

    ReconcileOutcome {
        marked_rows: 0,
        summary,
    }
}

/// 为每个条目生成互不冲突的前缀缩写
///
/// 从 [`MIN_ABBREVIATION_LEN`] 个字符开始，与已有缩写冲突时逐个加长，
/// 直到不冲突或用完整个条目。缩写去掉尾部空白。
pub fn abbreviations(items: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();

    items
        .iter()
        .map(|item| {
            let chars: Vec<char> = item.trim().chars().collect();
            let mut len = MIN_ABBREVIATION_LEN.min(chars.len());
            loop {
                let abbreviation = chars[..len].iter().collect::<String>().trim_end().to_string();
                if !used.contains(&abbreviation) || len >= chars.len() {
                    used.insert(abbreviation.clone());
                    return abbreviation;
                }
                len += 1;
            }
        })
        .collect()
}
