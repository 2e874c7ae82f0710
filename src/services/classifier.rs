//! 题型识别
//!
//! 只看题目 DOM 的结构，按固定优先级判断：排序 > 匹配 > 填空 > 普通。

use kuchikiki::NodeRef;

use crate::dom::{select_first, selectors};
use crate::models::QuestionType;

/// 判断题目的结构类型，没有任何特征时归为普通选择题
pub fn classify(question_root: &NodeRef) -> QuestionType {
    let has = |selector: &str| select_first(question_root, selector).is_some();

    if has(selectors::ORDERING_CONTAINER) {
        QuestionType::Ordering
    } else if has(selectors::MATCHING_TABLE) {
        QuestionType::Matching
    } else if has(selectors::GAP_SELECT) {
        QuestionType::GapFill
    } else {
        QuestionType::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn classify_html(body: &str) -> QuestionType {
        let doc = Document::parse(&format!(
            r#"<html><body><div class="que" id="q1">{body}</div></body></html>"#
        ));
        let root = doc.element_by_id("q1").unwrap();
        classify(&root)
    }

    #[test]
    fn test_ordering() {
        let body = r#"<div class="qtext">Order</div>
            <div class="ablock"><ul class="answer ordering"><li class="sortableitem">A</li></ul></div>"#;
        assert_eq!(classify_html(body), QuestionType::Ordering);
    }

    #[test]
    fn test_matching() {
        let body = r#"<div class="qtext">Match</div>
            <div class="ablock"><table class="answer"><tr><td class="text">T</td>
            <td><select><option value="1">D</option></select></td></tr></table></div>"#;
        assert_eq!(classify_html(body), QuestionType::Matching);
    }

    #[test]
    fn test_gap_fill() {
        let body = r#"<div class="qtext">Paris is in <select class="select"><option>France</option></select></div>"#;
        assert_eq!(classify_html(body), QuestionType::GapFill);
    }

    #[test]
    fn test_standard_is_the_fallback() {
        assert_eq!(classify_html(""), QuestionType::Standard);
        let body = r#"<div class="qtext">Q</div><div class="answer"><div class="d-flex"><div class="flex-fill">A</div></div></div>"#;
        assert_eq!(classify_html(body), QuestionType::Standard);
    }

    #[test]
    fn test_ordering_beats_matching() {
        let body = r#"<div class="qtext">Both</div>
            <div class="ablock">
              <table class="answer"><tr><td class="text">T</td><td><select><option value="1">D</option></select></td></tr></table>
              <ul class="answer ordering"><li class="sortableitem">A</li></ul>
            </div>"#;
        assert_eq!(classify_html(body), QuestionType::Ordering);
    }

    #[test]
    fn test_matching_beats_gap_fill() {
        let body = r#"<div class="qtext">Pick <select class="select"><option>x</option></select></div>
            <div class="ablock"><table class="answer"><tr><td class="text">T</td></tr></table></div>"#;
        assert_eq!(classify_html(body), QuestionType::Matching);
    }

    #[test]
    fn test_select_outside_prompt_is_not_gap_fill() {
        let body = r#"<div class="qtext">Q</div><div class="answer"><select class="select"><option>x</option></select></div>"#;
        assert_eq!(classify_html(body), QuestionType::Standard);
    }
}
