//! 展示层补丁
//!
//! 把内存文档中与展示有关的部分（汇总区域、选项行的样式和标记属性）
//! 收集成一个可序列化的补丁，由页面桥接层写回真实页面。

use serde::Serialize;

use crate::dom::{attr, inner_html, select_all, selectors, Document};
use crate::services::annotation::{MARKER_ATTR, SAVED_STYLE_ATTR};

/// 单个选项行的展示属性
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowPatch {
    pub question_id: String,
    /// 在题目内 `.answer .d-flex` 中的下标
    pub row_index: usize,
    pub style: Option<String>,
    pub marked: bool,
    pub saved_style: Option<String>,
}

/// 整个页面的展示层补丁
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresentationPatch {
    /// 汇总区域的完整内容，页面上没有汇总区域时为 `None`
    pub summary_html: Option<String>,
    pub rows: Vec<RowPatch>,
}

impl PresentationPatch {
    pub fn collect(doc: &Document) -> Self {
        let summary_html = doc.summary_region().map(|region| inner_html(&region));

        let rows = doc
            .questions()
            .into_iter()
            .flat_map(|(question_id, root)| {
                select_all(&root, selectors::STANDARD_ROW)
                    .into_iter()
                    .enumerate()
                    .map(move |(row_index, row)| RowPatch {
                        question_id: question_id.clone(),
                        row_index,
                        style: attr(&row, "style"),
                        marked: attr(&row, MARKER_ATTR).is_some(),
                        saved_style: attr(&row, SAVED_STYLE_ATTR),
                    })
            })
            .collect();

        Self { summary_html, rows }
    }

    pub fn marked_rows(&self) -> usize {
        self.rows.iter().filter(|row| row.marked).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DisplayMode, QuestionType};
    use crate::services::reconcile;
    use crate::workflow::PageSession;

    const PAGE: &str = r#"<html><body>
        <div class="que" id="q1"><div class="qtext">Capital?</div><div class="answer">
          <div class="d-flex"><div class="flex-fill">Paris</div></div>
          <div class="d-flex" style="color: red"><div class="flex-fill">London</div></div>
        </div></div>
        <div id="page-footer"><div><div class="row footter_cc"><div class="footter_lc">Moodle</div></div></div></div>
    </body></html>"#;

    #[test]
    fn test_collect_reflects_reconciled_rows() {
        let doc = Document::parse(PAGE);
        let clean = PresentationPatch::collect(&doc);
        assert_eq!(clean.rows.len(), 2);
        assert_eq!(clean.marked_rows(), 0);
        assert_eq!(clean.rows[1].style.as_deref(), Some("color: red"));

        let mut session = PageSession::new();
        reconcile(
            &doc,
            &mut session,
            "q1",
            QuestionType::Standard,
            &["London".to_string()],
            DisplayMode::Background,
        );

        let patch = PresentationPatch::collect(&doc);
        assert_eq!(patch.marked_rows(), 1);
        assert_eq!(patch.rows[1].saved_style.as_deref(), Some("color: red"));
        assert!(patch.summary_html.unwrap().contains("London"));
    }

    #[test]
    fn test_collect_without_footer() {
        let doc = Document::parse(r#"<div class="que" id="q1"></div>"#);
        let patch = PresentationPatch::collect(&doc);
        assert_eq!(patch, PresentationPatch::default());
    }
}
