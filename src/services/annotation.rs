//! 页面上的展示层改动
//!
//! 包括选项行的标记样式、汇总区域（页脚）的答案展示和加载提示。
//! 这里只增删展示属性和注入的节点，不改动题目文本和选项本身。

use kuchikiki::NodeRef;
use tracing::debug;

use crate::dom::{
    self, attr, clear_children, create_element, remove_attr, select_all, select_first, selectors,
    set_attr, Document,
};
use crate::models::DisplayMode;
use crate::workflow::PageSession;

/// 注入的答案容器
pub const ANSWER_CLASS: &str = "quiz-lens-answer";
/// 注入的加载提示
pub const LOADING_CLASS: &str = "quiz-lens-loading";
/// 被标记的选项行
pub const MARKER_ATTR: &str = "data-quiz-lens-marked";
/// 选项行标记前的原始 style
pub const SAVED_STYLE_ATTR: &str = "data-quiz-lens-style";

const ANSWER_STYLE: &str = "padding: 10px; text-align: center; font-size: 14px; color: gray;";
const LOADING_STYLE: &str =
    "padding: 10px 0; text-align: center; color: gray; font-weight: bold; font-size: 14px;";

/// 汇总区域中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryLine {
    Text(String),
    /// 匹配题的一组对应，术语加粗
    Pair { term: String, description: String },
}

/// 给选项行加上标记样式，已经标记过的行保持不变
pub fn mark_row(row: &NodeRef, mode: DisplayMode) {
    if attr(row, MARKER_ATTR).is_some() {
        return;
    }
    let marker = mode.marker_style();
    set_attr(row, MARKER_ATTR, "true");
    match attr(row, "style") {
        Some(original) => {
            set_attr(row, SAVED_STYLE_ATTR, &original);
            let trimmed = original.trim_end();
            let style = if trimmed.is_empty() || trimmed.ends_with(';') {
                format!("{} {}", trimmed, marker).trim_start().to_string()
            } else {
                format!("{}; {}", trimmed, marker)
            };
            set_attr(row, "style", &style);
        }
        None => set_attr(row, "style", &marker),
    }
}

/// 撤销选项行的标记，恢复原始 style
///
/// 属性按插入的逆序删除，使元素序列化后与标记前一致。
pub fn unmark_row(row: &NodeRef) {
    if attr(row, MARKER_ATTR).is_none() {
        return;
    }
    match attr(row, SAVED_STYLE_ATTR) {
        Some(original) => {
            set_attr(row, "style", &original);
            remove_attr(row, SAVED_STYLE_ATTR);
        }
        None => remove_attr(row, "style"),
    }
    remove_attr(row, MARKER_ATTR);
}

pub fn is_marked(row: &NodeRef) -> bool {
    attr(row, MARKER_ATTR).is_some()
}

/// 在汇总区域显示加载提示，替换掉之前的提示
pub fn show_loading(doc: &Document) {
    let Some(region) = doc.summary_region() else {
        return;
    };
    let Some(slot) = select_first(doc.root(), selectors::SUMMARY_SLOT) else {
        return;
    };

    for old in select_all(&region, &format!(".{}", LOADING_CLASS)) {
        old.detach();
    }

    let Some(loading) = create_element("div") else {
        return;
    };
    set_attr(&loading, "class", LOADING_CLASS);
    set_attr(&loading, "style", LOADING_STYLE);
    loading.append(NodeRef::new_text("Loading..."));
    slot.append(loading);
}

/// 用答案替换汇总区域的内容
///
/// 第一次改动前把区域原有内容保存到会话中，供 [`clear`] 恢复。
pub fn display_summary(doc: &Document, session: &mut PageSession, lines: &[SummaryLine]) {
    if lines.is_empty() {
        return;
    }
    let Some(region) = doc.summary_region() else {
        return;
    };
    let Some(container) = create_element("div") else {
        return;
    };

    session.capture_summary(|| dom::inner_html(&region));

    set_attr(&container, "class", ANSWER_CLASS);
    set_attr(&container, "style", ANSWER_STYLE);
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            if let Some(br) = create_element("br") {
                container.append(br);
            }
        }
        match line {
            SummaryLine::Text(text) => container.append(NodeRef::new_text(text.as_str())),
            SummaryLine::Pair { term, description } => {
                if let Some(bold) = create_element("b") {
                    bold.append(NodeRef::new_text(term.as_str()));
                    container.append(bold);
                }
                container.append(NodeRef::new_text(format!(" → {}", description)));
            }
        }
    }

    clear_children(&region);
    region.append(container);
    debug!("汇总区域已更新，共 {} 行", lines.len());
}

/// 清除标记
///
/// 注入的答案和加载提示总是在整个页面范围内清除；选项行的标记只清除
/// `scope` 指定的题目（`None` 表示整个页面）。保存过的汇总区域原始内容会被恢复。
pub fn clear(doc: &Document, session: &mut PageSession, scope: Option<&str>) {
    for selector in [format!(".{}", LOADING_CLASS), format!(".{}", ANSWER_CLASS)] {
        for node in select_all(doc.root(), &selector) {
            node.detach();
        }
    }

    let scope_root = match scope {
        Some(id) => doc.element_by_id(id),
        None => Some(doc.root().clone()),
    };
    if let Some(scope_root) = scope_root {
        for row in select_all(&scope_root, &format!("[{}]", MARKER_ATTR)) {
            unmark_row(&row);
        }
    }

    if let Some(region) = doc.summary_region() {
        if let Some(original) = session.take_original_summary() {
            dom::set_inner_html(&region, &original);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::text_of;

    const PAGE: &str = r#"<html><body>
        <div class="que" id="q1"><div class="answer">
          <div class="d-flex" id="row-a"><div class="flex-fill">A</div></div>
          <div class="d-flex" id="row-b" style="color: red"><div class="flex-fill">B</div></div>
        </div></div>
        <div id="page-footer"><div><div class="row footter_cc"><div class="footter_lc">© University</div></div></div></div>
    </body></html>"#;

    #[test]
    fn test_mark_and_unmark_restore_markup() {
        let doc = Document::parse(PAGE);
        let before = doc.to_html();

        let a = doc.element_by_id("row-a").unwrap();
        let b = doc.element_by_id("row-b").unwrap();
        mark_row(&a, DisplayMode::Background);
        mark_row(&b, DisplayMode::Underline);
        mark_row(&b, DisplayMode::Underline);

        assert!(is_marked(&a));
        assert_eq!(
            attr(&a, "style").as_deref(),
            Some("background-color: #f3fffa;")
        );
        let b_style = attr(&b, "style").unwrap();
        assert!(b_style.starts_with("color: red; text-decoration: underline;"));

        unmark_row(&a);
        unmark_row(&b);
        assert_eq!(doc.to_html(), before);
    }

    #[test]
    fn test_display_captures_and_clear_restores() {
        let doc = Document::parse(PAGE);
        let before = doc.to_html();
        let mut session = PageSession::new();

        display_summary(
            &doc,
            &mut session,
            &[
                SummaryLine::Pair {
                    term: "Symbolic".to_string(),
                    description: "Uses rules".to_string(),
                },
                SummaryLine::Text("<script>x</script>".to_string()),
            ],
        );
        let region = doc.summary_region().unwrap();
        assert_eq!(text_of(&region), "Symbolic → Uses rules<script>x</script>");
        assert!(select_first(&region, "script").is_none());
        assert!(session.original_summary().unwrap().contains("University"));

        display_summary(&doc, &mut session, &[SummaryLine::Text("Paris".to_string())]);
        assert_eq!(text_of(&region), "Paris");
        assert!(session.original_summary().unwrap().contains("University"));

        clear(&doc, &mut session, None);
        assert_eq!(doc.to_html(), before);
        assert!(session.original_summary().is_none());
    }

    #[test]
    fn test_loading_indicator_is_not_duplicated() {
        let doc = Document::parse(PAGE);
        show_loading(&doc);
        show_loading(&doc);
        let loaders = select_all(doc.root(), &format!(".{}", LOADING_CLASS));
        assert_eq!(loaders.len(), 1);
        assert_eq!(text_of(&loaders[0]), "Loading...");

        let mut session = PageSession::new();
        clear(&doc, &mut session, None);
        assert!(select_all(doc.root(), &format!(".{}", LOADING_CLASS)).is_empty());
    }

    #[test]
    fn test_missing_region_is_a_no_op() {
        let doc = Document::parse(r#"<div class="que" id="q1"></div>"#);
        let before = doc.to_html();
        let mut session = PageSession::new();
        show_loading(&doc);
        display_summary(&doc, &mut session, &[SummaryLine::Text("x".to_string())]);
        clear(&doc, &mut session, Some("q1"));
        assert_eq!(doc.to_html(), before);
        assert!(session.original_summary().is_none());
    }
}
