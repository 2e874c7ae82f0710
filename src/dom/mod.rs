//! 内存中的页面 DOM
//!
//! 基于 `kuchikiki`（html5ever 解析 + CSS 选择器）。题目的分类、抽取和
//! 标记都在这里的节点上进行，不需要真实浏览器。
//!
//! `NodeRef` 内部是 `Rc`，所以 [`Document`] 只能在单个任务内使用。

pub mod selectors;

use kuchikiki::traits::*;
use kuchikiki::NodeRef;

/// 解析后的整张页面
pub struct Document {
    root: NodeRef,
}

impl Document {
    /// 解析完整的 HTML 文档（缺失的 html/body 由解析器补齐）
    pub fn parse(html: &str) -> Self {
        Self {
            root: kuchikiki::parse_html().one(html),
        }
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// 序列化整个文档
    pub fn to_html(&self) -> String {
        self.root.to_string()
    }

    /// 按 id 查找元素
    ///
    /// 不拼接 `#id` 选择器，页面生成的 id 可能包含选择器里的特殊字符。
    pub fn element_by_id(&self, id: &str) -> Option<NodeRef> {
        select_all(&self.root, "[id]")
            .into_iter()
            .find(|node| attr(node, "id").as_deref() == Some(id))
    }

    /// 页面上所有带 id 的题目节点，按文档顺序
    pub fn questions(&self) -> Vec<(String, NodeRef)> {
        select_all(&self.root, selectors::QUESTION)
            .into_iter()
            .filter_map(|node| {
                let id = attr(&node, "id").filter(|id| !id.is_empty())?;
                Some((id, node))
            })
            .collect()
    }

    /// 汇总区域（页脚）节点
    pub fn summary_region(&self) -> Option<NodeRef> {
        select_first(&self.root, selectors::SUMMARY_REGION)
    }
}

/// 以 `node` 为根（含自身）选出所有匹配的元素
///
/// 选择器都是内置常量，解析失败时按"没有匹配"处理。
pub fn select_all(node: &NodeRef, selector: &str) -> Vec<NodeRef> {
    match node.select(selector) {
        Ok(iter) => iter.map(|el| el.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    }
}

pub fn select_first(node: &NodeRef, selector: &str) -> Option<NodeRef> {
    node.select_first(selector)
        .ok()
        .map(|el| el.as_node().clone())
}

/// 节点的文本内容，空白折叠为单个空格并去掉首尾空白
pub fn text_of(node: &NodeRef) -> String {
    normalize_text(&node.text_contents())
}

pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    let element = node.as_element()?;
    let attributes = element.attributes.borrow();
    attributes.get(name).map(str::to_string)
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    if let Some(element) = node.as_element() {
        element
            .attributes
            .borrow_mut()
            .insert(name, value.to_string());
    }
}

pub fn remove_attr(node: &NodeRef, name: &str) {
    if let Some(element) = node.as_element() {
        element.attributes.borrow_mut().remove(name);
    }
}

pub fn has_class(node: &NodeRef, class: &str) -> bool {
    attr(node, "class")
        .map(|classes| classes.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// 最近的（含自身）带有指定 class 的祖先元素
pub fn closest_with_class(node: &NodeRef, class: &str) -> Option<NodeRef> {
    node.inclusive_ancestors().find(|n| has_class(n, class))
}

pub fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| child.to_string()).collect()
}

pub fn clear_children(node: &NodeRef) {
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        child.detach();
    }
}

/// 用 HTML 片段替换节点的全部子节点
pub fn set_inner_html(node: &NodeRef, html: &str) {
    clear_children(node);
    for child in parse_fragment(html) {
        node.append(child);
    }
}

/// 把 HTML 片段解析为一组独立（已脱离文档）的节点
///
/// 片段放在 body 中解析，适用于页脚这类流式内容。
pub fn parse_fragment(html: &str) -> Vec<NodeRef> {
    let wrapper = kuchikiki::parse_html().one(format!("<html><body>{}</body></html>", html));
    let Some(body) = select_first(&wrapper, "body") else {
        return Vec::new();
    };
    let children: Vec<NodeRef> = body.children().collect();
    for child in &children {
        child.detach();
    }
    children
}

/// 创建一个空元素
pub fn create_element(tag: &str) -> Option<NodeRef> {
    parse_fragment(&format!("<{tag}></{tag}>")).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div class="que multichoice" id="question-1-1"><div class="qtext"> Hello   <b>world</b> </div></div>
        <div class="que" id=""></div>
        <div id="page-footer"><div><div class="row footter_cc"><div class="footter_lc">orig</div></div></div></div>
    </body></html>"#;

    #[test]
    fn finds_questions_with_ids_only() {
        let doc = Document::parse(PAGE);
        let questions = doc.questions();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].0, "question-1-1");
        assert!(doc.element_by_id("question-1-1").is_some());
        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn text_is_whitespace_collapsed() {
        let doc = Document::parse(PAGE);
        let qtext = select_first(doc.root(), ".qtext").unwrap();
        assert_eq!(text_of(&qtext), "Hello world");
    }

    #[test]
    fn attributes_round_trip() {
        let doc = Document::parse(PAGE);
        let node = doc.element_by_id("question-1-1").unwrap();
        assert!(has_class(&node, "que"));
        assert!(!has_class(&node, "qu"));
        set_attr(&node, "data-test", "1");
        assert_eq!(attr(&node, "data-test").as_deref(), Some("1"));
        remove_attr(&node, "data-test");
        assert_eq!(attr(&node, "data-test"), None);
    }

    #[test]
    fn inner_html_can_be_replaced_and_restored() {
        let doc = Document::parse(PAGE);
        let footer = doc.summary_region().unwrap();
        let original = inner_html(&footer);
        assert!(original.contains("footter_lc"));

        set_inner_html(&footer, "<div class=\"x\">new</div>");
        assert_eq!(text_of(&footer), "new");

        set_inner_html(&footer, &original);
        assert_eq!(inner_html(&footer), original);
    }

    #[test]
    fn closest_walks_up_from_self() {
        let doc = Document::parse(PAGE);
        let bold = select_first(doc.root(), "b").unwrap();
        let question = closest_with_class(&bold, "que").unwrap();
        assert_eq!(attr(&question, "id").as_deref(), Some("question-1-1"));
    }

    #[test]
    fn create_element_is_detached() {
        let el = create_element("span").unwrap();
        assert!(el.parent().is_none());
        assert_eq!(&*el.as_element().unwrap().name.local, "span");
    }
}
