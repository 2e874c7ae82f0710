//! 目标学习平台（Moodle 主题）的页面结构选择器

/// 单道题目的容器
pub const QUESTION: &str = ".que";
/// 题干
pub const QUESTION_TEXT: &str = ".qtext";

/// 排序题：答案容器
pub const ORDERING_CONTAINER: &str = ".answer.ordering";
/// 排序题：可拖拽的条目
pub const ORDERING_ITEM: &str = "li.sortableitem";

/// 匹配题：答案表格
pub const MATCHING_TABLE: &str = ".ablock table.answer";
/// 匹配题：表格行内的术语
pub const MATCHING_TERM: &str = ".text";

/// 填空题：题干里内嵌的下拉框
pub const GAP_SELECT: &str = ".qtext select.select";

/// 普通选择题：选项文本
pub const STANDARD_OPTION: &str = ".answer .flex-fill";
/// 普通选择题：选项所在的行（从选项文本向上找最近的这个 class）
pub const STANDARD_ROW_CLASS: &str = "d-flex";
/// 普通选择题：所有选项行
pub const STANDARD_ROW: &str = ".answer .d-flex";

/// 已作答题目中显示的正确答案
pub const RIGHT_ANSWER: &str = ".outcome .feedback .rightanswer";

/// 汇总区域（页脚）
pub const SUMMARY_REGION: &str = "#page-footer > div > div.row.footter_cc";
/// 汇总区域内放置加载提示的子节点
pub const SUMMARY_SLOT: &str = "#page-footer > div > div.row.footter_cc > div.footter_lc";

/// 页脚的弹出按钮，点击切换标记开关
pub const FOOTER_BUTTON: &str = r#"button[data-action="footer-popover"]"#;
