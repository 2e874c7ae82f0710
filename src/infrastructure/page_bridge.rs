//! 页面桥接 - 基础设施层
//!
//! 在真实页面和内存文档之间搬运数据：
//! - 读取整个页面的 HTML 快照
//! - 把展示层补丁写回页面
//! - 在页脚按钮上挂载点击计数，供主循环读取

use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::dom::{selectors, Document};
use crate::error::AppResult;
use crate::infrastructure::JsExecutor;
use crate::services::annotation::{MARKER_ATTR, SAVED_STYLE_ATTR};
use crate::workflow::PresentationPatch;

/// 页面上记录按钮点击次数的全局变量
const TOGGLE_COUNTER: &str = "__quizLensToggles";

const SNAPSHOT_SCRIPT: &str = "document.documentElement.outerHTML";

pub struct PageBridge {
    executor: JsExecutor,
}

impl PageBridge {
    pub fn new(executor: JsExecutor) -> Self {
        Self { executor }
    }

    /// 读取页面当前的 HTML 并解析为内存文档
    pub async fn snapshot(&self) -> AppResult<Document> {
        let html: String = self.executor.eval_as(SNAPSHOT_SCRIPT).await?;
        debug!("页面快照: {} 字节", html.len());
        Ok(Document::parse(&html))
    }

    /// 把补丁写回页面，返回页面上实际找到的选项行数
    pub async fn apply(&self, patch: &PresentationPatch) -> AppResult<u64> {
        let script = apply_patch_script(patch)?;
        let applied: u64 = self.executor.eval_as(script).await?;
        debug!(
            "补丁已写回: {} 行 (其中 {} 行已标记)",
            applied,
            patch.marked_rows()
        );
        Ok(applied)
    }

    /// 给页脚按钮挂上点击计数，已经挂过时不重复挂载
    pub async fn ensure_footer_listener(&self) -> AppResult<bool> {
        let attached: bool = self.executor.eval_as(footer_listener_script()).await?;
        if attached {
            info!("🔘 页脚按钮监听已挂载");
        }
        Ok(attached)
    }

    /// 读取并清零按钮点击次数
    pub async fn take_toggles(&self) -> AppResult<u64> {
        let value: JsonValue = self.executor.eval(take_toggles_script()).await?;
        Ok(value.as_u64().unwrap_or(0))
    }
}

/// 生成写回补丁的脚本
///
/// 补丁以 JSON 字面量嵌入脚本；属性为 `null` 时从元素上删除。
pub fn apply_patch_script(patch: &PresentationPatch) -> AppResult<String> {
    let payload = serde_json::to_string(patch)?;
    let region = serde_json::to_string(selectors::SUMMARY_REGION)?;
    let rows = serde_json::to_string(selectors::STANDARD_ROW)?;
    let marker = serde_json::to_string(MARKER_ATTR)?;
    let saved = serde_json::to_string(SAVED_STYLE_ATTR)?;

    Ok(format!(
        r#"(() => {{
  const patch = {payload};
  const setOrRemove = (el, name, value) => {{
    if (value === null || value === undefined) {{
      el.removeAttribute(name);
    }} else if (el.getAttribute(name) !== value) {{
      el.setAttribute(name, value);
    }}
  }};
  const region = document.querySelector({region});
  if (region && patch.summary_html !== null && region.innerHTML !== patch.summary_html) {{
    region.innerHTML = patch.summary_html;
  }}
  let applied = 0;
  for (const row of patch.rows) {{
    const question = document.getElementById(row.question_id);
    if (!question) continue;
    const el = question.querySelectorAll({rows})[row.row_index];
    if (!el) continue;
    setOrRemove(el, {marker}, row.marked ? "true" : null);
    setOrRemove(el, {saved}, row.saved_style);
    setOrRemove(el, "style", row.style);
    applied += 1;
  }}
  return applied;
}})()"#
    ))
}

fn footer_listener_script() -> String {
    format!(
        r#"(() => {{
  const button = document.querySelector({button:?});
  if (!button || button.dataset.quizLensListener) return false;
  button.dataset.quizLensListener = "true";
  window.{counter} = window.{counter} || 0;
  button.addEventListener("click", () => {{ window.{counter} += 1; }});
  return true;
}})()"#,
        button = selectors::FOOTER_BUTTON,
        counter = TOGGLE_COUNTER,
    )
}

fn take_toggles_script() -> String {
    format!(
        "(() => {{ const n = window.{counter} || 0; window.{counter} = 0; return n; }})()",
        counter = TOGGLE_COUNTER
    )
}
