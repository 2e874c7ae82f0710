//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"在页面中执行脚本"的能力

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{AppResult, BrowserError};

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力
/// - 不认识题目和答案
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行脚本并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let js_code = js_code.into();
        debug!("执行脚本 ({} 字符)", js_code.len());
        let result = self.page.evaluate(js_code).await?;
        let json_value: JsonValue = result.into_value()?;
        Ok(json_value)
    }

    /// 执行脚本并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        serde_json::from_value(json_value.clone())
            .map_err(|_| BrowserError::UnexpectedValue(json_value.to_string()).into())
    }
}
