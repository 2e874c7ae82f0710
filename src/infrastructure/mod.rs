pub mod js_executor;
pub mod page_bridge;

pub use js_executor::JsExecutor;
pub use page_bridge::PageBridge;
