//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::Settings;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`；未设置时默认 `info`，开启详细日志时为 `debug`。
/// 重复调用不会报错（测试中常见）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quiz_lens={},warn", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, settings: &Settings) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 测验答案标注模式");
    info!(
        "🕐 启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 浏览器调试端口: {}", config.browser_debug_port);
    info!(
        "⚙️ 扩展: {}, 自动模式: {}, 标记答案: {}",
        on_off(settings.is_enabled),
        on_off(settings.is_auto_mode),
        on_off(settings.is_background)
    );
    info!(
        "🤖 答案来源: {:?}, 服务商: {}, 模型: {}",
        settings.answer_source,
        settings.selected_provider,
        settings.model_name()
    );
    info!("{}", "=".repeat(60));
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "开启"
    } else {
        "关闭"
    }
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("这是一段很长的题干文本", 4), "这是一段...");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
