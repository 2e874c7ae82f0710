use crate::models::Provider;

/// 程序配置
///
/// 运行环境相关的配置，来自环境变量；用户可修改的开关见 `models::Settings`。
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 目标URL（测验页面）
    pub target_url: String,
    /// 目标页面标题关键字，找到已打开的页面时直接复用
    pub target_title: Option<String>,
    /// 设置文件路径（TOML）
    pub settings_file: String,
    /// 静态题库文件路径（TOML）
    pub dataset_file: String,
    /// 重新扫描页面的间隔（毫秒）
    pub scan_interval_ms: u64,
    /// 重新挂载页脚按钮监听的间隔（毫秒）
    pub button_poll_interval_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 补全服务地址 ---
    pub openai_api_base_url: String,
    pub mistral_api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            target_url: "about:blank".to_string(),
            target_title: None,
            settings_file: "quiz_lens.toml".to_string(),
            dataset_file: "dataset.toml".to_string(),
            scan_interval_ms: 1500,
            button_poll_interval_ms: 2000,
            verbose_logging: false,
            openai_api_base_url: "https://api.openai.com/v1".to_string(),
            mistral_api_base_url: "https://api.mistral.ai/v1".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_debug_port),
            target_url: std::env::var("TARGET_URL").unwrap_or(default.target_url),
            target_title: std::env::var("TARGET_TITLE").ok().or(default.target_title),
            settings_file: std::env::var("SETTINGS_FILE").unwrap_or(default.settings_file),
            dataset_file: std::env::var("DATASET_FILE").unwrap_or(default.dataset_file),
            scan_interval_ms: std::env::var("SCAN_INTERVAL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.scan_interval_ms),
            button_poll_interval_ms: std::env::var("BUTTON_POLL_INTERVAL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.button_poll_interval_ms),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            openai_api_base_url: std::env::var("OPENAI_API_BASE_URL").unwrap_or(default.openai_api_base_url),
            mistral_api_base_url: std::env::var("MISTRAL_API_BASE_URL").unwrap_or(default.mistral_api_base_url),
        }
    }

    /// 服务商对应的 API 地址
    pub fn api_base_for(&self, provider: Provider) -> &str {
        match provider {
            Provider::OpenAi => &self.openai_api_base_url,
            Provider::Mistral => &self.mistral_api_base_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_per_provider() {
        let config = Config::default();
        assert_eq!(config.api_base_for(Provider::OpenAi), "https://api.openai.com/v1");
        assert_eq!(config.api_base_for(Provider::Mistral), "https://api.mistral.ai/v1");
    }
}
