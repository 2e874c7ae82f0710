use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 正确选项的标记颜色
pub const HIGHLIGHT_COLOR: &str = "#f3fffa";

/// 正确答案的展示方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// 背景色填充
    Background,
    /// 下划线（更不显眼）
    #[default]
    Underline,
}

impl DisplayMode {
    /// 标记时追加到选项行上的内联样式
    pub fn marker_style(self) -> String {
        match self {
            DisplayMode::Background => format!("background-color: {};", HIGHLIGHT_COLOR),
            DisplayMode::Underline => format!(
                "text-decoration: underline; text-decoration-color: {}; text-decoration-thickness: 2px;",
                HIGHLIGHT_COLOR
            ),
        }
    }
}

/// 补全服务商
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAi,
    Mistral,
}

impl Provider {
    pub fn name(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Mistral => "mistral",
        }
    }

    /// 未选择模型时使用的默认模型
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o",
            Provider::Mistral => "mistral-large-latest",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "mistral" => Ok(Provider::Mistral),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// 答案来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    /// 在线调用补全服务
    #[default]
    Completion,
    /// 本地静态题库
    Dataset,
}

/// 持久化的用户设置（键值对）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub is_enabled: bool,
    /// 自动扫描页面上的新题目
    pub is_auto_mode: bool,
    /// 是否在页面上标记答案
    pub is_background: bool,
    pub display_mode: DisplayMode,
    pub selected_provider: Provider,
    pub openai_key: Option<String>,
    pub mistral_key: Option<String>,
    pub selected_model_name: Option<String>,
    pub answer_source: AnswerSource,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            is_enabled: true,
            is_auto_mode: true,
            is_background: true,
            display_mode: DisplayMode::default(),
            selected_provider: Provider::default(),
            openai_key: None,
            mistral_key: None,
            selected_model_name: None,
            answer_source: AnswerSource::default(),
        }
    }
}

impl Settings {
    /// 当前服务商的 API Key（空字符串视为未设置）
    pub fn api_key(&self) -> Option<&str> {
        let key = match self.selected_provider {
            Provider::OpenAi => self.openai_key.as_deref(),
            Provider::Mistral => self.mistral_key.as_deref(),
        };
        key.filter(|k| !k.trim().is_empty())
    }

    /// 实际使用的模型名称
    pub fn model_name(&self) -> &str {
        self.selected_model_name
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.selected_provider.default_model())
    }

    /// 是否应当在页面上标记答案
    pub fn should_highlight(&self) -> bool {
        self.is_enabled && self.is_background
    }

    /// 计算两份设置之间的变化
    pub fn diff(&self, new: &Settings) -> SettingsChange {
        fn changed<T: PartialEq + Copy>(old: T, new: T) -> Option<(T, T)> {
            (old != new).then_some((old, new))
        }
        SettingsChange {
            is_enabled: changed(self.is_enabled, new.is_enabled),
            is_auto_mode: changed(self.is_auto_mode, new.is_auto_mode),
            is_background: changed(self.is_background, new.is_background),
            display_mode: changed(self.display_mode, new.display_mode),
            credentials_changed: self.selected_provider != new.selected_provider
                || self.openai_key != new.openai_key
                || self.mistral_key != new.mistral_key
                || self.selected_model_name != new.selected_model_name
                || self.answer_source != new.answer_source,
        }
    }
}

/// 设置变化事件，每个字段为 `(旧值, 新值)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsChange {
    pub is_enabled: Option<(bool, bool)>,
    pub is_auto_mode: Option<(bool, bool)>,
    pub is_background: Option<(bool, bool)>,
    pub display_mode: Option<(DisplayMode, DisplayMode)>,
    pub credentials_changed: bool,
}

impl SettingsChange {
    pub fn is_empty(&self) -> bool {
        self.is_enabled.is_none()
            && self.is_auto_mode.is_none()
            && self.is_background.is_none()
            && self.display_mode.is_none()
            && !self.credentials_changed
    }

    /// 关闭了扩展、标记或自动模式，需要清除页面上的所有标记
    pub fn turns_off_visuals(&self) -> bool {
        matches!(self.is_enabled, Some((_, false)))
            || matches!(self.is_background, Some((_, false)))
            || matches!(self.is_auto_mode, Some((_, false)))
    }

    /// 重新开启了扩展或标记，需要重新处理页面上的题目
    pub fn turns_on_visuals(&self) -> bool {
        matches!(self.is_enabled, Some((false, true)))
            || matches!(self.is_background, Some((false, true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_follows_selected_provider() {
        let mut settings = Settings {
            openai_key: Some("sk-openai".to_string()),
            mistral_key: Some("  ".to_string()),
            ..Settings::default()
        };
        assert_eq!(settings.api_key(), Some("sk-openai"));

        settings.selected_provider = Provider::Mistral;
        assert_eq!(settings.api_key(), None);
    }

    #[test]
    fn model_name_defaults_per_provider() {
        let mut settings = Settings::default();
        assert_eq!(settings.model_name(), "gpt-4o");
        settings.selected_provider = Provider::Mistral;
        assert_eq!(settings.model_name(), "mistral-large-latest");
        settings.selected_model_name = Some("open-mistral-nemo".to_string());
        assert_eq!(settings.model_name(), "open-mistral-nemo");
    }

    #[test]
    fn diff_reports_toggles() {
        let old = Settings::default();
        let new = Settings {
            is_background: false,
            ..Settings::default()
        };
        let change = old.diff(&new);
        assert_eq!(change.is_background, Some((true, false)));
        assert!(change.turns_off_visuals());
        assert!(!change.turns_on_visuals());
        assert!(new.diff(&old).turns_on_visuals());
        assert!(old.diff(&old).is_empty());
    }

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("mistral".parse::<Provider>().unwrap(), Provider::Mistral);
        assert!("claude".parse::<Provider>().is_err());
    }

    #[test]
    fn settings_toml_uses_lowercase_enums() {
        let settings = Settings {
            display_mode: DisplayMode::Background,
            ..Settings::default()
        };
        let text = toml::to_string(&settings).unwrap();
        assert!(text.contains("display_mode = \"background\""));
        assert!(text.contains("selected_provider = \"openai\""));
    }
}
