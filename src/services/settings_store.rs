//! 设置持久化
//!
//! 设置保存在一个 TOML 文件中，文件不存在时使用默认值。
//! `reload` 重新读取文件并返回与内存中设置的差异，调用方据此决定
//! 清除还是重新处理页面上的标记。

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{AppResult, FileError};
use crate::models::{Settings, SettingsChange};

pub struct SettingsStore {
    path: PathBuf,
    current: Settings,
}

impl SettingsStore {
    /// 打开设置文件
    ///
    /// 文件不存在时返回默认设置（不会创建文件）；文件存在但无法解析时返回错误。
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let current = read_settings(&path).await?;
        info!("✓ 设置已加载: {}", path.display());
        Ok(Self { path, current })
    }

    pub fn current(&self) -> &Settings {
        &self.current
    }

    /// 重新读取设置文件
    ///
    /// 有变化时更新内存中的设置并返回差异；读取失败时保留旧设置。
    pub async fn reload(&mut self) -> Option<SettingsChange> {
        let fresh = match read_settings(&self.path).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("⚠️ 重新读取设置失败，保留当前设置: {}", e);
                return None;
            }
        };
        let change = self.current.diff(&fresh);
        if change.is_empty() {
            return None;
        }
        debug!("设置已变化: {:?}", change);
        self.current = fresh;
        Some(change)
    }

    /// 修改设置并写回文件，返回差异
    pub async fn update(&mut self, edit: impl FnOnce(&mut Settings)) -> AppResult<SettingsChange> {
        let mut next = self.current.clone();
        edit(&mut next);
        let change = self.current.diff(&next);
        if !change.is_empty() {
            write_settings(&self.path, &next).await?;
            self.current = next;
        }
        Ok(change)
    }

    /// 切换"标记答案"开关（页脚按钮的行为）
    pub async fn toggle_highlighting(&mut self) -> AppResult<SettingsChange> {
        let change = self
            .update(|settings| settings.is_background = !settings.is_background)
            .await?;
        info!(
            "🔀 标记答案已{}",
            if self.current.is_background { "开启" } else { "关闭" }
        );
        Ok(change)
    }
}

async fn read_settings(path: &Path) -> AppResult<Settings> {
    let path_str = path.display().to_string();
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("设置文件不存在，使用默认设置: {}", path_str);
            return Ok(Settings::default());
        }
        Err(source) => return Err(FileError::ReadFailed { path: path_str, source }.into()),
    };
    let settings = toml::from_str(&content)
        .map_err(|source| FileError::TomlParseFailed { path: path_str, source })?;
    Ok(settings)
}

async fn write_settings(path: &Path, settings: &Settings) -> AppResult<()> {
    let content = toml::to_string_pretty(settings).map_err(FileError::from)?;
    fs::write(path, content)
        .await
        .map_err(|source| FileError::WriteFailed {
            path: path.display().to_string(),
            source,
        })?;
    Ok(())
}
