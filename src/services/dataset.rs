//! 静态题库
//!
//! 没有配置在线补全时的答案来源：随程序分发的 TOML 文件，
//! 以题干文本为键，记录每个选项及其是否正确。
//!
//! ```toml
//! [[question]]
//! text = "What is the capital of France?"
//!
//! [[question.options]]
//! text = "Paris"
//! correct = true
//!
//! [[question.options]]
//! text = "London"
//! correct = false
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use crate::dom::normalize_text;
use crate::error::{AppResult, FileError};
use crate::models::CompletionAnswer;
use crate::services::matcher::is_match;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetOption {
    pub text: String,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub text: String,
    #[serde(default)]
    pub options: Vec<DatasetOption>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    question: Vec<DatasetEntry>,
}

/// 题干 → 选项列表的静态题库
#[derive(Debug, Clone, Default)]
pub struct StaticDataset {
    entries: Vec<DatasetEntry>,
    /// 规范化题干 → entries 下标
    index: HashMap<String, usize>,
}

impl StaticDataset {
    pub fn new(entries: Vec<DatasetEntry>) -> Self {
        let mut index = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            index.entry(lookup_key(&entry.text)).or_insert(i);
        }
        Self { entries, index }
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(content: &str, path: &str) -> AppResult<Self> {
        let file: DatasetFile = toml::from_str(content).map_err(|source| FileError::TomlParseFailed {
            path: path.to_string(),
            source,
        })?;
        Ok(Self::new(file.question))
    }

    /// 从文件加载
    pub async fn load(path: &Path) -> AppResult<Self> {
        let path_str = path.display().to_string();
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| FileError::ReadFailed {
                path: path_str.clone(),
                source,
            })?;
        let dataset = Self::from_toml_str(&content, &path_str)?;
        info!("✓ 已加载静态题库: {} ({} 道题)", path_str, dataset.len());
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按题干查找
    ///
    /// 先按规范化文本精确查找，找不到再做近似匹配。
    pub fn lookup(&self, question_text: &str) -> Option<&DatasetEntry> {
        let key = lookup_key(question_text);
        if let Some(&i) = self.index.get(&key) {
            return self.entries.get(i);
        }
        let found = self.entries.iter().find(|e| is_match(&e.text, question_text));
        if found.is_some() {
            debug!("题库近似命中: {}", question_text);
        }
        found
    }

    /// 查找并转换为答案，正确选项按题库中的顺序排列
    pub fn answer_for(&self, question_text: &str) -> Option<CompletionAnswer> {
        let entry = self.lookup(question_text)?;
        Some(CompletionAnswer {
            answers: entry
                .options
                .iter()
                .filter(|o| o.correct)
                .map(|o| o.text.clone())
                .collect(),
            explanation: "Answer taken from the bundled dataset.".to_string(),
        })
    }
}

fn lookup_key(text: &str) -> String {
    normalize_text(text).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[question]]
text = "What is the capital of France?"

[[question.options]]
text = "Paris"
correct = true

[[question.options]]
text = "London"

[[question]]
text = "Select all prime numbers."
options = [
  { text = "2", correct = true },
  { text = "4", correct = false },
  { text = "5", correct = true },
]
"#;

    #[test]
    fn test_parse_and_exact_lookup() {
        let dataset = StaticDataset::from_toml_str(SAMPLE, "sample.toml").unwrap();
        assert_eq!(dataset.len(), 2);

        let answer = dataset
            .answer_for("  what is the capital of   FRANCE? ")
            .unwrap();
        assert_eq!(answer.answers, vec!["Paris".to_string()]);
    }

    #[test]
    fn test_fuzzy_lookup_and_multiple_answers() {
        let dataset = StaticDataset::from_toml_str(SAMPLE, "sample.toml").unwrap();
        let answer = dataset.answer_for("Select all prime number").unwrap();
        assert_eq!(answer.answers, vec!["2".to_string(), "5".to_string()]);
        assert!(dataset.answer_for("Who wrote Hamlet?").is_none());
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let err = StaticDataset::from_toml_str("[[question]\n", "broken.toml").unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = tokio_test::block_on(StaticDataset::load(Path::new("definitely/not/here.toml")));
        assert!(result.is_err());
    }
}
