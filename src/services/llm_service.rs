//! LLM 服务 - 业务能力层
//!
//! 只负责"向补全服务要答案"这一能力：构建提示词、调用接口、解析返回。
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - OpenAI 与 Mistral 都提供兼容 OpenAI 的接口，只需切换 API 地址
//! - 返回内容容忍多余文字，解析失败时降级为"只有解释、没有答案"

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, CompletionError};
use crate::models::{CompletionAnswer, Provider, Settings, Transcript};
use crate::services::answer_text::strip_answer_prefix;

/// 回复的 token 上限
pub const MAX_COMPLETION_TOKENS: u32 = 16384;

/// 缺少解释字段时使用的文本
pub const MISSING_EXPLANATION: &str = "No explanation provided.";

/// 要求模型只输出一个 JSON 对象的系统提示词
pub const SYSTEM_PROMPT: &str = r#"Your entire output MUST be a single, raw JSON object.
Do NOT include any other text, introductory phrases, or markdown formatting like ```json.
Your response must be directly parsable by a JSON parser.

The JSON object must have exactly two keys: "correct_answer" and "explanation".

1.  **"correct_answer"**: An array of strings. Each string is an exact answer text to be highlighted.
    -   For matching questions, each string is a full match, like "Term - Description".
    -   For ordering questions, each string is an item in the correct order.

2.  **"explanation"**: A string containing your detailed, step-by-step reasoning for arriving at the answer. This is where you explain your logic.

Example response:
{
  "correct_answer": [
    "Symbolic - C - Deals with explicit representations of knowledge using symbols and rules."
  ],
  "explanation": "The 'Symbolic' paradigm is defined by its use of explicit symbols and logical rules for knowledge representation and reasoning. Therefore, it directly matches description C."
}

Now, analyze the user's question and provide ONLY the raw JSON object as your response. DO NOT include any other text, introductory phrases, or markdown formatting like ```json.
---
"#;

/// 补全服务客户端
///
/// 职责：
/// - 按当前设置选择服务商、模型和 API Key
/// - 发送一道题的文本描述，返回结构化答案
/// - 不接触页面 DOM
pub struct LlmService {
    client: Client<OpenAIConfig>,
    provider: Provider,
    model_name: String,
}

impl LlmService {
    /// 按设置创建客户端
    ///
    /// 当前服务商没有 API Key 时直接返回错误，不发出任何网络请求。
    pub fn from_settings(config: &Config, settings: &Settings) -> AppResult<Self> {
        let provider = settings.selected_provider;
        let api_key = settings
            .api_key()
            .ok_or_else(|| CompletionError::MissingApiKey {
                provider: provider.to_string(),
            })?;

        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(config.api_base_for(provider));

        Ok(Self {
            client: Client::with_config(openai_config),
            provider,
            model_name: settings.model_name().to_string(),
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 向补全服务询问一道题的答案
    pub async fn ask(&self, transcript: &Transcript) -> AppResult<CompletionAnswer> {
        let raw = self.send_to_llm(transcript.as_str()).await?;
        Ok(parse_completion(&raw))
    }

    /// 发送一次聊天请求，返回原始文本
    async fn send_to_llm(&self, question: &str) -> AppResult<String> {
        debug!(
            "调用补全 API，服务商: {}, 模型: {}",
            self.provider, self.model_name
        );
        debug!("用户消息长度: {} 字符", question.len());

        let invalid = |e: async_openai::error::OpenAIError| {
            AppError::from(CompletionError::InvalidRequest(e.to_string()))
        };

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(build_system_prompt(question))
            .build()
            .map_err(invalid)?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(question)
            .build()
            .map_err(invalid)?;

        let messages = vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ];

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model_name).messages(messages);
        // Mistral 只认旧的 max_tokens 字段
        match self.provider {
            Provider::OpenAi => builder.max_completion_tokens(MAX_COMPLETION_TOKENS),
            Provider::Mistral => builder.max_tokens(MAX_COMPLETION_TOKENS),
        };
        let request = builder.build().map_err(invalid)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("补全 API 调用失败: {}", e);
            AppError::completion_failed(&self.model_name, format!("API request failed: {}", e))
        })?;

        debug!("补全 API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| CompletionError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

/// 系统提示词，末尾附上题目本身
pub fn build_system_prompt(question: &str) -> String {
    format!("{}{}", SYSTEM_PROMPT, question)
}

#[derive(Debug, Deserialize)]
struct RawCompletion {
    #[serde(default)]
    correct_answer: Option<Vec<String>>,
    #[serde(default)]
    explanation: Option<String>,
}

/// 解析补全服务的返回
///
/// 先截取第一个括号配平的 `{...}` 片段再解码，忽略前后的多余文字和
/// markdown 代码块。找不到或解码失败时，整段原文作为解释、答案为空。
pub fn parse_completion(response: &str) -> CompletionAnswer {
    let parsed = first_json_object(response)
        .and_then(|json| serde_json::from_str::<RawCompletion>(json).ok());

    match parsed {
        Some(raw) => CompletionAnswer {
            answers: raw
                .correct_answer
                .unwrap_or_default()
                .iter()
                .map(|answer| strip_answer_prefix(answer))
                .filter(|answer| !answer.is_empty())
                .collect(),
            explanation: raw
                .explanation
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| MISSING_EXPLANATION.to_string()),
        },
        None => {
            warn!("无法解析补全返回的 JSON，原文作为解释");
            CompletionAnswer {
                answers: Vec::new(),
                explanation: response.to_string(),
            }
        }
    }
}

/// 第一个括号配平的 `{...}` 片段（跳过字符串字面量中的括号）
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
