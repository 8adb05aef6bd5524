//! OpenAI 兼容客户端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型（Gemini 的 OpenAI 兼容端点、本地推理服务等）
//!
//! chat 接口没有 Gemini 的 `responseSchema`，输出 schema 以文本形式写进系统消息，
//! 解析交给科目生成器（它能容忍 ```json 代码块）。搜索校验在此接口下不可用。
//!
//! `async-openai` 默认会对 429 / 5xx 自行指数退避重试（最长约 15 分钟），
//! 这里关掉它：每次 `generate` 只发一次请求，退避统一交给 `services::retry`。

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;
use tracing::{debug, warn};

use super::provider::{kind_from_markers, kind_from_status, GenerationCall, GenerativeProvider};
use crate::config::Config;
use crate::error::{ProviderError, ProviderErrorKind};

const PROVIDER_NAME: &str = "openai-compatible";

/// OpenAI 兼容客户端
pub struct OpenAiCompatClient {
    client: Client<OpenAIConfig>,
}

impl OpenAiCompatClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&config.api_base_url);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ProviderError::transport(PROVIDER_NAME, format!("无法创建 HTTP 客户端: {}", e)))?;

        // 第一次失败就放弃
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Ok(Self {
            client: Client::with_config(openai_config)
                .with_http_client(http)
                .with_backoff(no_retry),
        })
    }
}

/// 把输出 schema 附加到系统消息后面
pub(crate) fn build_system_message(call: &GenerationCall) -> String {
    let schema = serde_json::to_string_pretty(&call.output_schema).unwrap_or_default();
    format!(
        "{}\n\nRespond with a JSON array only, no prose. The array must match this schema:\n{}",
        call.system_instruction, schema
    )
}

fn classify_openai_error(err: OpenAIError) -> ProviderError {
    let message = err.to_string();
    let (kind, status) = match &err {
        OpenAIError::Reqwest(e) => {
            let status = e.status().map(|s| s.as_u16());
            let kind = kind_from_markers(&message)
                .or_else(|| status.map(kind_from_status))
                .unwrap_or(ProviderErrorKind::Transport);
            (kind, status)
        }
        OpenAIError::ApiError(_) => (
            kind_from_markers(&message).unwrap_or(ProviderErrorKind::Transport),
            None,
        ),
        // 其余均为请求构建或响应反序列化失败
        _ => (ProviderErrorKind::Malformed, None),
    };

    let mut provider_err = ProviderError::new(kind, PROVIDER_NAME, message);
    provider_err.status = status;
    provider_err
}

#[async_trait]
impl GenerativeProvider for OpenAiCompatClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn generate(&self, call: &GenerationCall) -> Result<String, ProviderError> {
        debug!("调用 OpenAI 兼容 API，模型: {}", call.model);
        debug!("用户消息长度: {} 字符", call.prompt.len());
        if call.use_search_grounding {
            debug!("OpenAI 兼容接口不支持搜索校验，已忽略");
        }

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(build_system_message(call))
            .build()
            .map_err(classify_openai_error)?;

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(call.prompt.as_str())
            .build()
            .map_err(classify_openai_error)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&call.model)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .temperature(0.7)
            .build()
            .map_err(classify_openai_error)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            let err = classify_openai_error(e);
            warn!("OpenAI 兼容 API 调用失败: {}", err);
            err
        })?;

        debug!("OpenAI 兼容 API 调用成功");

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ProviderError::malformed(PROVIDER_NAME, "返回内容为空"))
    }
}
