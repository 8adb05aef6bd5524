//! 生成服务抽象
//!
//! 每个适配器负责把底层错误归类成 [`ProviderErrorKind`]，
//! 上层（重试、科目生成）只根据这个标签做判断。

use crate::config::{Config, ProviderKind};
use crate::error::{ProviderError, ProviderErrorKind};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use super::gemini_client::GeminiClient;
use super::openai_client::OpenAiCompatClient;

/// 一次生成请求
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationCall {
    pub model: String,
    pub prompt: String,
    pub system_instruction: String,
    /// 输出 schema（Gemini OpenAPI 子集）
    pub output_schema: JsonValue,
    /// 是否启用 Google 搜索校验
    pub use_search_grounding: bool,
}

/// 生成服务
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// 适配器名称（用于日志和错误信息）
    fn name(&self) -> &str;

    /// 发送一次请求，返回原始响应文本
    async fn generate(&self, call: &GenerationCall) -> Result<String, ProviderError>;
}

/// 按配置创建生成服务
pub fn build_provider(config: &Config) -> Result<Arc<dyn GenerativeProvider>, ProviderError> {
    if config.api_key.trim().is_empty() {
        tracing::warn!("⚠️ 未配置 API Key (LLM_API_KEY / GEMINI_API_KEY)，请求将被服务端拒绝");
    }

    let provider: Arc<dyn GenerativeProvider> = match config.provider {
        ProviderKind::Gemini => Arc::new(GeminiClient::new(config)?),
        ProviderKind::OpenAi => Arc::new(OpenAiCompatClient::new(config)?),
    };
    Ok(provider)
}

/// 按 HTTP 状态码归类
pub fn kind_from_status(status: u16) -> ProviderErrorKind {
    match status {
        429 => ProviderErrorKind::RateLimited,
        401 | 403 => ProviderErrorKind::Auth,
        _ => ProviderErrorKind::Transport,
    }
}

const RATE_LIMIT_MARKERS: [&str; 4] = [
    "RESOURCE_EXHAUSTED",
    "rate_limit_exceeded",
    "insufficient_quota",
    "Too Many Requests",
];

const AUTH_MARKERS: [&str; 5] = [
    "API_KEY_INVALID",
    "invalid_api_key",
    "PERMISSION_DENIED",
    "UNAUTHENTICATED",
    "Requested entity was not found",
];

/// 按服务端返回的错误文本识别已知标记
///
/// 只在适配器边界使用；识别不出时返回 `None`，由调用方按状态码兜底。
pub fn kind_from_markers(text: &str) -> Option<ProviderErrorKind> {
    if RATE_LIMIT_MARKERS.iter().any(|m| text.contains(m)) {
        return Some(ProviderErrorKind::RateLimited);
    }
    if AUTH_MARKERS.iter().any(|m| text.contains(m)) {
        return Some(ProviderErrorKind::Auth);
    }
    None
}
