//! Gemini 客户端
//!
//! 直接调用 `models/{model}:generateContent`，支持：
//! - `responseSchema` 约束输出为 JSON 数组
//! - `googleSearch` 工具校验 2024-2025 年的时事数据

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;
use tracing::{debug, warn};

use super::provider::{kind_from_markers, kind_from_status, GenerationCall, GenerativeProvider};
use crate::config::Config;
use crate::error::{ProviderError, ProviderErrorKind};

const PROVIDER_NAME: &str = "gemini";

/// Gemini 客户端
pub struct GeminiClient {
    http: Client,
    api_key: String,
    api_base_url: String,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ProviderError::transport(PROVIDER_NAME, format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base_url, model)
    }
}

/// 构建 generateContent 请求体
pub(crate) fn build_request_body(call: &GenerationCall) -> JsonValue {
    let mut body = json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": call.prompt }]
        }],
        "systemInstruction": {
            "parts": [{ "text": call.system_instruction }]
        },
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": call.output_schema
        }
    });

    if call.use_search_grounding {
        body["tools"] = json!([{ "googleSearch": {} }]);
    }

    body
}

/// 非 2xx 响应的归类
pub(crate) fn classify_status(status: u16, body: &str) -> ProviderError {
    let kind = kind_from_markers(body).unwrap_or_else(|| kind_from_status(status));
    ProviderError::new(kind, PROVIDER_NAME, extract_error_message(body)).with_status(status)
}

fn classify_request_error(err: reqwest::Error) -> ProviderError {
    let status = err.status().map(|s| s.as_u16());
    let kind = status
        .map(kind_from_status)
        .unwrap_or(ProviderErrorKind::Transport);
    let mut provider_err = ProviderError::new(kind, PROVIDER_NAME, err.to_string());
    provider_err.status = status;
    provider_err
}

/// 错误响应通常是 `{"error": {"code", "message", "status"}}`，取出可读部分
fn extract_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: ErrorBody,
    }
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        message: String,
        #[serde(default)]
        status: String,
    }

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.status.is_empty() => {
            format!("{}: {}", envelope.error.status, envelope.error.message)
        }
        Ok(envelope) => envelope.error.message,
        Err(_) => body.chars().take(300).collect(),
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// 从成功响应中取出第一个候选的全部文本
pub(crate) fn extract_text(body: &str) -> Result<String, ProviderError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::malformed(PROVIDER_NAME, format!("响应不是合法 JSON: {}", e)))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderError::malformed(PROVIDER_NAME, "响应中没有文本内容"));
    }

    Ok(text)
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn generate(&self, call: &GenerationCall) -> Result<String, ProviderError> {
        debug!("调用 Gemini API，模型: {}", call.model);
        debug!("Prompt 长度: {} 字符", call.prompt.len());

        let body = build_request_body(call);

        let response = self
            .http
            .post(self.endpoint(&call.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        let text = response.text().await.map_err(classify_request_error)?;

        if !status.is_success() {
            let err = classify_status(status.as_u16(), &text);
            warn!("Gemini API 调用失败: {}", err);
            return Err(err);
        }

        debug!("Gemini API 调用成功，响应 {} 字节", text.len());
        extract_text(&text)
    }
}
