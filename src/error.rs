//! 错误类型
//!
//! 应用层统一使用 [`AppError`]，它按领域聚合了下面几类子错误。
//! 二进制入口（`main.rs` / `App`）用 `anyhow` 包一层上下文即可。

use std::fmt;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 生成服务调用错误
    #[error("生成服务错误: {0}")]
    Provider(#[from] ProviderError),
    /// 试卷生成错误
    #[error("试卷生成错误: {0}")]
    Generation(#[from] GenerationError),
    /// 本地存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 考试目录错误
    #[error("考试目录错误: {0}")]
    Catalog(#[from] CatalogError),
}

/// 生成服务失败的分类标签
///
/// 由各个 provider 适配器在边界处设置，重试逻辑只看这个标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// 限流 / 配额耗尽（HTTP 429、RESOURCE_EXHAUSTED）
    RateLimited,
    /// 网络或服务端错误
    Transport,
    /// API Key 无效或无权限
    Auth,
    /// 响应无法解析
    Malformed,
}

impl ProviderErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ProviderErrorKind::RateLimited => "限流",
            ProviderErrorKind::Transport => "传输失败",
            ProviderErrorKind::Auth => "鉴权失败",
            ProviderErrorKind::Malformed => "响应格式错误",
        }
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 生成服务调用错误
#[derive(Debug, Clone, Error)]
#[error("{kind} ({provider}{}): {message}", status_suffix(.status))]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub provider: String,
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            provider: provider.into(),
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn rate_limited(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, provider, message)
    }

    pub fn transport(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, provider, message)
    }

    pub fn auth(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Auth, provider, message)
    }

    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Malformed, provider, message)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.kind == ProviderErrorKind::RateLimited
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(", HTTP {}", code)).unwrap_or_default()
}

/// 试卷生成错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 所有科目都没有返回题目
    #[error(
        "{exam} 试卷生成失败：{sections} 个科目均未返回题目，API 持续限流。请检查 API Key 配额，或更换难度后重试"
    )]
    TotalExhaustion {
        exam: String,
        sections: usize,
        last_failure: Option<ProviderErrorKind>,
    },
}

/// 本地存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 文件读写失败
    #[error("读写失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 序列化 / 反序列化失败
    #[error("键 {key} 的数据无法解析: {source}")]
    Serde {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("配置文件 {path} 解析失败: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 字段取值无效
    #[error("配置项 {field} 的值 '{value}' 无效")]
    InvalidValue { field: String, value: String },
}

/// 考试目录错误
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 未知考试
    #[error("未知考试: {key}")]
    UnknownExam { key: String },
    /// 考试结构不合法
    #[error("考试 {key} 结构不合法: {reason}")]
    InvalidStructure { key: String, reason: String },
}

impl AppError {
    /// 是否需要用户重新选择 API Key
    ///
    /// 全部科目失败且最后一次失败是鉴权错误时，调用方应走重新选 Key 的流程而不是重试。
    pub fn requires_key_reselection(&self) -> bool {
        match self {
            AppError::Provider(e) => e.kind == ProviderErrorKind::Auth,
            AppError::Generation(GenerationError::TotalExhaustion { last_failure, .. }) => {
                *last_failure == Some(ProviderErrorKind::Auth)
            }
            _ => false,
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display_includes_status() {
        let err = ProviderError::rate_limited("gemini", "RESOURCE_EXHAUSTED").with_status(429);
        let text = err.to_string();
        assert!(text.contains("HTTP 429"));
        assert!(text.contains("RESOURCE_EXHAUSTED"));
        assert!(err.is_rate_limited());
        assert_eq!(
            ProviderError::transport("openai-compatible", "reset").to_string(),
            "传输失败 (openai-compatible): reset"
        );
    }

    #[test]
    fn test_requires_key_reselection() {
        let auth = AppError::from(GenerationError::TotalExhaustion {
            exam: "UPSC".to_string(),
            sections: 6,
            last_failure: Some(ProviderErrorKind::Auth),
        });
        assert!(auth.requires_key_reselection());

        let quota = AppError::from(GenerationError::TotalExhaustion {
            exam: "UPSC".to_string(),
            sections: 6,
            last_failure: Some(ProviderErrorKind::RateLimited),
        });
        assert!(!quota.requires_key_reselection());
        assert!(quota.to_string().contains("API Key 配额"));
    }
}
