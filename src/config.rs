use crate::error::ConfigError;
use crate::models::{Difficulty, ExamType, Language};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 配置文件默认路径（存在时才加载）
pub const DEFAULT_CONFIG_FILE: &str = "exam_genie.toml";

/// 生成服务类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Gemini 原生 generateContent 接口（支持 schema 与 Google 搜索）
    #[default]
    Gemini,
    /// 兼容 OpenAI 的 chat 接口
    #[serde(alias = "openai-compatible")]
    OpenAi,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "openai" | "openai-compatible" => Ok(ProviderKind::OpenAi),
            _ => Err(ConfigError::InvalidValue {
                field: "provider".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 生成服务配置 ---
    pub provider: ProviderKind,
    pub api_key: String,
    pub api_base_url: String,
    pub model_name: String,
    /// 是否开启 Google 搜索校验（仅 Gemini）
    pub search_grounding: bool,
    /// 单次 HTTP 请求超时（秒），两个适配器都生效
    pub request_timeout_secs: u64,
    // --- 重试与节流 ---
    /// 单次调用最多尝试次数
    pub retries: u32,
    /// 首次退避时长（毫秒），之后每次翻倍
    pub initial_backoff_ms: u64,
    /// 科目之间的固定间隔（毫秒）
    pub inter_section_delay_ms: u64,
    // --- 存储与目录 ---
    /// 本地数据目录
    pub data_dir: PathBuf,
    /// 考试目录覆盖文件
    pub catalog_file: Option<PathBuf>,
    // --- 日志 ---
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 运行日志文件
    pub output_log_file: String,
    // --- 命令行默认参数 ---
    pub exam: ExamType,
    pub language: Language,
    pub difficulty: Difficulty,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            api_key: String::new(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model_name: "gemini-3-pro-preview".to_string(),
            search_grounding: true,
            request_timeout_secs: 180,
            retries: 4,
            initial_backoff_ms: 15_000,
            inter_section_delay_ms: 10_000,
            data_dir: PathBuf::from("exam_genie_data"),
            catalog_file: None,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            exam: ExamType::SscCgl,
            language: Language::Hindi,
            difficulty: Difficulty::Medium,
        }
    }
}

impl Config {
    /// 只从环境变量读取，未设置或解析失败时使用默认值
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// 加载配置：TOML 文件（可选）→ 环境变量覆盖
    ///
    /// 未指定路径时，若当前目录存在 `exam_genie.toml` 则加载它。
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        };

        let base = match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(&path).map_err(|source| ConfigError::FileReadFailed {
                        path: path.display().to_string(),
                        source,
                    })?;
                Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                    path: path.display().to_string(),
                    source,
                })?
            }
            None => Self::default(),
        };

        Ok(base.apply_env())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn apply_env(self) -> Self {
        let default = self;
        Self {
            provider: env_parse("LLM_PROVIDER").unwrap_or(default.provider),
            api_key: std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .or_else(|_| std::env::var("API_KEY"))
                .unwrap_or(default.api_key),
            api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.api_base_url),
            model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.model_name),
            search_grounding: env_parse("SEARCH_GROUNDING").unwrap_or(default.search_grounding),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS")
                .unwrap_or(default.request_timeout_secs),
            retries: env_parse("RETRIES").unwrap_or(default.retries),
            initial_backoff_ms: env_parse("INITIAL_BACKOFF_MS").unwrap_or(default.initial_backoff_ms),
            inter_section_delay_ms: env_parse("INTER_SECTION_DELAY_MS")
                .unwrap_or(default.inter_section_delay_ms),
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.data_dir),
            catalog_file: std::env::var("CATALOG_FILE")
                .ok()
                .map(PathBuf::from)
                .or(default.catalog_file),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            exam: std::env::var("EXAM_TYPE")
                .ok()
                .and_then(|v| ExamType::from_key(&v))
                .unwrap_or(default.exam),
            language: env_parse("LANGUAGE").unwrap_or(default.language),
            difficulty: env_parse("DIFFICULTY").unwrap_or(default.difficulty),
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
