//! 科目生成流程 - 流程层
//!
//! 核心职责：定义"一个科目"的完整生成流程
//!
//! 流程顺序：
//! 1. 通知进度
//! 2. 构建 prompt 与输出 schema
//! 3. 带限流退避地调用生成服务
//! 4. 解析响应 → 规整题目
//!
//! 任何失败都记日志并降级为空结果，不向上传播。

use std::sync::Arc;
use tracing::{error, info};

use crate::clients::{GenerationCall, GenerativeProvider, Sleeper};
use crate::config::Config;
use crate::error::{ProviderError, ProviderErrorKind};
use crate::models::Question;
use crate::services::prompt::{build_section_prompt, output_schema, SYSTEM_INSTRUCTION};
use crate::services::response_parser::{normalize_questions, parse_section_response};
use crate::services::{generate_with_retry, RetryPolicy};
use crate::workflow::progress::ProgressReporter;
use crate::workflow::section_ctx::SectionCtx;

/// 单个科目的生成结果
#[derive(Debug, Clone, Default)]
pub struct SectionOutcome {
    /// 按模型返回顺序，数量不强制等于请求数
    pub questions: Vec<Question>,
    /// 失败时记录失败类别，供上层诊断
    pub failure: Option<ProviderErrorKind>,
}

impl SectionOutcome {
    fn failed(kind: ProviderErrorKind) -> Self {
        Self {
            questions: Vec::new(),
            failure: Some(kind),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// 科目生成器
///
/// - 编排单个科目的生成流程
/// - 不关心试卷有几个科目、科目之间如何节流
/// - 只依赖业务能力（services）和生成服务抽象
pub struct SectionGenerator {
    provider: Arc<dyn GenerativeProvider>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
    model_name: String,
    use_search_grounding: bool,
}

impl SectionGenerator {
    pub fn new(
        provider: Arc<dyn GenerativeProvider>,
        sleeper: Arc<dyn Sleeper>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            sleeper,
            policy: RetryPolicy::default(),
            model_name: model_name.into(),
            use_search_grounding: true,
        }
    }

    /// 按配置创建
    pub fn from_config(
        config: &Config,
        provider: Arc<dyn GenerativeProvider>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self::new(provider, sleeper, config.model_name.clone())
            .with_policy(RetryPolicy::from_config(config))
            .with_search_grounding(config.search_grounding)
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_search_grounding(mut self, enabled: bool) -> Self {
        self.use_search_grounding = enabled;
        self
    }

    /// 生成一个科目的题目
    pub async fn generate(&self, ctx: &SectionCtx, progress: &dyn ProgressReporter) -> SectionOutcome {
        progress.on_section_start(&ctx.section);
        info!("{} 🤖 请求 {} 道题...", ctx, ctx.count);

        let call = GenerationCall {
            model: self.model_name.clone(),
            prompt: build_section_prompt(ctx),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            output_schema: output_schema(),
            use_search_grounding: self.use_search_grounding,
        };

        match self.request_questions(ctx, &call).await {
            Ok(questions) => {
                info!(
                    "{} ✓ 收到 {} 道有效题目 (请求 {} 道)",
                    ctx,
                    questions.len(),
                    ctx.count
                );
                SectionOutcome {
                    questions,
                    failure: None,
                }
            }
            Err(e) => {
                error!("{} ❌ 科目生成失败，跳过: {}", ctx, e);
                SectionOutcome::failed(e.kind)
            }
        }
    }

    async fn request_questions(
        &self,
        ctx: &SectionCtx,
        call: &GenerationCall,
    ) -> Result<Vec<Question>, ProviderError> {
        let raw = generate_with_retry(
            self.provider.as_ref(),
            self.sleeper.as_ref(),
            call,
            &self.policy,
        )
        .await?;

        let items = parse_section_response(&raw)?;
        let questions = normalize_questions(&ctx.section, items);

        if questions.is_empty() {
            return Err(ProviderError::malformed(
                self.provider.name(),
                "响应中没有合法题目",
            ));
        }

        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, ExamType, GenerationRequest, Language};
    use crate::test_support::{questions_json, RecordingSleeper, ScriptedProvider};
    use crate::workflow::progress::NoopProgress;
    use std::sync::Mutex;
    use std::time::Duration;

    fn ctx() -> SectionCtx {
        let request = GenerationRequest::new(ExamType::Upsc, Language::English, Difficulty::Medium);
        SectionCtx::from_request(&request, "Polity", 2, 6, 17)
    }

    fn generator(provider: Arc<ScriptedProvider>, sleeper: Arc<RecordingSleeper>) -> SectionGenerator {
        SectionGenerator::new(provider, sleeper, "test-model")
            .with_policy(RetryPolicy::new(3, Duration::from_millis(10)))
    }

    #[tokio::test]
    async fn test_success_announces_and_returns_questions() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(questions_json("polity", 17))]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let seen = Mutex::new(Vec::new());
        let progress = |s: &str| seen.lock().unwrap().push(s.to_string());

        let outcome = generator(provider.clone(), sleeper)
            .generate(&ctx(), &progress)
            .await;

        assert_eq!(outcome.questions.len(), 17);
        assert!(outcome.failure.is_none());
        assert!(outcome.questions.iter().all(|q| q.subject == "Polity"));
        assert_eq!(*seen.lock().unwrap(), vec!["Polity"]);

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "test-model");
        assert!(calls[0].use_search_grounding);
        assert!(calls[0].prompt.contains("Subject: Polity"));
    }

    #[tokio::test]
    async fn test_failure_is_downgraded_to_empty() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::rate_limited("scripted", "429")),
            Err(ProviderError::rate_limited("scripted", "429")),
            Err(ProviderError::rate_limited("scripted", "429")),
        ]));
        let sleeper = Arc::new(RecordingSleeper::default());

        let outcome = generator(provider.clone(), sleeper.clone())
            .generate(&ctx(), &NoopProgress)
            .await;

        assert!(outcome.is_empty());
        assert_eq!(outcome.failure, Some(ProviderErrorKind::RateLimited));
        assert_eq!(provider.call_count(), 3);
        assert_eq!(sleeper.sleeps().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_response_is_section_failure() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("sorry, no questions".to_string())]));
        let sleeper = Arc::new(RecordingSleeper::default());

        let outcome = generator(provider, sleeper).generate(&ctx(), &NoopProgress).await;

        assert!(outcome.is_empty());
        assert_eq!(outcome.failure, Some(ProviderErrorKind::Malformed));
    }

    #[tokio::test]
    async fn test_all_items_invalid_is_section_failure() {
        let body = r#"[{"text":"x","options":["a","b"],"correctAnswer":0,"explanation":"e","successLogic":"s"}]"#;
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(body.to_string())]));
        let sleeper = Arc::new(RecordingSleeper::default());

        let outcome = generator(provider, sleeper).generate(&ctx(), &NoopProgress).await;

        assert_eq!(outcome.failure, Some(ProviderErrorKind::Malformed));
    }
}
