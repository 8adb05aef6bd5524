//! 组卷器 - 编排层
//!
//! ## 职责
//!
//! 按考试目录逐个科目生成题目，拼成一整套试卷：
//!
//! 1. 查询考试结构，计算每科题量 ceil(总题量 / 科目数)
//! 2. 按目录顺序串行生成每个科目（委托 `SectionGenerator`）
//! 3. 科目之间固定节流，最后一个科目之后不等待
//! 4. 全部为空 → `TotalExhaustion`；否则截断到总题量
//!
//! 单科失败不会中断组卷，只有"全部科目都没有题目"才会报错。

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::clients::{GenerativeProvider, Sleeper};
use crate::config::Config;
use crate::error::{AppResult, GenerationError, ProviderErrorKind};
use crate::models::{ExamCatalog, GenerationRequest, Question};
use crate::workflow::{ProgressReporter, SectionCtx, SectionGenerator};

/// 默认科目间隔
pub const DEFAULT_INTER_SECTION_DELAY: Duration = Duration::from_millis(10_000);

/// 组卷统计
#[derive(Debug, Default)]
struct AssemblyStats {
    succeeded: usize,
    failed: usize,
    generated: usize,
    duplicates: usize,
    last_failure: Option<ProviderErrorKind>,
}

/// 组卷器
pub struct PaperAssembler {
    catalog: Arc<ExamCatalog>,
    generator: SectionGenerator,
    sleeper: Arc<dyn Sleeper>,
    inter_section_delay: Duration,
}

impl PaperAssembler {
    pub fn new(catalog: Arc<ExamCatalog>, generator: SectionGenerator, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            catalog,
            generator,
            sleeper,
            inter_section_delay: DEFAULT_INTER_SECTION_DELAY,
        }
    }

    pub fn with_inter_section_delay(mut self, delay: Duration) -> Self {
        self.inter_section_delay = delay;
        self
    }

    /// 按配置装配完整的组卷器
    pub fn from_config(
        config: &Config,
        catalog: Arc<ExamCatalog>,
        provider: Arc<dyn GenerativeProvider>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let generator = SectionGenerator::from_config(config, provider, sleeper.clone());
        Self::new(catalog, generator, sleeper)
            .with_inter_section_delay(Duration::from_millis(config.inter_section_delay_ms))
    }

    pub fn catalog(&self) -> &ExamCatalog {
        &self.catalog
    }

    /// 生成整套试卷
    pub async fn generate_full_exam_paper(
        &self,
        request: &GenerationRequest,
        progress: &dyn ProgressReporter,
    ) -> AppResult<Vec<Question>> {
        let structure = self.catalog.lookup(request.exam)?;
        let section_total = structure.sections.len();
        let per_section = structure.questions_per_section();

        log_paper_start(request, structure.total_questions, section_total, per_section);

        let mut paper: Vec<Question> = Vec::with_capacity(per_section * section_total);
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut stats = AssemblyStats::default();

        for (idx, section) in structure.sections.iter().enumerate() {
            let ctx = SectionCtx::from_request(request, section.as_str(), idx + 1, section_total, per_section);
            let outcome = self.generator.generate(&ctx, progress).await;

            if outcome.is_empty() {
                stats.failed += 1;
                if outcome.failure.is_some() {
                    stats.last_failure = outcome.failure;
                }
            } else {
                stats.succeeded += 1;
                stats.generated += outcome.questions.len();
                for question in outcome.questions {
                    if seen_ids.insert(question.id.clone()) {
                        paper.push(question);
                    } else {
                        stats.duplicates += 1;
                    }
                }
            }

            if !ctx.is_last() {
                info!(
                    "⏸️ 等待 {:.1} 秒后生成下一个科目...",
                    self.inter_section_delay.as_secs_f64()
                );
                self.sleeper.sleep(self.inter_section_delay).await;
            }
        }

        if paper.is_empty() {
            log_paper_summary(request, &stats, 0);
            return Err(GenerationError::TotalExhaustion {
                exam: request.exam.key().to_string(),
                sections: section_total,
                last_failure: stats.last_failure,
            }
            .into());
        }

        paper.truncate(structure.total_questions);
        log_paper_summary(request, &stats, paper.len());

        Ok(paper)
    }
}

// ========== 日志辅助函数 ==========

fn log_paper_start(request: &GenerationRequest, total: usize, sections: usize, per_section: usize) {
    info!("{}", "=".repeat(60));
    info!("📄 开始生成试卷: {}", request.exam);
    info!(
        "🌐 语言: {} | 难度: {} | 共 {} 题 / {} 个科目 (每科 {} 题)",
        request.language, request.difficulty, total, sections, per_section
    );
    if !request.weak_areas.is_empty() {
        info!("🎯 薄弱科目: {}", request.weak_areas.join(", "));
    }
    info!("{}", "=".repeat(60));
}

fn log_paper_summary(request: &GenerationRequest, stats: &AssemblyStats, kept: usize) {
    info!("\n{}", "─".repeat(60));
    info!("📊 试卷 {} 生成统计", request.exam);
    info!("✅ 成功科目: {}", stats.succeeded);
    info!("❌ 失败科目: {}", stats.failed);
    info!("📝 生成题目: {} | 保留: {}", stats.generated, kept);
    if stats.duplicates > 0 {
        warn!("⚠️ 丢弃重复题目: {}", stats.duplicates);
    }
    info!("{}", "─".repeat(60));
}
