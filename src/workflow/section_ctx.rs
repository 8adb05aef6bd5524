//! 科目生成上下文
//!
//! 封装"我正在为哪场考试生成第几个科目"这一信息

use crate::models::{Difficulty, ExamType, GenerationRequest, Language};
use std::fmt::Display;

/// 科目生成上下文
///
/// 包含生成单个科目所需的所有上下文信息
#[derive(Debug, Clone)]
pub struct SectionCtx {
    /// 考试
    pub exam: ExamType,

    /// 科目名称
    pub section: String,

    /// 科目在试卷中的索引（从1开始，仅用于日志显示）
    pub section_index: usize,

    /// 科目总数（仅用于日志显示）
    pub section_total: usize,

    /// 本科目要求的题目数
    pub count: usize,

    pub language: Language,
    pub difficulty: Difficulty,

    /// 薄弱科目提示
    pub weak_areas: Vec<String>,
}

impl SectionCtx {
    /// 由生成请求创建某一科目的上下文
    pub fn from_request(
        request: &GenerationRequest,
        section: impl Into<String>,
        section_index: usize,
        section_total: usize,
        count: usize,
    ) -> Self {
        Self {
            exam: request.exam,
            section: section.into(),
            section_index,
            section_total,
            count,
            language: request.language,
            difficulty: request.difficulty,
            weak_areas: request.weak_areas.clone(),
        }
    }

    pub fn is_last(&self) -> bool {
        self.section_index >= self.section_total
    }
}

impl Display for SectionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} 科目#{}/{} {}]",
            self.exam, self.section_index, self.section_total, self.section
        )
    }
}
