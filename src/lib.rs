//! # Exam Genie
//!
//! 调用生成式模型为各类考试生成高命中率预测试卷的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 生成服务适配器，在边界处把失败归类为 [`ProviderErrorKind`]
//! - `GeminiClient` - 原生 generateContent（responseSchema + googleSearch）
//! - `OpenAiCompatClient` - OpenAI 兼容的 chat 接口
//! - `Sleeper` - 可替换的等待能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程顺序
//! - `retry` - 限流退避
//! - `prompt` / `response_parser` - 出题 prompt 与响应解析
//! - `scoring` / `revision` - 判分与错题本
//! - `local_store` - 本地 JSON 存储
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个科目"的完整生成流程
//! - `SectionCtx` - 上下文封装（考试 + 科目序号）
//! - `SectionGenerator` - 流程编排（prompt → retry → parse → normalize）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/paper_assembler` - 组卷器，串行生成并节流
//! - `orchestrator/session` - 本地会话状态
//! - `orchestrator/app` - 应用入口
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;

// 重新导出常用类型
pub use clients::{GenerationCall, GenerativeProvider, Sleeper, TokioSleeper};
pub use config::Config;
pub use error::{AppError, AppResult, GenerationError, ProviderError, ProviderErrorKind};
pub use models::{
    Difficulty, ExamCatalog, ExamStructure, ExamType, GenerationRequest, Language, Question,
    UserPerformance,
};
pub use orchestrator::{App, Command, PaperAssembler, Session, SessionEvent, View};
pub use services::{select_revision_set, select_revision_set_with_rng};
pub use workflow::{ProgressReporter, SectionGenerator};
