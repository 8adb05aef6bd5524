//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整套试卷的生成调度和用户会话，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 装配 provider、考试目录、组卷器和本地会话
//! - 分发命令行子命令
//!
//! ### `paper_assembler` - 组卷器
//! - 按考试目录串行生成每个科目
//! - 科目之间节流
//! - 去重、截断、判定"全部失败"
//!
//! ### `session` - 本地会话
//! - 出题、复习、交卷、重做等状态迁移
//! - 每次迁移后落盘
//!
//! ## 层次关系
//!
//! ```text
//! app (处理命令)
//!     ↓
//! session (处理状态迁移)
//!     ↓
//! paper_assembler (处理 Vec<Section>)
//!     ↓
//! workflow::SectionGenerator (处理单个科目)
//!     ↓
//! services (能力层：retry / prompt / parser / scoring / revision / store)
//!     ↓
//! clients (生成服务适配器：Gemini / OpenAI 兼容)
//! ```

pub mod app;
pub mod paper_assembler;
pub mod session;

// 重新导出主要类型
pub use app::{App, Command};
pub use paper_assembler::PaperAssembler;
pub use session::{CurrentPaper, Session, SessionEvent, View};
