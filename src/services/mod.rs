//! 业务能力层（Capability Layer）
//!
//! 每个模块只提供一种能力，不关心流程顺序：
//! - `retry`：带限流退避的生成调用
//! - `prompt` / `response_parser`：出题 prompt 与响应解析
//! - `scoring` / `revision`：判分与错题本
//! - `local_store`：按键读写 JSON

pub mod local_store;
pub mod prompt;
pub mod response_parser;
pub mod retry;
pub mod revision;
pub mod scoring;

pub use local_store::LocalStore;
pub use retry::{generate_with_retry, RetryPolicy};
pub use revision::{select_revision_set, select_revision_set_with_rng, REVISION_SET_LIMIT};
pub use scoring::{is_correct, score_attempt, AttemptScore, SubjectTally};
