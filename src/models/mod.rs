pub mod catalog;
pub mod exam;
pub mod loaders;
pub mod performance;
pub mod question;

pub use catalog::{ExamCatalog, ExamStructure};
pub use exam::{Difficulty, ExamType, GenerationRequest, Language};
pub use loaders::load_catalog_overrides;
pub use performance::{PlanType, Transaction, TransactionStatus, UserPerformance, UserProfile};
pub use question::{Question, RawQuestion, UserAnswers};
