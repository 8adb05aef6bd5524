pub mod progress;
pub mod section_ctx;
pub mod section_flow;

pub use progress::{LoggingProgress, NoopProgress, ProgressReporter};
pub use section_ctx::SectionCtx;
pub use section_flow::{SectionGenerator, SectionOutcome};
