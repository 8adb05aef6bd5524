//! 进度通知
//!
//! 每个科目在发出请求之前通知一次，调用是同步且串行的。

use tracing::info;

/// 进度回调
pub trait ProgressReporter: Send + Sync {
    fn on_section_start(&self, section: &str);
}

/// 不做任何事
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn on_section_start(&self, _section: &str) {}
}

/// 输出到日志
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingProgress;

impl ProgressReporter for LoggingProgress {
    fn on_section_start(&self, section: &str) {
        info!("📝 正在生成科目: {}", section);
    }
}

impl<F> ProgressReporter for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_section_start(&self, section: &str) {
        self(section)
    }
}
