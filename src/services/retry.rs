//! 限流重试 - 业务能力层
//!
//! 只负责"带退避地调用一次生成服务"，不关心 prompt 和解析。

use crate::clients::{GenerationCall, GenerativeProvider, Sleeper};
use crate::config::Config;
use crate::error::ProviderError;
use std::time::Duration;
use tracing::{debug, warn};

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最多尝试次数（含第一次）
    pub retries: u32,
    /// 第一次退避时长，之后每次翻倍
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 4,
            initial_backoff: Duration::from_millis(15_000),
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, initial_backoff: Duration) -> Self {
        Self {
            retries,
            initial_backoff,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.retries,
            Duration::from_millis(config.initial_backoff_ms),
        )
    }
}

/// 单次调用的重试状态，每次调用新建，调用结束即丢弃
#[derive(Debug)]
struct RetryState {
    attempt: u32,
    max_attempts: u32,
    current_backoff: Duration,
}

impl RetryState {
    fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempt: 0,
            max_attempts: policy.retries.max(1),
            current_backoff: policy.initial_backoff,
        }
    }

    fn has_remaining(&self) -> bool {
        self.attempt < self.max_attempts
    }

    /// 返回本次要等待的时长，并把下一次翻倍
    fn next_backoff(&mut self) -> Duration {
        let wait = self.current_backoff;
        self.current_backoff = wait.saturating_mul(2);
        wait
    }
}

/// 带限流退避的生成调用
///
/// - 成功立即返回
/// - 限流且还有剩余次数：等待当前退避时长，翻倍，再试
/// - 其他错误，或最后一次仍被限流：原样返回，不再重试
///
/// `retries = n` 时最多调用 n 次，等待 n - 1 次（B, 2B, 4B, ...）。
pub async fn generate_with_retry(
    provider: &dyn GenerativeProvider,
    sleeper: &dyn Sleeper,
    call: &GenerationCall,
    policy: &RetryPolicy,
) -> Result<String, ProviderError> {
    let mut state = RetryState::new(policy);

    loop {
        state.attempt += 1;

        match provider.generate(call).await {
            Ok(text) => {
                if state.attempt > 1 {
                    debug!("第 {} 次尝试成功", state.attempt);
                }
                return Ok(text);
            }
            Err(err) if err.is_rate_limited() && state.has_remaining() => {
                let wait = state.next_backoff();
                warn!(
                    "⏳ 触发限流 ({}), 等待 {:.1} 秒后进行第 {}/{} 次尝试...",
                    provider.name(),
                    wait.as_secs_f64(),
                    state.attempt + 1,
                    state.max_attempts
                );
                sleeper.sleep(wait).await;
            }
            Err(err) => {
                if err.is_rate_limited() {
                    warn!(
                        "❌ 限流重试次数已用完 ({} 次尝试): {}",
                        state.attempt, err
                    );
                }
                return Err(err);
            }
        }
    }
}
