//! 集成测试共用的假生成服务

use async_trait::async_trait;
use exam_genie::clients::{GenerationCall, GenerativeProvider, Sleeper};
use exam_genie::error::ProviderError;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// 按脚本依次返回结果，脚本用完后一律返回传输错误
pub struct FakeProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate(&self, call: &GenerationCall) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(call.prompt.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::transport("fake", "script exhausted")))
    }
}

/// 记录等待时长、立即返回
#[derive(Default)]
pub struct InstantSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl InstantSleeper {
    pub fn total(&self) -> Duration {
        self.sleeps.lock().unwrap().iter().sum()
    }

    pub fn count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }
}

#[async_trait]
impl Sleeper for InstantSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// `count` 道合法题目，题干以 `prefix` 开头；需要时用 ```json 包裹
pub fn paper_section(prefix: &str, count: usize, fenced: bool) -> String {
    let items: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "text": format!("{} #{}", prefix, i),
                "options": ["w", "x", "y", "z"],
                "correctAnswer": (i + 1) % 4,
                "explanation": "see notes",
                "successLogic": "repeated in 2024"
            })
        })
        .collect();
    let body = serde_json::Value::Array(items).to_string();
    if fenced {
        format!("```json\n{}\n```", body)
    } else {
        body
    }
}
