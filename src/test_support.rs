//! 单元测试共用的假实现

use crate::clients::{GenerationCall, GenerativeProvider, Sleeper};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// 按预设脚本依次返回结果的生成服务
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<GenerationCall>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<GenerationCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, call: &GenerationCall) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(call.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::transport("scripted", "脚本已用完")))
    }
}

/// 只记录等待时长、不真正挂起的 Sleeper
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// 生成 `count` 道合法题目的 JSON 响应，题干带上前缀保证内容互不相同
pub fn questions_json(prefix: &str, count: usize) -> String {
    let items: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "text": format!("{} question {}", prefix, i),
                "options": ["A", "B", "C", "D"],
                "correctAnswer": i % 4,
                "explanation": "because",
                "successLogic": "asked every year"
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}
