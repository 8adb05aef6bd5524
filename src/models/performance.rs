//! 作答记录、用户档案与订单
//!
//! 字段名保持 camelCase，与本地存储里已有的数据兼容。

use crate::models::exam::{Difficulty, ExamType};
use crate::models::question::{Question, UserAnswers};
use serde::{Deserialize, Serialize};

/// 当前时间（毫秒时间戳）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 一次作答记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPerformance {
    pub id: String,
    pub exam_type: ExamType,
    pub difficulty: Difficulty,
    pub total_score: usize,
    pub total_questions: usize,
    pub questions: Vec<Question>,
    pub user_answers: UserAnswers,
    pub weak_subjects: Vec<String>,
    pub mastery_gained: u32,
    pub last_tested_at: i64,
    pub time_spent_seconds: u64,
}

/// 订阅套餐
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlanType {
    #[default]
    Free,
    Starter,
    Advanced,
    Mastery,
}

/// 用户档案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub avatar: String,
    pub plan: PlanType,
    pub mastery_points: u64,
    pub joined_at: i64,
    pub streak: u32,
    pub last_active: i64,
}

impl Default for UserProfile {
    fn default() -> Self {
        let now = now_millis();
        Self {
            name: "Aspirant".to_string(),
            avatar: String::new(),
            plan: PlanType::Free,
            mastery_points: 0,
            joined_at: now,
            streak: 0,
            last_active: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Success,
    Pending,
}

/// 订单记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub plan: PlanType,
    pub amount: f64,
    pub date: i64,
    pub status: TransactionStatus,
}
