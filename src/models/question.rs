use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// 每道题固定的选项数
pub const OPTION_COUNT: usize = 4;

/// 用户作答：题目 ID → 选项下标
pub type UserAnswers = HashMap<String, usize>;

/// 题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
    /// "为什么这题大概率会考" 的一句话提示
    pub success_logic: String,
    pub subject: String,
}

impl Question {
    /// 是否满足 4 个选项、答案下标在范围内
    pub fn is_well_formed(&self) -> bool {
        self.options.len() == OPTION_COUNT && self.correct_answer < self.options.len()
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_answer).map(String::as_str)
    }

    /// 按内容生成题目 ID
    ///
    /// 同一道题（题干 + 选项归一化后相同）在不同批次中得到相同 ID，
    /// 错题本按 ID 去重时不会因时间戳不同而重复收录。
    pub fn fingerprint_id(section: &str, text: &str, options: &[String]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(normalize(text).as_bytes());
        for option in options {
            hasher.update([0x1f]);
            hasher.update(normalize(option).as_bytes());
        }
        let digest = hex::encode(hasher.finalize());
        format!("q-{}-{}", slugify(section), &digest[..16])
    }
}

/// 模型返回的原始题目（按输出 schema 反序列化）
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: i64,
    pub explanation: String,
    pub success_logic: String,
    #[serde(default)]
    pub subject: Option<String>,
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 科目名转成 ID 片段："Science & Tech" → "science-tech"
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let trimmed = slug.trim_end_matches('-');
    if trimmed.is_empty() {
        "section".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["1".into(), "2".into(), "3".into(), "4".into()]
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Science & Tech"), "science-tech");
        assert_eq!(slugify("Hindi/English"), "hindi-english");
        assert_eq!(slugify("  GA "), "ga");
        assert_eq!(slugify("&&"), "section");
    }

    #[test]
    fn test_fingerprint_id_is_stable_across_whitespace_and_case() {
        let a = Question::fingerprint_id("Quant", "What is 2 + 2?", &options());
        let b = Question::fingerprint_id("Quant", "what is  2 + 2? ", &options());
        assert_eq!(a, b);
        assert!(a.starts_with("q-quant-"));
        assert_eq!(a.len(), "q-quant-".len() + 16);
    }

    #[test]
    fn test_fingerprint_id_differs_by_options() {
        let mut other = options();
        other.swap(0, 1);
        let a = Question::fingerprint_id("Quant", "What is 2 + 2?", &options());
        let b = Question::fingerprint_id("Quant", "What is 2 + 2?", &other);
        assert_ne!(a, b);
    }

    #[test]
    fn test_question_serde_uses_camel_case() {
        let q = Question {
            id: "q-1".into(),
            text: "t".into(),
            options: options(),
            correct_answer: 2,
            explanation: "e".into(),
            success_logic: "s".into(),
            subject: "Math".into(),
        };
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["correctAnswer"], 2);
        assert_eq!(value["successLogic"], "s");
        assert!(q.is_well_formed());
        assert_eq!(q.correct_option(), Some("3"));
    }
}
