//! 响应解析 - 业务能力层
//!
//! 只负责"把模型返回的文本变成合法题目"，不关心题目来自哪个科目之外的流程。

use regex::Regex;
use tracing::warn;

use crate::error::ProviderError;
use crate::models::question::{Question, RawQuestion, OPTION_COUNT};

const PARSER_NAME: &str = "response-parser";

/// 去掉可能存在的 ```json 代码块包裹
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Ok(re) = Regex::new(r"(?s)^```(?:json|JSON)?\s*(.*?)\s*```$") {
        if let Some(inner) = re.captures(trimmed).and_then(|c| c.get(1)) {
            return inner.as_str();
        }
    }
    trimmed
}

/// 解析原始响应为题目数组
///
/// 解析失败或数组为空都算科目失败，返回 `Malformed`。
pub fn parse_section_response(raw: &str) -> Result<Vec<RawQuestion>, ProviderError> {
    let body = strip_code_fence(raw);
    let items: Vec<RawQuestion> = serde_json::from_str(body).map_err(|e| {
        ProviderError::malformed(PARSER_NAME, format!("无法按输出 schema 解析响应: {}", e))
    })?;

    if items.is_empty() {
        return Err(ProviderError::malformed(PARSER_NAME, "响应为空数组"));
    }

    Ok(items)
}

/// 把原始题目转为 [`Question`]
///
/// - 生成内容指纹 ID
/// - `subject` 缺省或为空时使用科目名
/// - 丢弃选项数不是 4 或答案下标越界的题目（记 warn）
pub fn normalize_questions(section: &str, raw: Vec<RawQuestion>) -> Vec<Question> {
    let mut questions = Vec::with_capacity(raw.len());

    for (idx, item) in raw.into_iter().enumerate() {
        if item.options.len() != OPTION_COUNT {
            warn!(
                "[{}] 丢弃第 {} 题：选项数为 {}",
                section,
                idx + 1,
                item.options.len()
            );
            continue;
        }

        let correct_answer = match usize::try_from(item.correct_answer) {
            Ok(answer) if answer < OPTION_COUNT => answer,
            _ => {
                warn!(
                    "[{}] 丢弃第 {} 题：答案下标 {} 越界",
                    section,
                    idx + 1,
                    item.correct_answer
                );
                continue;
            }
        };

        let subject = item
            .subject
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| section.to_string());

        questions.push(Question {
            id: Question::fingerprint_id(section, &item.text, &item.options),
            text: item.text,
            options: item.options,
            correct_answer,
            explanation: item.explanation,
            success_logic: item.success_logic,
            subject,
        });
    }

    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorKind;

    const ONE_ITEM: &str = r#"[{"text":"Capital of India?","options":["Mumbai","Delhi","Pune","Agra"],"correctAnswer":1,"explanation":"Delhi","successLogic":"basic GK"}]"#;

    #[test]
    fn test_parse_plain_and_fenced() {
        assert_eq!(parse_section_response(ONE_ITEM).unwrap().len(), 1);

        let fenced = format!("```json\n{}\n```", ONE_ITEM);
        assert_eq!(parse_section_response(&fenced).unwrap().len(), 1);

        let bare_fence = format!("```\n{}\n```", ONE_ITEM);
        assert_eq!(parse_section_response(&bare_fence).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_rejects_garbage_and_empty() {
        let err = parse_section_response("not json").unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Malformed);

        let err = parse_section_response("[]").unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Malformed);

        // 缺少必填字段
        let err = parse_section_response(r#"[{"text":"x"}]"#).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Malformed);
    }

    #[test]
    fn test_normalize_defaults_subject_and_drops_invalid() {
        let raw = parse_section_response(
            r#"[
                {"text":"ok","options":["a","b","c","d"],"correctAnswer":3,"explanation":"e","successLogic":"s"},
                {"text":"three options","options":["a","b","c"],"correctAnswer":0,"explanation":"e","successLogic":"s"},
                {"text":"bad index","options":["a","b","c","d"],"correctAnswer":4,"explanation":"e","successLogic":"s"},
                {"text":"negative","options":["a","b","c","d"],"correctAnswer":-1,"explanation":"e","successLogic":"s"},
                {"text":"tagged","options":["a","b","c","d"],"correctAnswer":0,"explanation":"e","successLogic":"s","subject":"Ancient History"}
            ]"#,
        )
        .unwrap();

        let questions = normalize_questions("History", raw);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].subject, "History");
        assert_eq!(questions[0].correct_answer, 3);
        assert_eq!(questions[1].subject, "Ancient History");
        assert!(questions.iter().all(Question::is_well_formed));
        assert!(questions[0].id.starts_with("q-history-"));
        assert_ne!(questions[0].id, questions[1].id);
    }
}
