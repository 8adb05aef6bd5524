//! Prompt 构建 - 业务能力层
//!
//! 只负责"把一个科目的上下文变成生成请求的文本和输出 schema"，不调用网络。

use serde_json::{json, Value as JsonValue};

use crate::workflow::SectionCtx;

/// 系统指令
pub const SYSTEM_INSTRUCTION: &str = "You are an elite researcher. Your questions define selection chances. \
Format as JSON array: text, options(4), correctAnswer(0-3), explanation(short), successLogic(expert tip).";

/// 构建单个科目的出题 prompt
pub fn build_section_prompt(ctx: &SectionCtx) -> String {
    let mut prompt = format!(
        r#"Role: Senior Exam Content Researcher (15 years experience).
Mission: Generate a High-Probability Prediction Paper for {exam}.
Advantage: Use GOOGLE SEARCH to verify 2024-2025 data (Current Affairs, Economy, Law changes, latest events).

Subject: {section}
Language: {language}
Question Count: {count}
Overall Difficulty: {difficulty}

CRITICAL RULES:
1. DIFFICULTY MIX: 30% Easy (Fundamentals), 50% Moderate (Application), 20% Hard (Analytical).
2. GROUNDING: Verify facts using Google Search. Focus on 2024 and early 2025 updates.
3. DISTRACTORS: Options must be confusingly close.
4. SUCCESS LOGIC: For every question, include a 1-sentence expert shortcut or reasoning why this specific question has a high probability of appearing.
5. NO REPETITION: Every question must cover a unique concept.
6. FORMAT: Return exactly {count} questions in the specified JSON schema.
"#,
        exam = ctx.exam,
        section = ctx.section,
        language = ctx.language,
        count = ctx.count,
        difficulty = ctx.difficulty,
    );

    if !ctx.weak_areas.is_empty() {
        prompt.push_str(&format!(
            "\nCANDIDATE WEAK AREAS (give extra attention where relevant to this subject): {}\n",
            ctx.weak_areas.join(", ")
        ));
    }

    prompt
}

/// 输出 schema：题目对象数组，`subject` 可选
pub fn output_schema() -> JsonValue {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "text": { "type": "STRING" },
                "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                "correctAnswer": { "type": "INTEGER" },
                "explanation": { "type": "STRING" },
                "successLogic": { "type": "STRING" },
                "subject": { "type": "STRING" }
            },
            "required": ["text", "options", "correctAnswer", "explanation", "successLogic"]
        }
    })
}
