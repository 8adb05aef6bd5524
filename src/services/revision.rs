//! 错题本 - 业务能力层
//!
//! 从历史作答中收集答错的题目，组成复习卷。

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::models::{Question, UserPerformance};
use crate::services::scoring::is_correct;

/// 复习卷最多题数
pub const REVISION_SET_LIMIT: usize = 20;

/// 按历史顺序、卷内顺序收集错题，按 ID 去重（保留首次出现）
pub fn collect_mistakes(history: &[UserPerformance]) -> Vec<Question> {
    let mut seen = HashSet::new();
    let mut mistakes = Vec::new();

    for attempt in history {
        for question in &attempt.questions {
            if !is_correct(question, &attempt.user_answers) && seen.insert(question.id.as_str()) {
                mistakes.push(question.clone());
            }
        }
    }

    mistakes
}

/// 组成复习卷：取前 20 道错题后打乱
pub fn select_revision_set(history: &[UserPerformance]) -> Vec<Question> {
    select_revision_set_with_rng(history, &mut rand::thread_rng())
}

/// 同 [`select_revision_set`]，可注入随机数源
pub fn select_revision_set_with_rng<R: Rng + ?Sized>(
    history: &[UserPerformance],
    rng: &mut R,
) -> Vec<Question> {
    let mut selected = collect_mistakes(history);
    selected.truncate(REVISION_SET_LIMIT);
    selected.shuffle(rng);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, ExamType, UserAnswers};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            text: format!("question {}", id),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: 0,
            explanation: String::new(),
            success_logic: String::new(),
            subject: "GA".to_string(),
        }
    }

    fn attempt(questions: Vec<Question>, answers: UserAnswers) -> UserPerformance {
        UserPerformance {
            id: "perf".to_string(),
            exam_type: ExamType::SscCgl,
            difficulty: Difficulty::Medium,
            total_score: 0,
            total_questions: questions.len(),
            questions,
            user_answers: answers,
            weak_subjects: Vec::new(),
            mastery_gained: 0,
            last_tested_at: 0,
            time_spent_seconds: 0,
        }
    }

    #[test]
    fn test_no_mistakes_gives_empty_set() {
        let questions: Vec<_> = (0..5).map(|i| question(&format!("q{}", i))).collect();
        let answers = questions.iter().map(|q| (q.id.clone(), 0)).collect();
        let history = vec![attempt(questions, answers)];

        assert!(select_revision_set(&history).is_empty());
        assert!(select_revision_set(&[]).is_empty());
    }

    #[test]
    fn test_missing_answer_counts_as_mistake() {
        let history = vec![attempt(vec![question("q1"), question("q2")], UserAnswers::new())];
        assert_eq!(collect_mistakes(&history).len(), 2);
    }

    #[test]
    fn test_duplicate_ids_keep_first_occurrence() {
        let wrong: UserAnswers = [("dup".to_string(), 1)].into_iter().collect();
        let mut later = question("dup");
        later.text = "later copy".to_string();
        let history = vec![
            attempt(vec![question("dup")], wrong.clone()),
            attempt(vec![later, question("other")], wrong),
        ];

        let mistakes = collect_mistakes(&history);
        assert_eq!(mistakes.len(), 2);
        assert_eq!(mistakes[0].text, "question dup");
        assert_eq!(mistakes[1].id, "other");
    }

    #[test]
    fn test_caps_at_twenty_distinct_from_first_twenty() {
        let first: Vec<_> = (0..15).map(|i| question(&format!("a{}", i))).collect();
        let second: Vec<_> = (0..10).map(|i| question(&format!("b{}", i))).collect();
        let history = vec![
            attempt(first, UserAnswers::new()),
            attempt(second, UserAnswers::new()),
        ];
        let expected: HashSet<String> = collect_mistakes(&history)
            .into_iter()
            .take(REVISION_SET_LIMIT)
            .map(|q| q.id)
            .collect();

        let mut rng = StdRng::seed_from_u64(7);
        let selected = select_revision_set_with_rng(&history, &mut rng);

        assert_eq!(selected.len(), REVISION_SET_LIMIT);
        let ids: HashSet<String> = selected.into_iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), REVISION_SET_LIMIT);
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_selection_is_shuffled() {
        let questions: Vec<_> = (0..REVISION_SET_LIMIT).map(|i| question(&format!("q{}", i))).collect();
        let history = vec![attempt(questions, UserAnswers::new())];
        let in_order: Vec<String> = collect_mistakes(&history).into_iter().map(|q| q.id).collect();

        let mut rng = StdRng::seed_from_u64(42);
        let shuffled: Vec<String> = select_revision_set_with_rng(&history, &mut rng)
            .into_iter()
            .map(|q| q.id)
            .collect();

        assert_ne!(shuffled, in_order);
        let mut sorted = shuffled.clone();
        sorted.sort();
        let mut expected = in_order.clone();
        expected.sort();
        assert_eq!(sorted, expected);

        // 同一种子结果可复现
        let mut again = StdRng::seed_from_u64(42);
        let replay: Vec<String> = select_revision_set_with_rng(&history, &mut again)
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(replay, shuffled);
    }
}
