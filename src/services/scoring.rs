//! 判分 - 业务能力层

use crate::models::{Question, UserAnswers};

/// 正确率低于该值的科目记为薄弱科目
pub const WEAK_SUBJECT_THRESHOLD: f64 = 0.6;

/// 用户答案是否正确，未作答视为错误
pub fn is_correct(question: &Question, answers: &UserAnswers) -> bool {
    answers.get(&question.id) == Some(&question.correct_answer)
}

/// 单科统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectTally {
    pub subject: String,
    pub correct: usize,
    pub total: usize,
}

impl SubjectTally {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// 一次作答的判分结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptScore {
    pub score: usize,
    pub total: usize,
    /// 按科目首次出现的顺序排列
    pub subjects: Vec<SubjectTally>,
    pub weak_subjects: Vec<String>,
    pub mastery_gained: u32,
}

/// 给一份试卷判分
pub fn score_attempt(questions: &[Question], answers: &UserAnswers) -> AttemptScore {
    let mut subjects: Vec<SubjectTally> = Vec::new();
    let mut score = 0;

    for question in questions {
        let correct = is_correct(question, answers);
        if correct {
            score += 1;
        }

        let idx = match subjects.iter().position(|t| t.subject == question.subject) {
            Some(idx) => idx,
            None => {
                subjects.push(SubjectTally {
                    subject: question.subject.clone(),
                    correct: 0,
                    total: 0,
                });
                subjects.len() - 1
            }
        };
        subjects[idx].total += 1;
        if correct {
            subjects[idx].correct += 1;
        }
    }

    let weak_subjects = subjects
        .iter()
        .filter(|t| t.accuracy() < WEAK_SUBJECT_THRESHOLD)
        .map(|t| t.subject.clone())
        .collect();

    let total = questions.len();
    let mastery_gained = if total == 0 {
        0
    } else {
        (score as f64 / total as f64 * 100.0).round() as u32
    };

    AttemptScore {
        score,
        total,
        subjects,
        weak_subjects,
        mastery_gained,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, subject: &str, correct_answer: usize) -> Question {
        Question {
            id: id.to_string(),
            text: format!("question {}", id),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer,
            explanation: String::new(),
            success_logic: String::new(),
            subject: subject.to_string(),
        }
    }

    #[test]
    fn test_is_correct() {
        let q = question("q1", "Quant", 2);
        let mut answers = UserAnswers::new();
        assert!(!is_correct(&q, &answers));

        answers.insert("q1".into(), 2);
        assert!(is_correct(&q, &answers));

        for wrong in [0, 1, 3] {
            answers.insert("q1".into(), wrong);
            assert!(!is_correct(&q, &answers));
        }
    }

    #[test]
    fn test_score_attempt_weak_subjects() {
        let questions = vec![
            question("q1", "Quant", 0),
            question("q2", "English", 1),
            question("q3", "Quant", 2),
            question("q4", "English", 3),
            question("q5", "Reasoning", 0),
        ];
        let answers: UserAnswers = [
            ("q1".to_string(), 0),
            ("q2".to_string(), 1),
            ("q3".to_string(), 1),
            ("q4".to_string(), 3),
        ]
        .into_iter()
        .collect();

        let score = score_attempt(&questions, &answers);
        assert_eq!(score.score, 3);
        assert_eq!(score.total, 5);
        assert_eq!(score.mastery_gained, 60);
        assert_eq!(
            score.subjects.iter().map(|t| t.subject.as_str()).collect::<Vec<_>>(),
            vec!["Quant", "English", "Reasoning"]
        );
        // Quant 1/2 = 0.5，Reasoning 0/1
        assert_eq!(score.weak_subjects, vec!["Quant".to_string(), "Reasoning".to_string()]);
    }

    #[test]
    fn test_empty_paper_scores_zero() {
        let score = score_attempt(&[], &UserAnswers::new());
        assert_eq!(score.total, 0);
        assert_eq!(score.mastery_gained, 0);
        assert!(score.weak_subjects.is_empty());
    }
}
