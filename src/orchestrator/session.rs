//! 会话状态 - 编排层
//!
//! 持有一个本地用户的全部状态（档案、历史、订单、当前试卷、当前视图），
//! 每次状态迁移后立即落盘到 [`LocalStore`]。
//!
//! ```text
//! Dashboard ─start_exam_flow─▶ Instructions ─begin_quiz─▶ Quiz ─complete_quiz─▶ Results
//!     │          (失败回到 Selector)
//!     ├─start_revision_vault─▶ Instructions
//!     └─re_attempt──────────▶ Instructions
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::{AppError, StoreError};
use crate::models::performance::now_millis;
use crate::models::{
    Difficulty, ExamType, GenerationRequest, Language, Question, Transaction, UserAnswers,
    UserPerformance, UserProfile,
};
use crate::orchestrator::paper_assembler::PaperAssembler;
use crate::services::local_store::{
    current_paper_key, history_key, profile_key, txns_key, LocalStore, LOCAL_USER_ID, SESSION_KEY,
};
use crate::services::{score_attempt, select_revision_set_with_rng, AttemptScore};
use crate::workflow::ProgressReporter;

const SESSION_ACTIVE: &str = "active";

/// 当前视图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Selector,
    Instructions,
    Quiz,
    Results,
    History,
    Plans,
}

/// 状态迁移的结果，交给展示层决定如何提示用户
#[derive(Debug)]
pub enum SessionEvent {
    /// 试卷已生成，进入考前说明
    PaperReady { questions: usize },
    /// 复习卷已组好
    RevisionReady { questions: usize },
    /// 历史中没有错题
    NoMistakes,
    /// 生成失败，已回到选择页
    GenerationFailed(AppError),
    /// API Key 无效，需要重新选择
    ApiKeyReselectionRequired(AppError),
}

/// 落盘的当前试卷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPaper {
    pub exam_type: ExamType,
    pub language: Language,
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
}

/// 本地会话
pub struct Session {
    store: LocalStore,
    pub logged_in: bool,
    pub profile: UserProfile,
    /// 最近的作答在前
    pub history: Vec<UserPerformance>,
    /// 最近的订单在前
    pub transactions: Vec<Transaction>,
    pub current_exam: Option<ExamType>,
    pub language: Language,
    pub difficulty: Difficulty,
    pub current_questions: Vec<Question>,
    pub user_answers: UserAnswers,
    pub view: View,
}

impl Session {
    fn empty(store: LocalStore) -> Self {
        Self {
            store,
            logged_in: false,
            profile: UserProfile::default(),
            history: Vec::new(),
            transactions: Vec::new(),
            current_exam: None,
            language: Language::default(),
            difficulty: Difficulty::default(),
            current_questions: Vec::new(),
            user_answers: UserAnswers::new(),
            view: View::default(),
        }
    }

    /// 从存储恢复会话；没有登录标记时返回未登录的空会话
    pub fn load(store: LocalStore) -> Result<Self, StoreError> {
        let mut session = Self::empty(store);
        if session.store.get::<String>(SESSION_KEY)?.is_some() {
            session.logged_in = true;
            session.load_user_data()?;
        }
        Ok(session)
    }

    fn load_user_data(&mut self) -> Result<(), StoreError> {
        let uid = LOCAL_USER_ID;
        self.profile = self.store.get(&profile_key(uid))?.unwrap_or_default();
        self.history = self.store.get(&history_key(uid))?.unwrap_or_default();
        self.transactions = self.store.get(&txns_key(uid))?.unwrap_or_default();

        if let Some(paper) = self.store.get::<CurrentPaper>(&current_paper_key(uid))? {
            self.current_exam = Some(paper.exam_type);
            self.language = paper.language;
            self.difficulty = paper.difficulty;
            self.current_questions = paper.questions;
        }

        info!(
            "👤 已加载用户数据: {} 条作答记录, {} 条订单",
            self.history.len(),
            self.transactions.len()
        );
        Ok(())
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn login(&mut self) -> Result<(), StoreError> {
        self.store.set(SESSION_KEY, SESSION_ACTIVE)?;
        self.logged_in = true;
        self.load_user_data()
    }

    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.store.remove(SESSION_KEY)?;
        self.logged_in = false;
        self.view = View::Dashboard;
        Ok(())
    }

    /// 清空所有本地数据，回到初始状态
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.store.clear()?;
        let store = self.store.clone();
        *self = Self::empty(store);
        warn!("🗑️ 本地数据已全部清空");
        Ok(())
    }

    pub fn navigate(&mut self, view: View) {
        self.view = view;
    }

    /// 最近一次同类考试的薄弱科目
    pub fn weak_areas_for(&self, exam: ExamType) -> Vec<String> {
        self.history
            .iter()
            .find(|perf| perf.exam_type == exam)
            .map(|perf| perf.weak_subjects.clone())
            .unwrap_or_default()
    }

    /// 生成新试卷
    ///
    /// 成功进入考前说明；失败回到选择页，鉴权类失败要求重新选择 API Key。
    /// 只有试卷落盘后才替换当前考试和题目，失败时保留上一套试卷。
    pub async fn start_exam_flow(
        &mut self,
        assembler: &PaperAssembler,
        exam: ExamType,
        language: Language,
        difficulty: Difficulty,
        progress: &dyn ProgressReporter,
    ) -> SessionEvent {
        let request = GenerationRequest::new(exam, language, difficulty)
            .with_weak_areas(self.weak_areas_for(exam));

        let questions = match assembler.generate_full_exam_paper(&request, progress).await {
            Ok(questions) => questions,
            Err(e) => {
                error!("❌ 试卷生成失败: {}", e);
                self.view = View::Selector;
                return if e.requires_key_reselection() {
                    SessionEvent::ApiKeyReselectionRequired(e)
                } else {
                    SessionEvent::GenerationFailed(e)
                };
            }
        };

        let paper = CurrentPaper {
            exam_type: exam,
            language,
            difficulty,
            questions,
        };
        if let Err(e) = self.store.set(&current_paper_key(LOCAL_USER_ID), &paper) {
            error!("❌ 试卷保存失败: {}", e);
            self.view = View::Selector;
            return SessionEvent::GenerationFailed(e.into());
        }

        let count = paper.questions.len();
        self.current_exam = Some(paper.exam_type);
        self.language = paper.language;
        self.difficulty = paper.difficulty;
        self.current_questions = paper.questions;
        self.user_answers.clear();

        self.view = View::Instructions;
        SessionEvent::PaperReady { questions: count }
    }

    /// 组复习卷
    pub fn start_revision_vault<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SessionEvent {
        let questions = select_revision_set_with_rng(&self.history, rng);
        if questions.is_empty() {
            info!("📭 历史中没有错题");
            return SessionEvent::NoMistakes;
        }

        let count = questions.len();
        self.current_exam = Some(
            self.history
                .first()
                .map(|perf| perf.exam_type)
                .unwrap_or(ExamType::SscCgl),
        );
        self.current_questions = questions;
        self.user_answers.clear();
        self.view = View::Instructions;
        SessionEvent::RevisionReady { questions: count }
    }

    /// 重做历史中的某一次作答
    pub fn re_attempt(&mut self, performance_index: usize) -> bool {
        let Some(perf) = self.history.get(performance_index) else {
            return false;
        };
        self.current_exam = Some(perf.exam_type);
        self.difficulty = perf.difficulty;
        self.current_questions = perf.questions.clone();
        self.user_answers.clear();
        self.view = View::Instructions;
        true
    }

    pub fn begin_quiz(&mut self) {
        if self.current_exam.is_some() && !self.current_questions.is_empty() {
            self.view = View::Quiz;
        }
    }

    /// 交卷：判分、记历史、加积分
    ///
    /// 没有选中考试时什么也不做，返回 `None`。
    /// 先写历史再写档案，两者都落盘后才更新内存；档案写入失败时回滚历史。
    pub fn complete_quiz(
        &mut self,
        answers: UserAnswers,
        time_taken_secs: u64,
    ) -> Result<Option<AttemptScore>, StoreError> {
        let Some(exam) = self.current_exam else {
            self.user_answers = answers;
            return Ok(None);
        };

        let score = score_attempt(&self.current_questions, &answers);
        let now = now_millis();
        let performance = UserPerformance {
            id: format!("paper-{}", now),
            exam_type: exam,
            difficulty: self.difficulty,
            total_score: score.score,
            total_questions: score.total,
            questions: self.current_questions.clone(),
            user_answers: answers.clone(),
            weak_subjects: score.weak_subjects.clone(),
            mastery_gained: score.mastery_gained,
            last_tested_at: now,
            time_spent_seconds: time_taken_secs,
        };

        let mut history = Vec::with_capacity(self.history.len() + 1);
        history.push(performance);
        history.extend(self.history.iter().cloned());

        let mut profile = self.profile.clone();
        profile.mastery_points += u64::from(score.mastery_gained);

        let key = history_key(LOCAL_USER_ID);
        self.store.set(&key, &history)?;
        if let Err(e) = self.store.set(&profile_key(LOCAL_USER_ID), &profile) {
            if let Err(rollback) = self.store.set(&key, &self.history) {
                error!("❌ 历史回滚失败: {}", rollback);
            }
            return Err(e);
        }

        self.history = history;
        self.profile = profile;
        self.user_answers = answers;

        info!(
            "🏁 {} 交卷: {}/{} (+{} 积分)",
            exam, score.score, score.total, score.mastery_gained
        );
        self.view = View::Results;
        Ok(Some(score))
    }

    /// 更新档案，有订单时一并记录（最新在前）
    pub fn update_profile(
        &mut self,
        profile: UserProfile,
        transaction: Option<Transaction>,
    ) -> Result<(), StoreError> {
        if let Some(txn) = transaction {
            let mut transactions = Vec::with_capacity(self.transactions.len() + 1);
            transactions.push(txn);
            transactions.extend(self.transactions.iter().cloned());
            self.store.set(&txns_key(LOCAL_USER_ID), &transactions)?;
            self.transactions = transactions;
        }

        self.store.set(&profile_key(LOCAL_USER_ID), &profile)?;
        self.profile = profile;
        Ok(())
    }
}
