//! 考试目录
//!
//! 内置 25 种考试的结构（科目顺序、总题量、时长），可由 TOML 文件覆盖个别考试。
//! 对 [`ExamType`] 全域有定义：每个考试类型都能查到结构。

use crate::error::CatalogError;
use crate::models::exam::ExamType;
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 考试结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamStructure {
    pub total_questions: usize,
    /// 有序科目列表，决定生成顺序和试卷中的题目顺序
    pub sections: Vec<String>,
    pub duration_minutes: u32,
}

impl ExamStructure {
    /// 每个科目的目标题量：ceil(总题量 / 科目数)
    ///
    /// 各科合计可能略超总题量，组卷最后统一截断。
    pub fn questions_per_section(&self) -> usize {
        if self.sections.is_empty() {
            return 0;
        }
        self.total_questions.div_ceil(self.sections.len())
    }

    fn validate(&self, key: &str) -> Result<(), CatalogError> {
        if self.sections.is_empty() {
            return Err(CatalogError::InvalidStructure {
                key: key.to_string(),
                reason: "科目列表为空".to_string(),
            });
        }
        if self.total_questions == 0 {
            return Err(CatalogError::InvalidStructure {
                key: key.to_string(),
                reason: "总题量必须大于 0".to_string(),
            });
        }
        if self.sections.iter().any(|s| s.trim().is_empty()) {
            return Err(CatalogError::InvalidStructure {
                key: key.to_string(),
                reason: "科目名称不能为空".to_string(),
            });
        }
        Ok(())
    }
}

struct BuiltinExam {
    total_questions: usize,
    sections: &'static [&'static str],
    duration_minutes: u32,
}

static BUILTIN_EXAMS: phf::Map<&'static str, BuiltinExam> = phf_map! {
    "UPSC" => BuiltinExam { total_questions: 100, sections: &["History", "Polity", "Geography", "Economy", "Science & Tech", "Current Affairs"], duration_minutes: 120 },
    "SSC CGL" => BuiltinExam { total_questions: 100, sections: &["Reasoning", "General Awareness", "Quantitative Aptitude", "English"], duration_minutes: 60 },
    "SSC CHSL" => BuiltinExam { total_questions: 100, sections: &["Reasoning", "GA", "Quant", "English"], duration_minutes: 60 },
    "SSC GD" => BuiltinExam { total_questions: 80, sections: &["Reasoning", "GK", "Math", "Hindi/English"], duration_minutes: 60 },
    "SSC MTS" => BuiltinExam { total_questions: 90, sections: &["Math", "Reasoning", "GA", "English"], duration_minutes: 90 },
    "SSC Steno" => BuiltinExam { total_questions: 200, sections: &["GA", "Reasoning", "English"], duration_minutes: 120 },

    "IBPS PO" => BuiltinExam { total_questions: 100, sections: &["English", "Quant", "Reasoning"], duration_minutes: 60 },
    "IBPS Clerk" => BuiltinExam { total_questions: 100, sections: &["English", "Quant", "Reasoning"], duration_minutes: 60 },
    "SBI PO" => BuiltinExam { total_questions: 100, sections: &["English", "Quant", "Reasoning"], duration_minutes: 60 },
    "SBI Clerk" => BuiltinExam { total_questions: 100, sections: &["English", "Quant", "Reasoning"], duration_minutes: 60 },
    "RBI Grade B" => BuiltinExam { total_questions: 200, sections: &["GA", "English", "Quant", "Reasoning"], duration_minutes: 120 },
    "RBI Assistant" => BuiltinExam { total_questions: 100, sections: &["English", "Quant", "Reasoning"], duration_minutes: 60 },

    "NDA" => BuiltinExam { total_questions: 120, sections: &["Mathematics", "GAT"], duration_minutes: 150 },
    "CDS" => BuiltinExam { total_questions: 120, sections: &["English", "GK", "Math"], duration_minutes: 120 },
    "Agniveer" => BuiltinExam { total_questions: 50, sections: &["GK", "Science", "Math", "Reasoning"], duration_minutes: 60 },
    "CAPF" => BuiltinExam { total_questions: 125, sections: &["GA", "Intelligence", "Quant"], duration_minutes: 120 },

    "CTET" => BuiltinExam { total_questions: 150, sections: &["CDP", "Language I", "Language II", "Math", "EVS"], duration_minutes: 150 },
    "UPTET" => BuiltinExam { total_questions: 150, sections: &["CDP", "Hindi", "English/Math", "EVS"], duration_minutes: 150 },
    "STET" => BuiltinExam { total_questions: 150, sections: &["Teaching Skills", "GA", "Subject Knowledge"], duration_minutes: 150 },

    "RRB NTPC" => BuiltinExam { total_questions: 100, sections: &["GA", "Math", "Reasoning"], duration_minutes: 90 },
    "RRB Group D" => BuiltinExam { total_questions: 100, sections: &["Science", "Math", "Reasoning", "GA"], duration_minutes: 90 },

    "UP Constable" => BuiltinExam { total_questions: 150, sections: &["GK", "Hindi", "Quant", "Reasoning"], duration_minutes: 120 },
    "UP SI" => BuiltinExam { total_questions: 160, sections: &["Hindi", "Law/GK", "Quant", "Reasoning"], duration_minutes: 120 },
    "Delhi Police" => BuiltinExam { total_questions: 100, sections: &["GK", "Reasoning", "Math", "Computer"], duration_minutes: 90 },
    "JEE Main" => BuiltinExam { total_questions: 90, sections: &["Physics", "Chemistry", "Mathematics"], duration_minutes: 180 },
};

/// 考试目录（只读）
#[derive(Debug, Clone)]
pub struct ExamCatalog {
    exams: HashMap<ExamType, ExamStructure>,
}

impl ExamCatalog {
    /// 内置目录
    pub fn builtin() -> Self {
        let exams = BUILTIN_EXAMS
            .entries()
            .filter_map(|(key, exam)| {
                ExamType::from_key(key).map(|exam_type| {
                    (
                        exam_type,
                        ExamStructure {
                            total_questions: exam.total_questions,
                            sections: exam.sections.iter().map(|s| s.to_string()).collect(),
                            duration_minutes: exam.duration_minutes,
                        },
                    )
                })
            })
            .collect();
        Self { exams }
    }

    /// 用外部配置覆盖部分考试结构
    ///
    /// 键必须是已知的考试类型，结构需满足科目非空、总题量 > 0。
    pub fn with_overrides(
        mut self,
        overrides: HashMap<String, ExamStructure>,
    ) -> Result<Self, CatalogError> {
        for (key, structure) in overrides {
            let exam: ExamType = key.parse()?;
            structure.validate(&key)?;
            tracing::info!(
                "📘 覆盖考试结构: {} ({} 题, {} 个科目)",
                exam,
                structure.total_questions,
                structure.sections.len()
            );
            self.exams.insert(exam, structure);
        }
        Ok(self)
    }

    /// 查询考试结构
    pub fn lookup(&self, exam: ExamType) -> Result<&ExamStructure, CatalogError> {
        self.exams.get(&exam).ok_or_else(|| CatalogError::UnknownExam {
            key: exam.key().to_string(),
        })
    }
}

impl Default for ExamCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_total_and_valid() {
        let catalog = ExamCatalog::builtin();
        for exam in ExamType::ALL {
            let structure = catalog.lookup(exam).unwrap();
            assert!(structure.validate(exam.key()).is_ok(), "{} 结构不合法", exam);
        }
    }

    #[test]
    fn test_questions_per_section_rounds_up() {
        let catalog = ExamCatalog::builtin();
        // 100 / 6 → 17
        assert_eq!(catalog.lookup(ExamType::Upsc).unwrap().questions_per_section(), 17);
        // 100 / 4 → 25
        assert_eq!(catalog.lookup(ExamType::SscCgl).unwrap().questions_per_section(), 25);
        // 125 / 3 → 42
        assert_eq!(catalog.lookup(ExamType::Capf).unwrap().questions_per_section(), 42);
    }

    #[test]
    fn test_builtin_preserves_section_order() {
        let catalog = ExamCatalog::builtin();
        let jee = catalog.lookup(ExamType::JeeMain).unwrap();
        assert_eq!(jee.sections, vec!["Physics", "Chemistry", "Mathematics"]);
        assert_eq!(jee.duration_minutes, 180);
    }

    #[test]
    fn test_overrides_replace_structure() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "NDA".to_string(),
            ExamStructure {
                total_questions: 10,
                sections: vec!["Mathematics".to_string()],
                duration_minutes: 15,
            },
        );
        let catalog = ExamCatalog::builtin().with_overrides(overrides).unwrap();
        assert_eq!(catalog.lookup(ExamType::Nda).unwrap().total_questions, 10);
    }

    #[test]
    fn test_overrides_reject_invalid_structure() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "CDS".to_string(),
            ExamStructure {
                total_questions: 0,
                sections: vec!["GK".to_string()],
                duration_minutes: 15,
            },
        );
        assert!(ExamCatalog::builtin().with_overrides(overrides).is_err());

        let mut unknown = HashMap::new();
        unknown.insert(
            "GATE".to_string(),
            ExamStructure {
                total_questions: 10,
                sections: vec!["CS".to_string()],
                duration_minutes: 15,
            },
        );
        assert!(matches!(
            ExamCatalog::builtin().with_overrides(unknown),
            Err(CatalogError::UnknownExam { .. })
        ));
    }
}
