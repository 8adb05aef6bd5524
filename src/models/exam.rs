use crate::error::{CatalogError, ConfigError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 考试类型
///
/// 序列化为目录键（如 `"SSC CGL"`），与本地存储中历史记录的格式一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamType {
    #[serde(rename = "UPSC")]
    Upsc,
    #[serde(rename = "SSC CGL")]
    SscCgl,
    #[serde(rename = "SSC CHSL")]
    SscChsl,
    #[serde(rename = "SSC GD")]
    SscGd,
    #[serde(rename = "SSC MTS")]
    SscMts,
    #[serde(rename = "SSC Steno")]
    SscSteno,
    #[serde(rename = "IBPS PO")]
    IbpsPo,
    #[serde(rename = "IBPS Clerk")]
    IbpsClerk,
    #[serde(rename = "SBI PO")]
    SbiPo,
    #[serde(rename = "SBI Clerk")]
    SbiClerk,
    #[serde(rename = "RBI Grade B")]
    RbiGradeB,
    #[serde(rename = "RBI Assistant")]
    RbiAssistant,
    #[serde(rename = "NDA")]
    Nda,
    #[serde(rename = "CDS")]
    Cds,
    #[serde(rename = "Agniveer")]
    Agniveer,
    #[serde(rename = "CAPF")]
    Capf,
    #[serde(rename = "CTET")]
    Ctet,
    #[serde(rename = "UPTET")]
    Uptet,
    #[serde(rename = "STET")]
    Stet,
    #[serde(rename = "RRB NTPC")]
    RrbNtpc,
    #[serde(rename = "RRB Group D")]
    RrbGroupD,
    #[serde(rename = "UP Constable")]
    UpConstable,
    #[serde(rename = "UP SI")]
    UpSi,
    #[serde(rename = "Delhi Police")]
    DelhiPolice,
    #[serde(rename = "JEE Main")]
    JeeMain,
}

impl ExamType {
    /// 全部考试类型（目录必须覆盖其中每一项）
    pub const ALL: [ExamType; 25] = [
        ExamType::Upsc,
        ExamType::SscCgl,
        ExamType::SscChsl,
        ExamType::SscGd,
        ExamType::SscMts,
        ExamType::SscSteno,
        ExamType::IbpsPo,
        ExamType::IbpsClerk,
        ExamType::SbiPo,
        ExamType::SbiClerk,
        ExamType::RbiGradeB,
        ExamType::RbiAssistant,
        ExamType::Nda,
        ExamType::Cds,
        ExamType::Agniveer,
        ExamType::Capf,
        ExamType::Ctet,
        ExamType::Uptet,
        ExamType::Stet,
        ExamType::RrbNtpc,
        ExamType::RrbGroupD,
        ExamType::UpConstable,
        ExamType::UpSi,
        ExamType::DelhiPolice,
        ExamType::JeeMain,
    ];

    /// 获取目录键
    pub fn key(self) -> &'static str {
        match self {
            ExamType::Upsc => "UPSC",
            ExamType::SscCgl => "SSC CGL",
            ExamType::SscChsl => "SSC CHSL",
            ExamType::SscGd => "SSC GD",
            ExamType::SscMts => "SSC MTS",
            ExamType::SscSteno => "SSC Steno",
            ExamType::IbpsPo => "IBPS PO",
            ExamType::IbpsClerk => "IBPS Clerk",
            ExamType::SbiPo => "SBI PO",
            ExamType::SbiClerk => "SBI Clerk",
            ExamType::RbiGradeB => "RBI Grade B",
            ExamType::RbiAssistant => "RBI Assistant",
            ExamType::Nda => "NDA",
            ExamType::Cds => "CDS",
            ExamType::Agniveer => "Agniveer",
            ExamType::Capf => "CAPF",
            ExamType::Ctet => "CTET",
            ExamType::Uptet => "UPTET",
            ExamType::Stet => "STET",
            ExamType::RrbNtpc => "RRB NTPC",
            ExamType::RrbGroupD => "RRB Group D",
            ExamType::UpConstable => "UP Constable",
            ExamType::UpSi => "UP SI",
            ExamType::DelhiPolice => "Delhi Police",
            ExamType::JeeMain => "JEE Main",
        }
    }

    /// 从目录键解析（忽略大小写、首尾空白，`-` / `_` 视同空格）
    pub fn from_key(s: &str) -> Option<Self> {
        let normalized = s.trim().replace(['-', '_'], " ");
        Self::ALL
            .iter()
            .copied()
            .find(|exam| exam.key().eq_ignore_ascii_case(&normalized))
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ExamType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| CatalogError::UnknownExam { key: s.to_string() })
    }
}

/// 出题语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    English,
    #[default]
    Hindi,
}

impl Language {
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "hindi" | "hi" => Ok(Language::Hindi),
            _ => Err(ConfigError::InvalidValue {
                field: "language".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// 整体难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Low,
    #[default]
    Medium,
    High,
}

impl Difficulty {
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Low => "Low",
            Difficulty::Medium => "Medium",
            Difficulty::High => "High",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "easy" => Ok(Difficulty::Low),
            "medium" | "moderate" => Ok(Difficulty::Medium),
            "high" | "hard" => Ok(Difficulty::High),
            _ => Err(ConfigError::InvalidValue {
                field: "difficulty".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// 一次试卷生成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub exam: ExamType,
    pub language: Language,
    pub difficulty: Difficulty,
    /// 薄弱科目提示，只写进 prompt，不做结构性约束
    pub weak_areas: Vec<String>,
}

impl GenerationRequest {
    pub fn new(exam: ExamType, language: Language, difficulty: Difficulty) -> Self {
        Self {
            exam,
            language,
            difficulty,
            weak_areas: Vec::new(),
        }
    }

    pub fn with_weak_areas(mut self, weak_areas: Vec<String>) -> Self {
        self.weak_areas = weak_areas;
        self
    }
}
