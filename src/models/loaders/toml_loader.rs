use crate::models::catalog::ExamStructure;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

/// 目录覆盖文件格式
///
/// ```toml
/// [exams."SSC CGL"]
/// total_questions = 100
/// sections = ["Reasoning", "General Awareness", "Quantitative Aptitude", "English"]
/// duration_minutes = 60
/// ```
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    exams: HashMap<String, ExamStructure>,
}

/// 解析目录覆盖内容
pub fn parse_catalog_overrides(content: &str) -> Result<HashMap<String, ExamStructure>> {
    let file: CatalogFile = toml::from_str(content).context("无法解析考试目录 TOML")?;
    Ok(file.exams)
}

/// 从 TOML 文件加载考试目录覆盖项
pub async fn load_catalog_overrides(path: &Path) -> Result<HashMap<String, ExamStructure>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取考试目录文件: {}", path.display()))?;

    let overrides = parse_catalog_overrides(&content)
        .with_context(|| format!("考试目录文件格式错误: {}", path.display()))?;

    tracing::info!(
        "成功加载 {} 个考试结构覆盖项: {}",
        overrides.len(),
        path.file_name().unwrap_or_default().to_string_lossy()
    );

    Ok(overrides)
}
