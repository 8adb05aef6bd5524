//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use anyhow::{Context, Result};
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::{Question, UserPerformance};

/// 初始化 tracing 订阅者
///
/// 优先使用 `RUST_LOG`，否则默认 `info`，`verbose` 时为 `debug`。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n出题日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法写入日志文件: {}", log_file_path))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 预测试卷生成");
    info!("🤖 生成服务: {:?} | 模型: {}", config.provider, config.model_name);
    info!(
        "⏱️ 重试 {} 次 | 初始退避 {} ms | 科目间隔 {} ms",
        config.retries, config.initial_backoff_ms, config.inter_section_delay_ms
    );
    info!("💾 数据目录: {}", config.data_dir.display());
    info!("{}", "=".repeat(60));
}

/// 打印试卷概要
pub fn print_paper_summary(questions: &[Question], log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 试卷生成完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));

    let mut subjects: Vec<(&str, usize)> = Vec::new();
    for question in questions {
        match subjects.iter_mut().find(|(s, _)| *s == question.subject) {
            Some((_, count)) => *count += 1,
            None => subjects.push((question.subject.as_str(), 1)),
        }
    }
    for (subject, count) in &subjects {
        info!("📘 {}: {} 题", subject, count);
    }
    info!("✅ 共 {} 题", questions.len());
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 打印题目列表（题干截断显示）
pub fn print_questions(questions: &[Question]) {
    for (idx, question) in questions.iter().enumerate() {
        info!(
            "{:>3}. [{}] {}",
            idx + 1,
            question.subject,
            truncate_text(&question.text, 60)
        );
    }
}

/// 打印作答历史
pub fn print_history(history: &[UserPerformance]) {
    if history.is_empty() {
        info!("📭 暂无作答记录");
        return;
    }

    info!("{}", "=".repeat(60));
    info!("📚 作答历史 (共 {} 次)", history.len());
    info!("{}", "=".repeat(60));
    for (idx, perf) in history.iter().enumerate() {
        let tested_at = chrono::DateTime::from_timestamp_millis(perf.last_tested_at)
            .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        info!(
            "{:>2}. {} | {} | {}/{} | +{} 积分 | {}",
            idx + 1,
            perf.exam_type,
            perf.difficulty,
            perf.total_score,
            perf.total_questions,
            perf.mastery_gained,
            tested_at
        );
        if !perf.weak_subjects.is_empty() {
            info!("    薄弱科目: {}", perf.weak_subjects.join(", "));
        }
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
