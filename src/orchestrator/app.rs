//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：日志文件、生成服务、考试目录、组卷器、本地会话
//! 2. **命令分发**：`generate` / `revise` / `history`
//! 3. **资源管理**：唯一持有 provider 与 store 的模块

use anyhow::{bail, Context, Result};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::clients::{build_provider, Sleeper, TokioSleeper};
use crate::config::Config;
use crate::models::{load_catalog_overrides, ExamCatalog};
use crate::orchestrator::paper_assembler::PaperAssembler;
use crate::orchestrator::session::{Session, SessionEvent};
use crate::services::LocalStore;
use crate::utils::logging;
use crate::workflow::LoggingProgress;

/// 命令行子命令
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// 生成一套新试卷
    #[default]
    Generate,
    /// 从历史错题组复习卷
    Revise,
    /// 列出作答历史
    History,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "generate" | "gen" => Ok(Command::Generate),
            "revise" | "revision" | "vault" => Ok(Command::Revise),
            "history" => Ok(Command::History),
            other => bail!("未知命令: {}（可用: generate / revise / history）", other),
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    assembler: PaperAssembler,
    session: Session,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(&config);

        let provider = build_provider(&config).context("无法创建生成服务客户端")?;
        let catalog = Arc::new(load_catalog(&config).await?);
        let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);
        let assembler = PaperAssembler::from_config(&config, catalog, provider, sleeper);

        let store = LocalStore::open(&config.data_dir).context("无法打开数据目录")?;
        let mut session = Session::load(store).context("无法加载本地会话")?;
        if !session.logged_in {
            session.login()?;
        }

        Ok(Self {
            config,
            assembler,
            session,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Generate => self.generate().await,
            Command::Revise => self.revise(),
            Command::History => {
                logging::print_history(&self.session.history);
                Ok(())
            }
        }
    }

    async fn generate(&mut self) -> Result<()> {
        let event = self
            .session
            .start_exam_flow(
                &self.assembler,
                self.config.exam,
                self.config.language,
                self.config.difficulty,
                &LoggingProgress,
            )
            .await;

        match event {
            SessionEvent::PaperReady { .. } => {
                logging::print_questions(&self.session.current_questions);
                logging::print_paper_summary(
                    &self.session.current_questions,
                    &self.config.output_log_file,
                );
                Ok(())
            }
            SessionEvent::ApiKeyReselectionRequired(e) => {
                error!("🔑 API Key 无效或无权访问模型，请重新设置 LLM_API_KEY 后重试");
                Err(e.into())
            }
            SessionEvent::GenerationFailed(e) => Err(e.into()),
            other => {
                warn!("意外的会话事件: {:?}", other);
                Ok(())
            }
        }
    }

    fn revise(&mut self) -> Result<()> {
        match self.session.start_revision_vault(&mut rand::thread_rng()) {
            SessionEvent::RevisionReady { questions } => {
                info!("📒 复习卷已组好: {} 道错题", questions);
                logging::print_questions(&self.session.current_questions);
            }
            SessionEvent::NoMistakes => info!("🎉 历史中没有错题"),
            other => warn!("意外的会话事件: {:?}", other),
        }
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

/// 内置目录 + 可选的 TOML 覆盖
async fn load_catalog(config: &Config) -> Result<ExamCatalog> {
    let catalog = ExamCatalog::builtin();
    let Some(path) = &config.catalog_file else {
        return Ok(catalog);
    };

    info!("\n📁 正在加载考试目录覆盖: {}", path.display());
    let overrides = load_catalog_overrides(path).await?;
    Ok(catalog.with_overrides(overrides)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!("generate".parse::<Command>().unwrap(), Command::Generate);
        assert_eq!(" Vault ".parse::<Command>().unwrap(), Command::Revise);
        assert_eq!("history".parse::<Command>().unwrap(), Command::History);
        assert!("submit".parse::<Command>().is_err());
        assert_eq!(Command::default(), Command::Generate);
    }

    #[tokio::test]
    async fn test_load_catalog_with_override_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(
            &path,
            r#"
            [exams."CTET"]
            total_questions = 30
            sections = ["Child Development", "Mathematics"]
            duration_minutes = 30
            "#,
        )
        .unwrap();

        let config = Config {
            catalog_file: Some(path),
            ..Config::default()
        };
        let catalog = load_catalog(&config).await.unwrap();
        let ctet = catalog.lookup(crate::models::ExamType::Ctet).unwrap();
        assert_eq!(ctet.total_questions, 30);
        assert_eq!(ctet.questions_per_section(), 15);
    }
}
