use anyhow::Result;
use exam_genie::utils::logging;
use exam_genie::{App, Command, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load(None)?;

    // 初始化日志
    logging::init(config.verbose_logging);

    let command = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<Command>()?,
        None => Command::default(),
    };

    // 初始化并运行应用
    App::initialize(config).await?.run(command).await?;

    Ok(())
}
