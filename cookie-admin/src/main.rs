use std::sync::Arc;

use cookie_admin::services::{ConfigService, ConsolePresenter};
use cookie_admin::state::AppState;
use cookie_admin::utils::logger;

/// 无界面模式: 加载配置与日志,拉取一次Cookie列表并输出到控制台
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = ConfigService::load_dotenv()?;

    // 日志先于完整配置初始化,guard需要存活到进程退出
    let _log_guard = logger::init(&ConfigService::log_dir())?;

    match dotenv {
        Some(path) => tracing::info!(path = %path.display(), "已加载 .env"),
        None => tracing::debug!("未找到 .env,使用进程环境变量"),
    }

    let config = ConfigService::load()?;
    let state = AppState::new(config, Arc::new(ConsolePresenter))?;
    let count = state.controller.load_all().await?;

    tracing::info!(count = count, "Cookie列表加载完成");
    Ok(())
}
