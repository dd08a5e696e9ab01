// ==========================================
// 石材库存预警系统 - 守护进程入口
// ==========================================
// 启动监控：立即检查一次，之后按配置间隔检查；Ctrl-C 停止
// ==========================================

use stone_inventory::app::{get_default_db_path, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    stone_inventory::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", stone_inventory::APP_NAME);
    tracing::info!("系统版本: {}", stone_inventory::VERSION);
    tracing::info!("==================================================");

    let db_path = std::env::args()
        .nth(1)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let app_state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    let handle = app_state
        .stock_monitor
        .activate(app_state.settings.check_interval);

    tokio::signal::ctrl_c().await?;
    tracing::info!("收到停止信号，正在停止库存监控...");

    handle.shutdown().await;
    Ok(())
}
