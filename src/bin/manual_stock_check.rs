// Small dev utility: run one stock check cycle and print the banner as JSON.
//
// Usage:
//   cargo run --bin manual_stock_check -- [db_path]
//
// Sends the alert email through the configured gateway when the cycle finds alerts.

use stone_inventory::app::{get_default_db_path, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stone_inventory::logging::init();

    let db_path = std::env::args()
        .nth(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(get_default_db_path);

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    let report = state.stock_monitor.run_cycle().await;
    eprintln!(
        "cycle_id={} outcome={:?} dispatch={:?}",
        report.cycle_id, report.outcome, report.dispatch
    );

    println!("{}", serde_json::to_string_pretty(&state.stock_alert_api.banner())?);
    Ok(())
}
