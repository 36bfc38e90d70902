/// CS2 Intel — Daily Miner
///
/// What it does:
///   1. Pulls CS2 fixtures starting in the next 24h from PandaScore
///   2. Pulls the last N finished matches for both teams of each fixture
///   3. Computes recent form (last 5), H2H and map pool
///   4. Prints the intelligence pack and saves it under ./reports/
///
/// What it does NOT do: predictions or odds, descriptive stats only
///
/// Run:
///   cargo run --bin daily-miner

use anyhow::Result;
use cs2_intel::app::{self, AppConfig};
use cs2_intel::pipeline::{build_pack, log_pack};
use cs2_intel::report::{DailyIntelFormatter, PackKind};
use dotenv::dotenv;
use logger::EventLogger;
use pandascore::{PandaScoreClient, PandaScoreConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    app::init_tracing();

    info!("=== CS2 Intel — DAILY INTELLIGENCE PACK ===");

    let lock_file = match app::lock_file("daily_miner") {
        Ok(f) => f,
        Err(e) => {
            warn!("{e:#}");
            return Ok(());
        }
    };
    let mut lock = fd_lock::RwLock::new(lock_file);
    let _write_guard = match lock.try_write() {
        Ok(guard) => guard,
        Err(_) => {
            warn!("Another instance of daily-miner is already running! Exiting.");
            return Ok(());
        }
    };

    let app_cfg = AppConfig::from_env();
    let api_cfg = PandaScoreConfig::from_env()?;
    info!(
        "History depth: {}, window: {}h, logs: {:?}",
        api_cfg.history_depth, api_cfg.upcoming_window_hours, app_cfg.log_dir
    );

    let logger = EventLogger::new(&app_cfg.log_dir);
    let formatter = DailyIntelFormatter { history_depth: api_cfg.history_depth };
    let client = PandaScoreClient::new(api_cfg, logger.clone())?;

    let report = build_pack(&client, &logger, &formatter, PackKind::DailyIntel, app_cfg.match_concurrency).await?;

    println!("{}", report.render());

    let saved = match report.save(&app_cfg.report_dir) {
        Ok(path) => {
            info!("Report saved to {}", path.display());
            Some(path)
        }
        Err(e) => {
            warn!("Report save failed: {e:#}");
            None
        }
    };
    log_pack(&logger, &report, saved.as_deref());

    Ok(())
}
