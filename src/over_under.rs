/// CS2 Intel — Over/Under Miner
///
/// For every fixture in the next 24h: O2.5 maps in Bo3 series and round
/// totals (only where the PandaScore tier exposes them, else "unavailable").
///
/// Run:
///   cargo run --bin over-under-miner

use anyhow::Result;
use cs2_intel::app::{self, AppConfig};
use cs2_intel::pipeline::{build_pack, log_pack};
use cs2_intel::report::{OverUnderFormatter, PackKind};
use dotenv::dotenv;
use logger::EventLogger;
use pandascore::{PandaScoreClient, PandaScoreConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    app::init_tracing();

    info!("=== CS2 Intel — OVER/UNDER DATA PACK ===");

    let lock_file = match app::lock_file("over_under") {
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
            warn!("Another instance of over-under-miner is already running! Exiting.");
            return Ok(());
        }
    };

    let app_cfg = AppConfig::from_env();
    let api_cfg = PandaScoreConfig::from_env()?;
    let logger = EventLogger::new(&app_cfg.log_dir);
    let client = PandaScoreClient::new(api_cfg, logger.clone())?;

    let report = build_pack(&client, &logger, &OverUnderFormatter, PackKind::OverUnder, app_cfg.match_concurrency).await?;

    println!("{}", report.render());

    let saved = report
        .save(&app_cfg.report_dir)
        .map_err(|e| warn!("Report save failed: {e:#}"))
        .ok();
    if let Some(path) = &saved {
        info!("Report saved to {}", path.display());
    }
    log_pack(&logger, &report, saved.as_deref());

    Ok(())
}
