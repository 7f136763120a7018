use std::env;

use tracing::{error, info, warn};

use tifzones::{run, MapConfig};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let root = env::current_dir()?;
    let config = MapConfig::default();

    match run(&root, config) {
        Ok(outcome) => {
            if !outcome.report.failures.is_empty() {
                warn!(
                    processed = outcome.report.success_count(),
                    failed = outcome.report.failure_count(),
                    "Some files were skipped"
                );
            }
            info!(zones = outcome.document.zones.len(), "Done");
            Ok(())
        }
        Err(e) if e.is_empty_result() => {
            error!("{e}; no map written");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
