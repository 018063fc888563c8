//! Writes placeholder images for every game asset missing from the configured asset directory.

use anyhow::Context;
use dino_run::{asset::ensure_placeholders, config::load_config, logging::setup_logging};
use tracing::info;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let config = load_config().context("Invalid configuration")?;
    let created = ensure_placeholders(&config.asset_dir)
        .with_context(|| format!("Could not write placeholders to {}", config.asset_dir.display()))?;

    if created.is_empty() {
        info!(dir = %config.asset_dir.display(), "All assets already present");
    }
    for asset in created {
        info!(asset = asset.key(), file = %asset.file_name(), "Created placeholder");
    }

    Ok(())
}
