//! Build command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use xhtmldoc_core::{Builder, Config};

/// Run one batch build and return once everything is written
pub async fn build_docs(config_path: &Path) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;

    tracing::info!(
        "Compiling {:?} into {:?}",
        config.source_dir(),
        config.output_dir()
    );

    Builder::new(config)
        .build()
        .await
        .context("Documentation build failed")?;

    tracing::info!("✓ Markdown compilation complete");
    Ok(())
}
