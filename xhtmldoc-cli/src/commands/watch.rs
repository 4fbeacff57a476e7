//! Watch command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use xhtmldoc_core::{watch_source, Config, WatchSession};

/// Recompile changed sources until the process is killed
pub async fn watch_docs(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    let source_dir = config.source_dir();

    let (_watcher, rx) = watch_source(&config).context("Failed to initialize watcher")?;

    tracing::info!("Watching {:?} for changes (Ctrl+C to stop)...", source_dir);

    let summary = WatchSession::new(config).run(rx).await;
    tracing::info!(
        "Watcher stopped after {} events ({} failed)",
        summary.dispatched,
        summary.failed
    );

    Ok(())
}
