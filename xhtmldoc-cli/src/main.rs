//! # xhtmldoc CLI
//!
//! Compiles a markdown documentation tree to XHTML, once or continuously.

mod commands;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xhtmldoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Keep running and recompile files as they change
    #[arg(long)]
    watch: bool,

    /// Path to configuration file (paths inside it are relative to it)
    #[arg(long, default_value = "xhtmldoc.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if cli.watch {
        commands::watch_docs(&cli.config).await
    } else {
        commands::build_docs(&cli.config).await
    }
}
