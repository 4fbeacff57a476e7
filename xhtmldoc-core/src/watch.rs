//! Incremental rebuilds driven by filesystem notifications.
//!
//! A `notify` watcher on the source root feeds raw events through an
//! [`EventClassifier`], which keeps only creations and modifications of
//! files matching the markup or asset pattern. The surviving
//! [`WatchEvent`]s go down a channel to a [`WatchSession`] that handles
//! them strictly one after another. Removals and renames never touch the
//! output tree, so stale destination files are left behind.

use crate::{
    compiler::{CompileError, Compiler},
    config::{Config, ConfigError},
    patterns::{PatternError, SourcePattern},
    source::{FileClass, SourceFile},
};
use notify::event::{CreateKind, ModifyKind};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid watch pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("Failed to watch {path:?}: {source}")]
    Notify {
        path: PathBuf,
        source: notify::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    Created,
    Modified,
}

/// A change to one source file that needs recompiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: WatchEventKind,
    /// Path relative to the source root
    pub source_path: PathBuf,
    pub class: FileClass,
}

impl WatchEvent {
    pub fn new(kind: WatchEventKind, source_path: impl Into<PathBuf>, class: FileClass) -> Self {
        Self {
            kind,
            source_path: source_path.into(),
            class,
        }
    }
}

/// Turns raw notifications into [`WatchEvent`]s
#[derive(Debug, Clone)]
pub struct EventClassifier {
    root: PathBuf,
    canonical_root: Option<PathBuf>,
    markup: SourcePattern,
    assets: SourcePattern,
}

impl EventClassifier {
    pub fn new(config: &Config) -> Result<Self, PatternError> {
        let root = config.source_dir();
        Ok(Self {
            canonical_root: root.canonicalize().ok(),
            root,
            markup: SourcePattern::new(&config.markup_pattern())?,
            assets: SourcePattern::new(&config.asset_pattern())?,
        })
    }

    pub fn classify(&self, event: &notify::Event) -> Vec<WatchEvent> {
        let Some(kind) = event_kind(&event.kind) else {
            tracing::debug!("Ignoring {:?} for {:?}", event.kind, event.paths);
            return Vec::new();
        };

        event
            .paths
            .iter()
            .filter_map(|path| self.classify_path(kind, path))
            .collect()
    }

    fn classify_path(&self, kind: WatchEventKind, path: &Path) -> Option<WatchEvent> {
        let rel = self.relative(path)?;
        let class = if self.markup.matches(&rel) {
            FileClass::Markup
        } else if self.assets.matches(&rel) {
            FileClass::Asset
        } else {
            return None;
        };
        Some(WatchEvent::new(kind, rel, class))
    }

    fn relative(&self, path: &Path) -> Option<PathBuf> {
        if let Ok(rel) = path.strip_prefix(&self.root) {
            return Some(rel.to_path_buf());
        }
        let canonical = self.canonical_root.as_ref()?;
        path.strip_prefix(canonical).ok().map(Path::to_path_buf)
    }
}

fn event_kind(kind: &EventKind) -> Option<WatchEventKind> {
    match kind {
        EventKind::Create(CreateKind::Folder) => None,
        EventKind::Create(_) => Some(WatchEventKind::Created),
        EventKind::Modify(ModifyKind::Name(_)) | EventKind::Modify(ModifyKind::Metadata(_)) => {
            None
        }
        EventKind::Modify(_) => Some(WatchEventKind::Modified),
        _ => None,
    }
}

/// Start a recursive watcher on the source root.
///
/// The returned watcher must be kept alive for as long as events are
/// wanted; dropping it closes the channel.
pub fn watch_source(
    config: &Config,
) -> Result<(RecommendedWatcher, mpsc::UnboundedReceiver<WatchEvent>), WatchError> {
    config.validate()?;
    let classifier = EventClassifier::new(config)?;
    let source_dir = config.source_dir();

    let (tx, rx) = mpsc::unbounded_channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| match res {
            Ok(event) => {
                for watch_event in classifier.classify(&event) {
                    let _ = tx.send(watch_event);
                }
            }
            Err(err) => tracing::warn!("Watcher error: {}", err),
        },
        notify::Config::default(),
    )
    .map_err(|source| WatchError::Notify {
        path: source_dir.clone(),
        source,
    })?;

    watcher
        .watch(&source_dir, RecursiveMode::Recursive)
        .map_err(|source| WatchError::Notify {
            path: source_dir.clone(),
            source,
        })?;

    Ok((watcher, rx))
}

/// Counts of what a session did before its channel closed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    pub dispatched: usize,
    pub failed: usize,
}

/// Recompiles one file per event
pub struct WatchSession {
    compiler: Compiler,
}

impl WatchSession {
    pub fn new(config: Config) -> Self {
        Self {
            compiler: Compiler::new(config),
        }
    }

    /// Run the single-file pipeline for one event
    pub async fn dispatch(&self, event: &WatchEvent) -> Result<PathBuf, CompileError> {
        tracing::debug!("{:?} {} {:?}", event.kind, event.class, event.source_path);
        let file = SourceFile::new(event.source_path.clone(), event.class);
        self.compiler.process(&file).await
    }

    /// Handle events in arrival order until every sender is gone.
    ///
    /// Each dispatch finishes before the next event is received. Failures
    /// are logged and counted; they never end the loop.
    pub async fn run(&self, mut events: mpsc::UnboundedReceiver<WatchEvent>) -> WatchSummary {
        let mut summary = WatchSummary::default();

        while let Some(event) = events.recv().await {
            summary.dispatched += 1;
            if let Err(err) = self.dispatch(&event).await {
                summary.failed += 1;
                tracing::error!(
                    "Failed to process {} {:?}: {}",
                    event.class,
                    event.source_path,
                    err
                );
            }
        }

        summary
    }
}
