//! Batch building - compiles every markup source, then mirrors every asset.

use crate::{
    compiler::{CompileError, Compiler},
    config::{Config, ConfigError, FailurePolicy},
    patterns::{PatternError, SourcePattern},
    source::FileClass,
};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The two sequential phases of a batch build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Markup,
    Assets,
}

impl BuildPhase {
    fn class(self) -> FileClass {
        match self {
            BuildPhase::Markup => FileClass::Markup,
            BuildPhase::Assets => FileClass::Asset,
        }
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildPhase::Markup => f.write_str("markup"),
            BuildPhase::Assets => f.write_str("assets"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source discovery failed: {0}")]
    Pattern(#[from] PatternError),

    #[error("{phase} phase failed on {path:?}: {source}")]
    File {
        phase: BuildPhase,
        path: PathBuf,
        source: CompileError,
    },

    #[error("{} files failed:\n{}", .0.len(), summarize(.0))]
    Multiple(Vec<BuildError>),
}

fn summarize(errors: &[BuildError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// What a successful build produced, as output-relative paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub compiled: Vec<PathBuf>,
    pub mirrored: Vec<PathBuf>,
}

/// Full batch builder
pub struct Builder {
    compiler: Compiler,
    policy: FailurePolicy,
}

impl Builder {
    pub fn new(config: Config) -> Self {
        let policy = config.on_error;
        Self {
            compiler: Compiler::new(config),
            policy,
        }
    }

    /// Override the failure policy from the config
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build everything: markup first, then assets
    ///
    /// Files in each phase are processed one at a time in path order.
    /// Under `FailFast` the first per-file error ends the build, leaving
    /// anything already written in place.
    pub async fn build(&self) -> Result<BuildReport, BuildError> {
        let config = self.compiler.config();
        config.validate()?;

        let markup_pattern = SourcePattern::new(&config.markup_pattern())?;
        let asset_pattern = SourcePattern::new(&config.asset_pattern())?;
        let mut failures = Vec::new();

        let markup_files = self.scan(&markup_pattern)?;
        tracing::info!("Found {} Markdown files to compile", markup_files.len());
        let compiled = self
            .run_phase(BuildPhase::Markup, &markup_files, &mut failures)
            .await?;

        let asset_files = self.scan(&asset_pattern)?;
        tracing::info!("Found {} assets to mirror", asset_files.len());
        let mirrored = self
            .run_phase(BuildPhase::Assets, &asset_files, &mut failures)
            .await?;

        if !failures.is_empty() {
            return Err(BuildError::Multiple(failures));
        }

        tracing::info!(
            "✓ Compiled {} documents and mirrored {} assets",
            compiled.len(),
            mirrored.len()
        );
        tracing::info!("✓ Output written to {:?}", self.compiler.output_dir());

        Ok(BuildReport { compiled, mirrored })
    }

    fn scan(&self, pattern: &SourcePattern) -> Result<Vec<PathBuf>, BuildError> {
        let mut files = pattern.find(self.compiler.source_dir())?;
        files.sort();
        Ok(files)
    }

    async fn run_phase(
        &self,
        phase: BuildPhase,
        files: &[PathBuf],
        failures: &mut Vec<BuildError>,
    ) -> Result<Vec<PathBuf>, BuildError> {
        let mut done = Vec::with_capacity(files.len());

        for rel in files {
            match self.run_one(phase, rel).await {
                Ok(dest) => done.push(dest),
                Err(source) => {
                    let err = BuildError::File {
                        phase,
                        path: rel.clone(),
                        source,
                    };
                    match self.policy {
                        FailurePolicy::FailFast => return Err(err),
                        FailurePolicy::Collect => {
                            tracing::error!("{}", err);
                            failures.push(err);
                        }
                    }
                }
            }
        }

        Ok(done)
    }

    async fn run_one(&self, phase: BuildPhase, rel: &Path) -> Result<PathBuf, CompileError> {
        match phase.class() {
            FileClass::Markup => self.compiler.compile_markup(rel).await,
            FileClass::Asset => self.compiler.mirror(rel).await,
        }
    }
}
