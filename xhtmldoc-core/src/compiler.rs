//! Single-file pipelines shared by batch builds and watch sessions.

use crate::{
    assets::mirror_asset,
    config::Config,
    document::Document,
    fs::write_file,
    markdown::MarkupRenderer,
    paths::map_extension,
    source::{FileClass, SourceFile},
};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to copy {from:?} to {to:?}: {source}")]
    Mirror {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Compiles one markup source or mirrors one asset at a time
#[derive(Debug, Clone)]
pub struct Compiler {
    config: Config,
    renderer: MarkupRenderer,
    source_dir: PathBuf,
    output_dir: PathBuf,
}

impl Compiler {
    pub fn new(config: Config) -> Self {
        let source_dir = config.source_dir();
        let output_dir = config.output_dir();
        Self {
            renderer: MarkupRenderer::new(config.render),
            config,
            source_dir,
            output_dir,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Destination of a source, relative to the output root
    pub fn destination(&self, file: &SourceFile) -> PathBuf {
        match file.class {
            FileClass::Markup => map_extension(
                &file.rel_path,
                &self.config.markup.source_extension,
                &self.config.markup.target_extension,
            ),
            FileClass::Asset => file.rel_path.clone(),
        }
    }

    /// Render markdown text into a titled document without touching disk
    pub fn compile_text(&self, markdown: &str) -> Document {
        Document::from_fragment(self.renderer.render(markdown))
    }

    /// Run the pipeline that matches the file's class.
    ///
    /// Returns the destination path relative to the output root.
    pub async fn process(&self, file: &SourceFile) -> Result<PathBuf, CompileError> {
        match file.class {
            FileClass::Markup => self.compile_markup(&file.rel_path).await,
            FileClass::Asset => self.mirror(&file.rel_path).await,
        }
    }

    /// Read, render, compose and write one markup source
    pub async fn compile_markup(&self, rel: &Path) -> Result<PathBuf, CompileError> {
        let src = self.source_dir.join(rel);
        let markdown = tokio::fs::read_to_string(&src)
            .await
            .map_err(|source| CompileError::Read {
                path: src.clone(),
                source,
            })?;

        let document = self.compile_text(&markdown);
        let dest_rel = self.destination(&SourceFile::markup(rel));
        let dest = self.output_dir.join(&dest_rel);

        tracing::info!("  {} → {}", rel.display(), dest.display());
        write_file(&dest, document.render())
            .await
            .map_err(|source| CompileError::Write {
                path: dest.clone(),
                source,
            })?;

        tracing::debug!("Compiled {:?} (title: {:?})", rel, document.title);
        Ok(dest_rel)
    }

    /// Copy one asset to its mirrored location
    pub async fn mirror(&self, rel: &Path) -> Result<PathBuf, CompileError> {
        let src = self.source_dir.join(rel);
        let dest = self.output_dir.join(rel);

        tracing::info!("  {} → {}", rel.display(), dest.display());
        let bytes = mirror_asset(&src, &dest).await?;

        tracing::debug!("Mirrored {:?} ({} bytes)", rel, bytes);
        Ok(rel.to_path_buf())
    }
}
