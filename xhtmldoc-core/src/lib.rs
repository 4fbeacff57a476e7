//! # xhtmldoc-core
//!
//! Core library for the xhtmldoc documentation compiler.
//!
//! Markdown sources under a source root are rendered to strict XHTML 1.0
//! documents under an output root, and image assets are mirrored next to
//! them with the same relative paths. [`Builder`] does this for a whole
//! tree at once; [`WatchSession`] does it one changed file at a time.

pub mod assets;
pub mod builder;
pub mod compiler;
pub mod config;
pub mod document;
pub mod fs;
pub mod markdown;
pub mod paths;
pub mod patterns;
pub mod source;
pub mod title;
pub mod watch;

pub use builder::{BuildError, BuildPhase, BuildReport, Builder};
pub use compiler::{CompileError, Compiler};
pub use config::{Config, ConfigError, FailurePolicy, RenderConfig};
pub use document::{compose, Document};
pub use markdown::MarkupRenderer;
pub use paths::map_extension;
pub use patterns::{PatternError, SourcePattern};
pub use source::{FileClass, SourceFile};
pub use title::{extract_title, FALLBACK_TITLE};
pub use watch::{
    watch_source, EventClassifier, WatchError, WatchEvent, WatchEventKind, WatchSession,
    WatchSummary,
};
