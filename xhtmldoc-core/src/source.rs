//! Source files and their classification.

use std::path::PathBuf;

/// What kind of source a path is.
///
/// Classification itself is done by the configured glob patterns, so a
/// path is markup or an asset exactly when its pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileClass {
    /// Markdown, compiled to an XHTML document
    Markup,
    /// Binary file mirrored byte-for-byte
    Asset,
}

impl FileClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileClass::Markup => "markup",
            FileClass::Asset => "asset",
        }
    }
}

impl std::fmt::Display for FileClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source file identified by its path under the source root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    pub rel_path: PathBuf,
    pub class: FileClass,
}

impl SourceFile {
    pub fn new(rel_path: impl Into<PathBuf>, class: FileClass) -> Self {
        Self {
            rel_path: rel_path.into(),
            class,
        }
    }

    pub fn markup(rel_path: impl Into<PathBuf>) -> Self {
        Self::new(rel_path, FileClass::Markup)
    }

    pub fn asset(rel_path: impl Into<PathBuf>) -> Self {
        Self::new(rel_path, FileClass::Asset)
    }
}
