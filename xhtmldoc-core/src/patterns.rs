//! Glob matching of source files relative to a root directory.
//!
//! Patterns follow the usual shell conventions: `*` stays inside one path
//! segment, `**` spans any number of directories (including none), and
//! `{a,b}` expands to one alternative per comma-separated item. Dotfiles
//! are only matched by a pattern that names the leading dot literally.

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Invalid glob pattern {pattern:?}: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Unbalanced braces in pattern {0:?}")]
    UnbalancedBraces(String),

    #[error("Root directory {0:?} does not exist or is not a directory")]
    MissingRoot(PathBuf),

    #[error("Failed to walk {root:?}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A compiled glob pattern, possibly expanded from brace alternation
#[derive(Debug, Clone)]
pub struct SourcePattern {
    source: String,
    alternatives: Vec<Pattern>,
}

impl SourcePattern {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let alternatives = expand_braces(pattern)?
            .iter()
            .map(|alt| {
                Pattern::new(alt).map_err(|source| PatternError::Invalid {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: pattern.to_string(),
            alternatives,
        })
    }

    /// The pattern text as given
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test a root-relative path
    pub fn matches(&self, rel: &Path) -> bool {
        let rel = to_slash(rel);
        self.alternatives
            .iter()
            .any(|p| p.matches_with(&rel, MATCH_OPTIONS))
    }

    /// Resolve the pattern against `root`, returning matching files as
    /// root-relative paths. Order is unspecified.
    pub fn find(&self, root: &Path) -> Result<Vec<PathBuf>, PatternError> {
        if !root.is_dir() {
            return Err(PatternError::MissingRoot(root.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|source| PatternError::Walk {
                root: root.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if self.matches(rel) {
                files.push(rel.to_path_buf());
            }
        }

        tracing::debug!("{} matched {} files under {:?}", self.source, files.len(), root);
        Ok(files)
    }
}

/// Expand `{a,b}` alternation into plain glob patterns. Nested groups are
/// expanded innermost-last; a pattern without braces yields itself.
pub fn expand_braces(pattern: &str) -> Result<Vec<String>, PatternError> {
    let Some(open) = pattern.find('{') else {
        if pattern.contains('}') {
            return Err(PatternError::UnbalancedBraces(pattern.to_string()));
        }
        return Ok(vec![pattern.to_string()]);
    };

    // Find the matching close brace and the top-level commas inside it
    let mut depth = 0usize;
    let mut close = None;
    let mut commas = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        let i = open + i;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            ',' if depth == 1 => commas.push(i),
            _ => {}
        }
    }
    let close = close.ok_or_else(|| PatternError::UnbalancedBraces(pattern.to_string()))?;

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let mut bounds = Vec::with_capacity(commas.len() + 2);
    bounds.push(open);
    bounds.extend(commas);
    bounds.push(close);

    let mut out = Vec::new();
    for pair in bounds.windows(2) {
        let item = &pattern[pair[0] + 1..pair[1]];
        out.extend(expand_braces(&format!("{prefix}{item}{suffix}"))?);
    }
    Ok(out)
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
