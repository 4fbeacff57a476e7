//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Source root {0:?} does not exist or is not a directory")]
    MissingSourceRoot(PathBuf),

    #[error("Invalid extension {0:?}: must be non-empty and have no leading dot")]
    InvalidExtension(String),
}

/// Main configuration struct matching the xhtmldoc.yml schema
///
/// Every field has a default, so an empty file (or no file at all) yields
/// the stock `src/**/*.md -> dist/**/*.xhtml` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub markup: MarkupConfig,

    #[serde(default = "default_asset_extensions")]
    pub asset_extensions: Vec<String>,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub on_error: FailurePolicy,

    // Internal: directory relative paths are resolved against
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_source")]
    pub source: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupConfig {
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    #[serde(default = "default_target_extension")]
    pub target_extension: String,
}

/// Fixed renderer switches.
///
/// Singleton tags (`<br />`, `<hr />`, `<img ... />`) are always emitted in
/// self-closing form; that is not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Pass raw HTML found in the source through unescaped
    #[serde(default = "default_true")]
    pub raw_html: bool,

    /// Turn bare URLs into links
    #[serde(default = "default_true")]
    pub linkify: bool,

    /// Replace straight quotes and dashes with typographic ones
    #[serde(default = "default_true")]
    pub typographer: bool,
}

/// How the batch builder reacts to a per-file failure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failing file and skip everything after it
    #[default]
    FailFast,
    /// Process every file, then report all failures together
    Collect,
}

pub const DEFAULT_ASSET_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "ico"];

fn default_source() -> PathBuf {
    PathBuf::from("src")
}

fn default_output() -> PathBuf {
    PathBuf::from("dist")
}

fn default_source_extension() -> String {
    String::from("md")
}

fn default_target_extension() -> String {
    String::from("xhtml")
}

fn default_asset_extensions() -> Vec<String> {
    DEFAULT_ASSET_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            output: default_output(),
        }
    }
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            source_extension: default_source_extension(),
            target_extension: default_target_extension(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            raw_html: true,
            linkify: true,
            typographer: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            markup: MarkupConfig::default(),
            asset_extensions: default_asset_extensions(),
            render: RenderConfig::default(),
            on_error: FailurePolicy::default(),
            base_dir: None,
        }
    }
}

/// Absolute directory holding the config file at `path`
///
/// A bare file name like `xhtmldoc.yml` is anchored at the current
/// directory once, at load time.
fn config_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    if parent.is_absolute() {
        return Ok(parent.to_path_buf());
    }
    let cwd = std::env::current_dir()?;
    if parent.as_os_str().is_empty() {
        Ok(cwd)
    } else {
        Ok(cwd.join(parent))
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        // Store the config file's directory for relative path resolution
        config.base_dir = Some(config_dir(path)?);

        Ok(config)
    }

    /// Load the config file if it exists, otherwise use defaults anchored at
    /// the directory that would have held it.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.is_file() {
            return Self::from_file(path);
        }
        tracing::debug!("No config at {:?}, using defaults", path);
        Ok(Self::default().with_base_dir(config_dir(path)?))
    }

    /// Parse configuration from YAML text. An empty document is all defaults.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(contents)?;
        config.check_extensions()?;
        Ok(config)
    }

    /// Anchor relative paths at `dir`
    pub fn with_base_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Get the source directory, resolved relative to the config file
    pub fn source_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.source)
    }

    /// Get the output directory, resolved relative to the config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Glob pattern selecting markup sources, e.g. `**/*.md`
    pub fn markup_pattern(&self) -> String {
        format!("**/*.{}", self.markup.source_extension)
    }

    /// Glob pattern selecting assets, e.g. `**/*.{png,jpg}`
    pub fn asset_pattern(&self) -> String {
        match self.asset_extensions.as_slice() {
            [single] => format!("**/*.{single}"),
            many => format!("**/*.{{{}}}", many.join(",")),
        }
    }

    /// Fail with a configuration error before any work starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_extensions()?;
        let source = self.source_dir();
        if !source.is_dir() {
            return Err(ConfigError::MissingSourceRoot(source));
        }
        Ok(())
    }

    fn check_extensions(&self) -> Result<(), ConfigError> {
        let all = [&self.markup.source_extension, &self.markup.target_extension]
            .into_iter()
            .chain(self.asset_extensions.iter());
        for ext in all {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(ConfigError::InvalidExtension(ext.clone()));
            }
        }
        Ok(())
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.paths.source, PathBuf::from("src"));
        assert_eq!(config.paths.output, PathBuf::from("dist"));
        assert_eq!(config.markup.source_extension, "md");
        assert_eq!(config.markup.target_extension, "xhtml");
        assert_eq!(config.asset_extensions.len(), 7);
        assert!(config.render.raw_html && config.render.linkify && config.render.typographer);
        assert_eq!(config.on_error, FailurePolicy::FailFast);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_yaml() {
        let config = Config::from_yaml(
            r#"
paths:
  output: public
render:
  linkify: false
on_error: collect
"#,
        )
        .unwrap();

        assert_eq!(config.paths.source, PathBuf::from("src"));
        assert_eq!(config.paths.output, PathBuf::from("public"));
        assert!(!config.render.linkify);
        assert!(config.render.typographer);
        assert_eq!(config.on_error, FailurePolicy::Collect);
    }

    #[test]
    fn test_patterns() {
        let config = Config::default();
        assert_eq!(config.markup_pattern(), "**/*.md");
        assert_eq!(
            config.asset_pattern(),
            "**/*.{png,jpg,jpeg,gif,svg,webp,ico}"
        );

        let single = Config::from_yaml("asset_extensions: [png]").unwrap();
        assert_eq!(single.asset_pattern(), "**/*.png");
    }

    #[test]
    fn test_rejects_dotted_extension() {
        let err = Config::from_yaml("asset_extensions: [.png]").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidExtension(_)));
    }

    #[test]
    fn test_paths_resolve_against_base_dir() {
        let config = Config::default().with_base_dir("/opt/docs");
        assert_eq!(config.source_dir(), PathBuf::from("/opt/docs/src"));
        assert_eq!(config.output_dir(), PathBuf::from("/opt/docs/dist"));

        let absolute = Config::from_yaml("paths:\n  source: /srv/in\n")
            .unwrap()
            .with_base_dir("/opt/docs");
        assert_eq!(absolute.source_dir(), PathBuf::from("/srv/in"));
    }

    #[test]
    fn test_validate_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default().with_base_dir(dir.path());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingSourceRoot(_))
        ));

        std::fs::create_dir(dir.path().join("src")).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_anchors_at_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xhtmldoc.yml");
        std::fs::write(&path, "paths:\n  source: docs\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.source_dir(), dir.path().join("docs"));

        let fallback = Config::load_or_default(dir.path().join("missing.yml")).unwrap();
        assert_eq!(fallback.output_dir(), dir.path().join("dist"));
    }

    #[test]
    fn test_bare_config_name_anchors_absolutely() {
        let cwd = std::env::current_dir().unwrap();

        let config = Config::load_or_default("no-such-xhtmldoc.yml").unwrap();
        assert!(config.source_dir().is_absolute());
        assert_eq!(config.source_dir(), cwd.join("src"));

        let nested = Config::load_or_default("conf/no-such-xhtmldoc.yml").unwrap();
        assert_eq!(nested.output_dir(), cwd.join("conf").join("dist"));
    }
}
