//! Mapping of source-relative paths to destination-relative paths.

use std::path::{Path, PathBuf};

/// Replace the final extension of `rel` when it equals `from`, keeping
/// every directory segment. Paths with a different (or no) extension come
/// back unchanged, which makes `from == to` the identity used for assets.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use xhtmldoc_core::paths::map_extension;
///
/// assert_eq!(
///     map_extension(Path::new("guide/intro.md"), "md", "xhtml"),
///     PathBuf::from("guide/intro.xhtml")
/// );
/// ```
pub fn map_extension(rel: &Path, from: &str, to: &str) -> PathBuf {
    match rel.extension() {
        Some(ext) if ext == from => rel.with_extension(to),
        _ => rel.to_path_buf(),
    }
}
