//! Output writes that create their parent directories.

use std::io;
use std::path::Path;
use tokio::fs;

/// Create every missing directory above `path`
pub async fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}

/// Write `contents` to `path`, replacing any existing file
pub async fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
    ensure_parent(path).await?;
    fs::write(path, contents).await
}
