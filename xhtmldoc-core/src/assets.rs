//! Byte-for-byte mirroring of binary assets.

use crate::compiler::CompileError;
use crate::fs::ensure_parent;
use std::path::Path;
use tokio::fs;

/// Copy `src` to `dst`, creating the destination's directories and
/// overwriting whatever was there. Returns the number of bytes copied.
pub async fn mirror_asset(src: &Path, dst: &Path) -> Result<u64, CompileError> {
    ensure_parent(dst)
        .await
        .map_err(|source| CompileError::Write {
            path: dst.to_path_buf(),
            source,
        })?;

    fs::copy(src, dst)
        .await
        .map_err(|source| CompileError::Mirror {
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mirror_copies_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("logo.png");
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        std::fs::write(&src, &bytes).unwrap();

        let dst = dir.path().join("out/img/logo.png");
        let copied = mirror_asset(&src, &dst).await.unwrap();

        assert_eq!(copied, bytes.len() as u64);
        assert_eq!(std::fs::read(&dst).unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_mirror_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.gif");
        let dst = dir.path().join("b.gif");
        std::fs::write(&src, b"new").unwrap();
        std::fs::write(&dst, b"old contents").unwrap();

        mirror_asset(&src, &dst).await.unwrap();
        assert_eq!(std::fs::read(&dst).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_missing_source_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = mirror_asset(&dir.path().join("nope.png"), &dir.path().join("out.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, CompileError::Mirror { .. }));
    }
}
