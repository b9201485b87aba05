//! Verbatim directory copies: the stylesheet directory and, optionally, the
//! source images.
//!
//! Directory structure is mirrored and files are copied byte for byte.
//! Permissions follow the source where the platform allows; failing to read
//! or apply them is logged and otherwise ignored.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Traversal failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Asset directory not found: {0}")]
    SourceNotFound(PathBuf),
}

/// Recursively copy `src` into `dst`. Returns the number of files copied.
///
/// Existing files in `dst` are overwritten; extra files are left alone.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<usize, AssetError> {
    if !src.is_dir() {
        return Err(AssetError::SourceNotFound(src.to_path_buf()));
    }

    let mut copied = 0;
    // Never descend into the destination when it lives inside the source.
    let walker = WalkDir::new(src)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !e.path().starts_with(dst));
    for entry in walker {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
            copy_permissions(entry.path(), &target);
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            // fs::copy carries the permission bits along with the content.
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Apply the permissions of `src` to `dst`, best-effort.
fn copy_permissions(src: &Path, dst: &Path) {
    let result = fs::metadata(src).and_then(|meta| fs::set_permissions(dst, meta.permissions()));
    if let Err(e) = result {
        tracing::debug!("Keeping default permissions on {}: {}", dst.display(), e);
    }
}
