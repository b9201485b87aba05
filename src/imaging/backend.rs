//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the three operations that touch files:
//! reading the orientation tag, decoding, and encoding. Orientation handling
//! and resizing are pure functions over decoded images (see
//! [`operations`](super::operations)), so they need no backend support.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::orientation::Orientation;
use super::params::EncodeParams;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("Unsupported image format in {0} (expected JPEG or PNG)")]
    UnsupportedFormat(PathBuf),
    #[error("Failed to encode {path}: {reason}")]
    Encode { path: PathBuf, reason: String },
}

/// Trait for image processing backends.
///
/// Backends are shared across rayon workers, hence the `Sync` bound.
pub trait ImageBackend: Sync {
    /// Orientation recorded in the file's metadata. Never fails.
    fn orientation(&self, path: &Path) -> Orientation;

    /// Decode a source image; the format is detected from its content.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode `img` as described by `params`, creating parent directories.
    /// Returns the path actually written.
    fn encode(&self, img: &DynamicImage, params: &EncodeParams) -> Result<PathBuf, BackendError>;
}
