//! High-level image operations.
//!
//! These functions combine calculations with backend execution: a source is
//! loaded once and turned upright, then each missing variant is downscaled
//! from that upright copy and encoded.

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_downscale_dimensions;
use super::params::EncodeParams;
use image::DynamicImage;
use image::imageops::FilterType;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Decode a source and apply its recorded orientation.
pub fn load_upright(backend: &impl ImageBackend, source: &Path) -> Result<DynamicImage> {
    let orientation = backend.orientation(source);
    let img = backend.decode(source)?;
    Ok(orientation.apply(img))
}

/// Shrink `img` so it fits `target`, or borrow it unchanged when it already
/// does. Uses Catmull-Rom (bicubic) resampling.
pub fn downscale(img: &DynamicImage, target: u32) -> Cow<'_, DynamicImage> {
    match calculate_downscale_dimensions((img.width(), img.height()), target) {
        Some((w, h)) => Cow::Owned(img.resize_exact(w, h, FilterType::CatmullRom)),
        None => Cow::Borrowed(img),
    }
}

/// Downscale an upright image to `target` and encode it.
pub fn write_variant(
    backend: &impl ImageBackend,
    upright: &DynamicImage,
    target: u32,
    params: &EncodeParams,
) -> Result<PathBuf> {
    let scaled = downscale(upright, target);
    backend.encode(&scaled, params)
}
