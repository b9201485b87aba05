//! Shared test utilities for the shoebox test suite.
//!
//! Provides fixture writers that produce real (tiny) JPEG and PNG files,
//! plus lookup helpers and bulk extractors for scan-phase data structures
//! (`Gallery`, `Image`).
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_jpeg(&tmp.path().join("Trip/beach.jpg"), 64, 48);
//! let outcome = scan(tmp.path()).unwrap();
//!
//! let trip = find_gallery(&outcome.galleries, "Trip");
//! assert_eq!(image_names(trip), vec!["beach"]);
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs::{self, File};
use std::path::Path;
use std::time::SystemTime;

use crate::scan::Gallery;

// =========================================================================
// Fixture writers
// =========================================================================

/// Gradient so that resampling and orientation bugs change pixels.
fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    }))
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
}

/// Write a real JPEG at `path`, creating parent directories.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    gradient(width, height)
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

/// Write a real PNG at `path`, creating parent directories.
pub fn write_png(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    gradient(width, height)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

/// Write a small JPEG and set its modification time.
pub fn write_jpeg_at(path: &Path, modified: SystemTime) {
    write_jpeg(path, 8, 6);
    set_mtime(path, modified);
}

pub fn set_mtime(path: &Path, modified: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(modified)
        .unwrap();
}

/// Write a JPEG carrying an EXIF Orientation tag with `value`.
///
/// The APP1 segment is spliced in right after the SOI marker and holds a
/// big-endian TIFF header with a single IFD entry (tag 0x0112, SHORT).
pub fn write_jpeg_with_orientation(path: &Path, width: u32, height: u32, value: u16) {
    ensure_parent(path);
    let mut encoded = Vec::new();
    gradient(width, height)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut encoded, 90))
        .unwrap();
    assert_eq!(&encoded[..2], &[0xFF, 0xD8], "encoder must start with SOI");

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2A");
    tiff.extend_from_slice(&8u32.to_be_bytes()); // first IFD offset
    tiff.extend_from_slice(&1u16.to_be_bytes()); // entry count
    tiff.extend_from_slice(&0x0112u16.to_be_bytes());
    tiff.extend_from_slice(&3u16.to_be_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&value.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes()); // no next IFD

    let mut payload = b"Exif\x00\x00".to_vec();
    payload.extend_from_slice(&tiff);

    let mut out = Vec::with_capacity(encoded.len() + payload.len() + 4);
    out.extend_from_slice(&encoded[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&encoded[2..]);
    fs::write(path, out).unwrap();
}

// =========================================================================
// Gallery lookups: panic with a clear message on miss
// =========================================================================

/// Find a gallery by name. Panics if not found.
pub fn find_gallery<'a>(galleries: &'a [Gallery], name: &str) -> &'a Gallery {
    galleries
        .iter()
        .find(|g| g.name == name)
        .unwrap_or_else(|| {
            let names = gallery_names(galleries);
            panic!("gallery '{name}' not found. Available: {names:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All gallery names in scan order.
pub fn gallery_names(galleries: &[Gallery]) -> Vec<&str> {
    galleries.iter().map(|g| g.name.as_str()).collect()
}

/// All image names in gallery order.
pub fn image_names(gallery: &Gallery) -> Vec<&str> {
    gallery.images.iter().map(|i| i.name.as_str()).collect()
}
