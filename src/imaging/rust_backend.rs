//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Orientation | `kamadak-exif` via [`read_orientation`](super::orientation::read_orientation) |
//! | Decode (JPEG, PNG) | `image::ImageReader` with content sniffing |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (default compression) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (fixed quality, RGB8) |

use super::backend::{BackendError, ImageBackend};
use super::orientation::{Orientation, read_orientation};
use super::params::{EncodeParams, OutputFormat};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, reason: impl ToString) -> BackendError {
    BackendError::Decode {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn encode_error(path: &Path, reason: impl ToString) -> BackendError {
    BackendError::Encode {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Encode into an already-created file.
fn write_encoded(
    img: &DynamicImage,
    format: OutputFormat,
    file: File,
    path: &Path,
) -> Result<(), BackendError> {
    let mut writer = BufWriter::new(file);
    match format {
        OutputFormat::Png => img
            .write_with_encoder(PngEncoder::new(&mut writer))
            .map_err(|e| encode_error(path, e))?,
        OutputFormat::Jpeg(quality) => {
            // The JPEG encoder has no alpha support.
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(
                &mut writer,
                quality.value() as u8,
            ))
            .map_err(|e| encode_error(path, e))?
        }
    }
    writer.flush()?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn orientation(&self, path: &Path) -> Orientation {
        read_orientation(path)
    }

    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        match reader.format() {
            Some(ImageFormat::Jpeg) | Some(ImageFormat::Png) => {}
            _ => return Err(BackendError::UnsupportedFormat(path.to_path_buf())),
        }
        reader.decode().map_err(|e| decode_error(path, e))
    }

    fn encode(&self, img: &DynamicImage, params: &EncodeParams) -> Result<PathBuf, BackendError> {
        let output = params.normalized_output();
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&output)?;
        if let Err(e) = write_encoded(img, params.format, file, &output) {
            // A truncated file would otherwise satisfy the existence cache.
            let _ = fs::remove_file(&output);
            return Err(e);
        }
        Ok(output)
    }
}
