//! Parameter types for image operations.
//!
//! These structs describe *what* to write, not *how*. They sit between the
//! processing stage (which decides which outputs are missing) and the
//! [`backend`](super::backend) (which does the pixel and file work), so a
//! mock backend can stand in during tests.

use std::path::PathBuf;

/// Quality setting for lossy JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(93)
    }
}

/// The two derived rasters produced for every source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Small lossless preview used in grids.
    Thumbnail,
    /// Large lossy copy shown on the image page.
    Display,
}

impl Variant {
    pub fn label(self) -> &'static str {
        match self {
            Variant::Thumbnail => "thumbnail",
            Variant::Display => "display",
        }
    }
}

/// Encoded file format. The output extension always follows the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossless, default compression.
    Png,
    Jpeg(Quality),
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg(_) => "jpg",
        }
    }
}

/// Parameters for writing one encoded image.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub output: PathBuf,
    pub format: OutputFormat,
}

impl EncodeParams {
    /// The path actually written: `output` with the format's extension.
    pub fn normalized_output(&self) -> PathBuf {
        self.output.with_extension(self.format.extension())
    }
}
