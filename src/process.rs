//! Image normalization: thumbnails and display images.
//!
//! Stage 2 of the build pipeline. Takes the galleries assembled by the scan
//! stage and derives two rasters from every source image.
//!
//! ## Output Formats
//!
//! | Variant | Format | Default size |
//! |---|---|---|
//! | Thumbnail | PNG, default compression | 256px |
//! | Display | JPEG, quality 93 | 1024px |
//!
//! Sizes follow the downscale rule in
//! [`calculate_downscale_dimensions`](crate::imaging::calculate_downscale_dimensions):
//! images no wider than the target pass through, others are scaled to the
//! target height.
//!
//! ## Output Structure
//!
//! ```text
//! public/
//! ├── thumbs/
//! │   └── Trip/
//! │       └── beach.png     # thumbnail
//! └── Trip/
//!     └── beach.jpg         # display image
//! ```
//!
//! ## Parallel Processing
//!
//! Images within a gallery are processed in parallel using
//! [rayon](https://docs.rs/rayon); each task owns one image end-to-end and
//! writes only that image's two files. Results are collected in gallery
//! order, so the page stage sees a stable order regardless of scheduling.
//!
//! ## Failures
//!
//! A source that cannot be decoded, or an output that cannot be written,
//! only affects its own image: the failure is logged, the image is reported
//! as [`ImageOutcome::Failed`] and left out of the pages. Its siblings carry
//! on.
//!
//! ## Caching
//!
//! See [`cache`](crate::cache). An image whose outputs both exist is skipped
//! without being opened.

use crate::cache::{self, CachePlan, ProcessStats};
use crate::config::SiteConfig;
use crate::imaging::{
    BackendError, EncodeParams, ImageBackend, OutputFormat, Quality, Variant, load_upright,
    write_variant,
};
use crate::scan::{Gallery, Image};
use rayon::prelude::*;
use std::path::Path;
use std::sync::mpsc::Sender;

/// Encoding settings for one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSettings {
    pub thumbnail_size: u32,
    pub display_size: u32,
    pub quality: Quality,
    /// Rewrite outputs even when they already exist.
    pub force: bool,
}

impl ProcessSettings {
    pub fn from_config(config: &SiteConfig, force: bool) -> Self {
        Self {
            thumbnail_size: config.images.thumbnail_size,
            display_size: config.images.display_size,
            quality: Quality::new(config.images.jpeg_quality),
            force,
        }
    }
}

impl Default for ProcessSettings {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default(), false)
    }
}

/// Whether a variant was written or found from a previous run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantStatus {
    Cached,
    Encoded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantInfo {
    pub label: String,
    pub status: VariantStatus,
}

/// Per-image result of the process stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Both outputs are on disk; the image gets a page.
    Ready { variants: Vec<VariantInfo> },
    /// Decoding or encoding failed; the image is left out of the pages.
    Failed { reason: String },
}

impl ImageOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, ImageOutcome::Ready { .. })
    }
}

/// Progress events emitted during image processing.
///
/// Sent through an `mpsc` channel so the caller can display progress
/// while rayon workers are still running.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    GalleryStarted {
        name: String,
        image_count: usize,
    },
    ImageProcessed {
        /// 1-based position within the gallery.
        index: usize,
        name: String,
        source_path: String,
        outcome: ImageOutcome,
    },
}

/// Outcomes for one gallery, in gallery order.
#[derive(Debug)]
pub struct GalleryResult {
    pub outcomes: Vec<ImageOutcome>,
    pub stats: ProcessStats,
}

/// Produce the thumbnail and display image of one source.
///
/// The source is decoded at most once, and only when at least one output
/// needs writing.
pub fn process_image(
    backend: &impl ImageBackend,
    image: &Image,
    output_dir: &Path,
    settings: &ProcessSettings,
) -> Result<Vec<VariantInfo>, BackendError> {
    let thumbnail_path = output_dir.join(&image.thumb_path);
    let display_path = output_dir.join(&image.display_path);

    let (write_thumbnail, write_display) =
        match cache::plan(&thumbnail_path, &display_path, settings.force) {
            CachePlan::Skip => {
                tracing::debug!("{} is up to date", image.source.display());
                return Ok(vec![
                    variant_info(Variant::Thumbnail, VariantStatus::Cached),
                    variant_info(Variant::Display, VariantStatus::Cached),
                ]);
            }
            CachePlan::Write { thumbnail, display } => (thumbnail, display),
        };

    let upright = load_upright(backend, &image.source)?;

    let targets = [
        (
            Variant::Thumbnail,
            write_thumbnail,
            settings.thumbnail_size,
            EncodeParams {
                output: thumbnail_path,
                format: OutputFormat::Png,
            },
        ),
        (
            Variant::Display,
            write_display,
            settings.display_size,
            EncodeParams {
                output: display_path,
                format: OutputFormat::Jpeg(settings.quality),
            },
        ),
    ];

    let mut variants = Vec::with_capacity(targets.len());
    for (variant, needed, size, params) in targets {
        let status = if needed {
            write_variant(backend, &upright, size, &params)?;
            VariantStatus::Encoded
        } else {
            VariantStatus::Cached
        };
        variants.push(variant_info(variant, status));
    }
    Ok(variants)
}

fn variant_info(variant: Variant, status: VariantStatus) -> VariantInfo {
    VariantInfo {
        label: variant.label().to_string(),
        status,
    }
}

/// Process every image of a gallery in parallel.
///
/// Never fails as a whole: per-image errors are logged and reported as
/// [`ImageOutcome::Failed`].
pub fn process_gallery(
    backend: &impl ImageBackend,
    gallery: &Gallery,
    output_dir: &Path,
    settings: &ProcessSettings,
    events: Option<&Sender<ProcessEvent>>,
) -> GalleryResult {
    if let Some(tx) = events {
        tx.send(ProcessEvent::GalleryStarted {
            name: gallery.name.clone(),
            image_count: gallery.images.len(),
        })
        .ok();
    }

    let outcomes: Vec<ImageOutcome> = gallery
        .images
        .par_iter()
        .enumerate()
        .map_with(events.cloned(), |tx, (idx, image)| {
            let outcome = match process_image(backend, image, output_dir, settings) {
                Ok(variants) => ImageOutcome::Ready { variants },
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", image.source.display(), e);
                    ImageOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            if let Some(tx) = tx {
                tx.send(ProcessEvent::ImageProcessed {
                    index: idx + 1,
                    name: image.name.clone(),
                    source_path: image.unbound.to_string_lossy().into_owned(),
                    outcome: outcome.clone(),
                })
                .ok();
            }
            outcome
        })
        .collect();

    let mut stats = ProcessStats::default();
    for outcome in &outcomes {
        match outcome {
            ImageOutcome::Failed { .. } => stats.failed(),
            ImageOutcome::Ready { variants }
                if variants.iter().all(|v| v.status == VariantStatus::Cached) =>
            {
                stats.cached()
            }
            ImageOutcome::Ready { .. } => stats.encoded(),
        }
    }

    GalleryResult { outcomes, stats }
}
