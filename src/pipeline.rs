//! The full build: scan → process → generate → copy.
//!
//! ```text
//! scan::scan ──► per gallery: process::process_gallery ──► PageRenderer
//!                                   (rayon, joined)         (image pages,
//!                                                            gallery page)
//!            ──► index page ──► assets::copy_dir (css, originals)
//! ```
//!
//! Galleries are handled one after another; the images inside a gallery
//! are processed in parallel and joined before its pages are written.
//!
//! ## Failure policy
//!
//! | Failure | Effect |
//! |---|---|
//! | config, missing images root | fatal before any work |
//! | decode / encode of one image | logged, image left out of the pages |
//! | writing a page | fatal |
//! | copying assets or originals | logged as a warning |
//! | unreadable directory during the walk | everything found so far is still built, then fatal |

use crate::assets;
use crate::cache::ProcessStats;
use crate::config::{self, ConfigError, SiteConfig};
use crate::generate::{GenerateError, ORIGINALS_DIR, PageRenderer, PublishedGallery};
use crate::imaging::ImageBackend;
use crate::process::{self, ProcessEvent, ProcessSettings};
use crate::scan::{self, ScanError, ScanOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Directory under the output root that receives the assets copy.
pub const ASSETS_OUTPUT_DIR: &str = "css";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The walk stopped early; the galleries found before it were built.
    #[error("Build incomplete: {0}")]
    Traversal(ScanError),
}

/// Runtime options for one build, taken from the command line.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Images root.
    pub source: PathBuf,
    /// Site root; created if missing.
    pub output: PathBuf,
    /// Directory copied verbatim to `<output>/css`.
    pub assets: Option<PathBuf>,
    /// Explicit config file; defaults to `<source>/config.toml`.
    pub config: Option<PathBuf>,
    /// Regenerate pages only, leaving images untouched.
    pub pages_only: bool,
    /// Rewrite every thumbnail and display image.
    pub force: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            source: PathBuf::from("images"),
            output: PathBuf::from("public"),
            assets: Some(PathBuf::from("css")),
            config: None,
            pages_only: false,
            force: false,
        }
    }
}

/// What a build produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub galleries: usize,
    /// Images that got a page.
    pub images: usize,
    pub pages: usize,
    /// Process-stage counters; all zero for a pages-only build.
    pub stats: ProcessStats,
    /// Files copied from the assets directory, if the copy succeeded.
    pub assets_copied: Option<usize>,
    /// Files copied to the originals tree, if enabled and successful.
    pub originals_copied: Option<usize>,
}

/// Load the configuration a build with `options` would use.
pub fn load_config(options: &BuildOptions) -> Result<SiteConfig, BuildError> {
    let config = match &options.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(&options.source)?,
    };
    Ok(config)
}

/// Run the whole pipeline.
///
/// Progress events, when a sender is given, are emitted while images are
/// processed; the sender is dropped when the build returns.
pub fn build(
    backend: &impl ImageBackend,
    config: &SiteConfig,
    options: &BuildOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BuildReport, BuildError> {
    tracing::info!("Scanning {}", options.source.display());
    let outcome = scan::scan(&options.source)?;
    publish(backend, config, options, outcome, events)
}

/// Process, render and copy the galleries of a finished scan.
///
/// An interrupted scan is published as far as it got, then reported as
/// [`BuildError::Traversal`].
pub fn publish(
    backend: &impl ImageBackend,
    config: &SiteConfig,
    options: &BuildOptions,
    outcome: ScanOutcome,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BuildReport, BuildError> {
    let ScanOutcome {
        galleries,
        interrupted,
    } = outcome;

    fs::create_dir_all(&options.output)?;
    let settings = ProcessSettings::from_config(config, options.force);
    let renderer = PageRenderer::new(config, &options.output);
    let mut report = BuildReport {
        galleries: galleries.len(),
        ..BuildReport::default()
    };

    let mut published = Vec::with_capacity(galleries.len());
    for gallery in &galleries {
        let ready = if options.pages_only {
            PublishedGallery::all(gallery)
        } else {
            let result = process::process_gallery(
                backend,
                gallery,
                &options.output,
                &settings,
                events.as_ref(),
            );
            report.stats.merge(result.stats);
            PublishedGallery {
                gallery,
                images: gallery
                    .images
                    .iter()
                    .zip(&result.outcomes)
                    .filter(|(_, outcome)| outcome.is_ready())
                    .map(|(image, _)| image)
                    .collect(),
            }
        };

        report.images += ready.images.len();
        report.pages += renderer.render_gallery_pages(&ready)?;
        published.push(ready);
    }
    drop(events);

    tracing::info!("Writing index for {} galleries", published.len());
    renderer.render_index(&published)?;
    report.pages += 1;

    if let Some(assets_dir) = &options.assets {
        report.assets_copied = copy_tree(assets_dir, &options.output.join(ASSETS_OUTPUT_DIR));
    }
    if config.output.copy_sources {
        report.originals_copied =
            copy_tree(&options.source, &options.output.join(ORIGINALS_DIR));
    }

    match interrupted {
        Some(e) => {
            tracing::warn!("Traversal stopped early, site is incomplete: {}", e);
            Err(BuildError::Traversal(e))
        }
        None => Ok(report),
    }
}

/// Copy a directory, downgrading failure to a warning.
fn copy_tree(src: &Path, dst: &Path) -> Option<usize> {
    match assets::copy_dir(src, dst) {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!("Could not copy {} to {}: {}", src.display(), dst.display(), e);
            None
        }
    }
}
