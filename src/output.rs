//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (gallery, image) is its semantic identity (name and
//! positional index), with filesystem paths shown as secondary context via
//! indented `Source:` lines.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Galleries
//! 001 Trip (2 photos)
//!     Source: Trip/
//!     001 beach
//!         Source: Trip/beach.jpg
//!     002 dunes
//!         Source: Trip/dunes.png
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Process
//!
//! ```text
//! Trip (2 photos)
//!     001 beach
//!         Source: Trip/beach.jpg
//!         thumbnail: cached
//!         display: encoded
//!     002 dunes
//!         Source: Trip/dunes.png
//!         failed: Failed to decode ...
//! ```
//!
//! ## Build summary
//!
//! ```text
//! Images: 1 cached, 1 encoded (3 total), 1 failed
//! Pages: 5 written for 1 gallery (2 photos)
//! Assets: 1 file copied
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure
//! and do no I/O.

use crate::classify;
use crate::pipeline::BuildReport;
use crate::process::{ImageOutcome, ProcessEvent, VariantStatus};
use crate::scan::Gallery;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format an entity header: positional index + name, with optional photo count.
///
/// ```text
/// 001 Trip (5 photos)
/// 001 beach
/// ```
fn entity_header(index: usize, name: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{} {} ({})", format_index(index), name, photos(n)),
        None => format!("{} {}", format_index(index), name),
    }
}

fn photos(n: usize) -> String {
    plural(n, "photo", "photos")
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

/// Forward-slash rendering of a relative path; the empty path becomes `.`.
fn display_relative(path: &Path) -> String {
    let link = classify::site_link(path);
    match link.trim_start_matches('/') {
        "" => ".".to_string(),
        rel => rel.to_string(),
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing discovered galleries.
pub fn format_scan_output(galleries: &[Gallery], source_root: &Path) -> Vec<String> {
    let mut lines = vec!["Galleries".to_string()];

    for (i, gallery) in galleries.iter().enumerate() {
        lines.push(entity_header(i + 1, &gallery.name, Some(gallery.images.len())));
        let source_dir = classify::unbound_path(&gallery.source_dir, source_root);
        lines.push(format!("    Source: {}/", display_relative(&source_dir)));

        for (j, image) in gallery.images.iter().enumerate() {
            lines.push(format!("    {}", entity_header(j + 1, &image.name, None)));
            lines.push(format!("        Source: {}", display_relative(&image.unbound)));
        }
    }

    if galleries.is_empty() {
        lines.push("    (no images found)".to_string());
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join(crate::config::CONFIG_FILENAME).exists() {
        lines.push(format!("    {}", crate::config::CONFIG_FILENAME));
    } else {
        lines.push("    (defaults)".to_string());
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(galleries: &[Gallery], source_root: &Path) {
    for line in format_scan_output(galleries, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Process output
// ============================================================================

/// Format a single process progress event as display lines.
///
/// Each image leads with its positional index and name. Source path and
/// per-variant cache status are shown as indented context.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::GalleryStarted { name, image_count } => {
            vec![format!("{} ({})", name, photos(*image_count))]
        }
        ProcessEvent::ImageProcessed {
            index,
            name,
            source_path,
            outcome,
        } => {
            let mut lines = vec![
                format!("    {}", entity_header(*index, name, None)),
                format!("        Source: {}", source_path),
            ];
            match outcome {
                ImageOutcome::Ready { variants } => {
                    for variant in variants {
                        let status = match variant.status {
                            VariantStatus::Cached => "cached",
                            VariantStatus::Encoded => "encoded",
                        };
                        lines.push(format!("        {}: {}", variant.label, status));
                    }
                }
                ImageOutcome::Failed { reason } => {
                    lines.push(format!("        failed: {}", reason));
                }
            }
            lines
        }
    }
}

// ============================================================================
// Build summary
// ============================================================================

/// Format the end-of-build summary.
pub fn format_build_summary(report: &BuildReport, pages_only: bool) -> Vec<String> {
    let mut lines = Vec::new();

    if pages_only {
        lines.push("Images: skipped (pages only)".to_string());
    } else {
        lines.push(format!("Images: {}", report.stats));
    }

    lines.push(format!(
        "Pages: {} written for {} ({})",
        report.pages,
        plural(report.galleries, "gallery", "galleries"),
        photos(report.images)
    ));

    match report.assets_copied {
        Some(n) => lines.push(format!("Assets: {} copied", plural(n, "file", "files"))),
        None => lines.push("Assets: not copied".to_string()),
    }
    if let Some(n) = report.originals_copied {
        lines.push(format!("Originals: {} copied", plural(n, "file", "files")));
    }

    lines
}

/// Print the build summary to stdout.
pub fn print_build_summary(report: &BuildReport, pages_only: bool) {
    for line in format_build_summary(report, pages_only) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
