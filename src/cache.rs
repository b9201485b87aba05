//! Output cache for incremental builds.
//!
//! Decoding and resizing are the bottleneck of a build, so the process stage
//! skips a source entirely when both of its derived files are already on
//! disk from a previous run.
//!
//! # Design
//!
//! The cache is **existence-based**: an output counts as cached when a file
//! (or symlink) is present at its path. Nothing is hashed or compared, so an
//! edited source keeps its stale outputs until they are deleted or the build
//! runs with `--regenerate`.
//!
//! | thumbnail | display | force | action |
//! |---|---|---|---|
//! | present | present | no | skip: no metadata read, decode, or encode |
//! | missing | any | no | decode once, write only what is missing |
//! | any | missing | no | decode once, write only what is missing |
//! | any | any | yes | decode once, write both |
//!
//! Pages are always regenerated; they are cheap.

use std::fmt;
use std::path::Path;

/// What the process stage must do for one source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePlan {
    /// Both outputs exist; leave the source untouched.
    Skip,
    /// Decode the source and write the flagged outputs.
    Write { thumbnail: bool, display: bool },
}

/// Whether something exists at `path`. A dangling symlink still counts.
pub fn output_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Decide which of an image's two outputs need writing.
pub fn plan(thumbnail: &Path, display: &Path, force: bool) -> CachePlan {
    if force {
        return CachePlan::Write {
            thumbnail: true,
            display: true,
        };
    }
    let thumbnail = !output_exists(thumbnail);
    let display = !output_exists(display);
    if thumbnail || display {
        CachePlan::Write { thumbnail, display }
    } else {
        CachePlan::Skip
    }
}

/// Summary of the process stage for a build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStats {
    pub cached: u32,
    pub encoded: u32,
    pub failed: u32,
}

impl ProcessStats {
    pub fn cached(&mut self) {
        self.cached += 1;
    }

    pub fn encoded(&mut self) {
        self.encoded += 1;
    }

    pub fn failed(&mut self) {
        self.failed += 1;
    }

    pub fn total(&self) -> u32 {
        self.cached + self.encoded + self.failed
    }

    pub fn merge(&mut self, other: ProcessStats) {
        self.cached += other.cached;
        self.encoded += other.encoded;
        self.failed += other.failed;
    }
}

impl fmt::Display for ProcessStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cached > 0 {
            write!(
                f,
                "{} cached, {} encoded ({} total)",
                self.cached,
                self.encoded,
                self.total()
            )?;
        } else {
            write!(f, "{} encoded", self.encoded)?;
        }
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        Ok(())
    }
}
