//! # Shoebox
//!
//! A static photo gallery generator. Point it at a folder of pictures and it
//! produces a browsable site: every directory holding JPEG or PNG files
//! becomes a gallery, every image gets a thumbnail, an upright display copy
//! and its own page with previous/next navigation.
//!
//! # Architecture: One Pass, Four Stages
//!
//! ```text
//! 1. Scan      images/  →  Vec<Gallery>            (filesystem → ordered galleries)
//! 2. Process   Gallery  →  thumbs/*.png, *.jpg     (EXIF-upright, downscaled)
//! 3. Generate  Gallery  →  *.html                  (image, gallery and index pages)
//! 4. Copy      css/     →  public/css/             (and optionally the originals)
//! ```
//!
//! Galleries are processed one at a time; images within a gallery are
//! processed in parallel on a rayon pool and joined before that gallery's
//! pages are written. Nothing is persisted between stages except the output
//! files themselves, which double as the cache: a source whose thumbnail and
//! display image already exist is not decoded again.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the images root and assembles sorted, deduplicated galleries |
//! | [`classify`] | Path predicates and naming: supported extensions, gallery names, site links |
//! | [`imaging`] | Pure-Rust image operations: EXIF orientation, decode, downscale, encode |
//! | [`cache`] | Existence-based skip decisions and per-build counters |
//! | [`process`] | Parallel per-gallery thumbnail and display generation |
//! | [`generate`] | Renders image, gallery and index pages with Maud |
//! | [`assets`] | Verbatim directory copies (stylesheets, originals) |
//! | [`config`] | `config.toml` loading, validation and stock defaults |
//! | [`pipeline`] | The full build tying the stages together |
//! | [`output`] | CLI output formatting of scan results, progress and summaries |
//!
//! # Design Decisions
//!
//! ## Existence Is the Cache
//!
//! An output file that exists is trusted. There are no content hashes and no
//! manifests; `--regenerate` is the escape hatch when sources change in place.
//!
//! ## Failures Stay Local
//!
//! A source that cannot be decoded or encoded is logged and left out of the
//! pages. The rest of its gallery still builds, and neighbours link past it.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): templates are
//! compile-time checked and every interpolation is escaped.

pub mod assets;
pub mod cache;
pub mod classify;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
