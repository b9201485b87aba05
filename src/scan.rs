//! Filesystem scanning and gallery assembly.
//!
//! Walks the images root and groups every supported image into a [`Gallery`]
//! keyed by its (case-folded) parent directory. Every directory level that
//! holds images is its own gallery; nested directories are never merged into
//! their parent.
//!
//! ```text
//! images/                     # images root
//! ├── Trip/                   # gallery "Trip"
//! │   ├── beach.jpg
//! │   └── dunes.png
//! └── 2019/
//!     ├── cover.jpg           # gallery "2019"
//!     └── Winter/             # gallery "Winter", independent of "2019"
//!         └── snow.jpeg
//! ```
//!
//! ## Ordering
//!
//! Within a gallery images are sorted by modification time, most recent
//! first; equal timestamps fall back to the file name so repeated builds
//! produce identical pages. Galleries are returned ordered by key.
//!
//! ## Output paths
//!
//! Output paths depend only on the gallery and the image stem, never on the
//! sort position:
//!
//! ```text
//! thumbs/<gallery>/<stem>.png   thumbnail
//! <gallery>/<stem>.jpg          display image
//! <gallery>/<stem>.html         image page
//! ```
//!
//! Images are processed in parallel and each one writes its own two files,
//! so no two images may resolve to the same output. Stems that collide
//! case-insensitively (`a.jpg` next to `a.png`) are disambiguated here.
//!
//! ## Traversal errors
//!
//! An unreadable entry stops the walk. Whatever was assembled up to that
//! point is still returned in [`ScanOutcome`] alongside the error, so the
//! caller can publish the finished galleries before reporting the failure.

use crate::classify;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// File stem of a gallery's own listing page; never given to an image.
pub const GALLERY_PAGE_STEM: &str = "index";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Traversal failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Images directory not found: {0}")]
    RootNotFound(PathBuf),
}

/// A directory of images, published as one listing page.
#[derive(Debug, Clone, Serialize)]
pub struct Gallery {
    /// Case-folded source directory, the gallery's identity.
    pub key: String,
    /// Directory base name as first encountered.
    pub name: String,
    pub source_dir: PathBuf,
    /// Site-relative directory the gallery is published under.
    pub unbound: PathBuf,
    pub images: Vec<Image>,
}

impl Gallery {
    /// Site URL of the gallery page.
    pub fn page_link(&self) -> String {
        let link = classify::site_link(&self.unbound);
        if link.ends_with('/') {
            link
        } else {
            format!("{link}/")
        }
    }

    /// Relative output path of the gallery page.
    pub fn index_path(&self) -> PathBuf {
        self.unbound.join(format!("{GALLERY_PAGE_STEM}.html"))
    }

    /// The first `n` images (fewer if the gallery is smaller).
    pub fn first_images(&self, n: usize) -> &[Image] {
        &self.images[..n.min(self.images.len())]
    }
}

/// A source image and the outputs derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct Image {
    /// File stem, used as the display title.
    pub name: String,
    pub source: PathBuf,
    /// Source path relative to the images root.
    pub unbound: PathBuf,
    pub modified: SystemTime,
    /// Stem shared by all outputs; unique within the gallery.
    pub output_stem: String,
    /// `<gallery>/<stem>.jpg`, relative to the output root.
    pub display_path: PathBuf,
    /// `thumbs/<gallery>/<stem>.png`, relative to the output root.
    pub thumb_path: PathBuf,
    /// `<gallery>/<stem>.html`, relative to the output root.
    pub page_path: PathBuf,
}

impl Image {
    pub fn page_link(&self) -> String {
        classify::site_link(&self.page_path)
    }

    pub fn image_link(&self) -> String {
        classify::site_link(&self.display_path)
    }

    pub fn thumb_link(&self) -> String {
        classify::site_link(&self.thumb_path)
    }
}

/// Result of walking the images root.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Assembled galleries, ordered by key.
    pub galleries: Vec<Gallery>,
    /// The error that stopped the walk early, if any.
    pub interrupted: Option<ScanError>,
}

pub fn scan(root: &Path) -> Result<ScanOutcome, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }

    Ok(assemble(root, WalkDir::new(root).sort_by_file_name()))
}

/// Group walked entries into galleries, stopping at the first error.
fn assemble<E>(root: &Path, entries: impl IntoIterator<Item = Result<DirEntry, E>>) -> ScanOutcome
where
    E: Into<ScanError>,
{
    let mut galleries: BTreeMap<String, Gallery> = BTreeMap::new();
    let mut interrupted = None;

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                interrupted = Some(e.into());
                break;
            }
        };
        if entry.file_type().is_dir() || !classify::is_supported_image(entry.path()) {
            continue;
        }
        let modified = match entry.metadata() {
            Ok(meta) => meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            Err(e) => {
                interrupted = Some(ScanError::Walk(e));
                break;
            }
        };
        add_image(&mut galleries, root, entry.path(), modified);
    }

    let mut galleries: Vec<Gallery> = galleries.into_values().collect();
    assign_gallery_paths(&mut galleries, root, &root_gallery_name(root));
    for gallery in &mut galleries {
        assign_output_paths(gallery);
        sort_images(&mut gallery.images);
    }

    ScanOutcome {
        galleries,
        interrupted,
    }
}

/// Append an image to its gallery, creating the gallery on first sight.
fn add_image(
    galleries: &mut BTreeMap<String, Gallery>,
    root: &Path,
    path: &Path,
    modified: SystemTime,
) {
    let dir = path.parent().unwrap_or(root);
    let gallery = galleries
        .entry(classify::gallery_key(dir))
        .or_insert_with(|| Gallery {
            key: classify::gallery_key(dir),
            name: classify::gallery_name(dir),
            source_dir: dir.to_path_buf(),
            unbound: PathBuf::new(),
            images: Vec::new(),
        });

    gallery.images.push(Image {
        name: classify::image_name(path),
        source: path.to_path_buf(),
        unbound: classify::unbound_path(path, root),
        modified,
        output_stem: String::new(),
        display_path: PathBuf::new(),
        thumb_path: PathBuf::new(),
        page_path: PathBuf::new(),
    });
}

/// Base name the root gallery is published under.
///
/// `.`, `..` and `x/..` carry no base name, so the root is resolved first.
/// A root that cannot be resolved, or `/`, gets the fallback name.
fn root_gallery_name(root: &Path) -> String {
    let resolved = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    classify::gallery_name(&resolved)
}

/// Give every gallery a distinct publish directory.
///
/// Subdirectory galleries claim their relative path first; the root gallery
/// (images directly in the root) is published under `root_name` and yields
/// to a real subdirectory of the same name.
fn assign_gallery_paths(galleries: &mut [Gallery], root: &Path, root_name: &str) {
    let mut taken = HashSet::new();
    let root_key = classify::gallery_key(root);

    for gallery in galleries.iter_mut().filter(|g| g.key != root_key) {
        gallery.unbound = classify::gallery_unbound(&gallery.source_dir, root);
        taken.insert(classify::gallery_key(&gallery.unbound));
    }

    if let Some(root_gallery) = galleries.iter_mut().find(|g| g.key == root_key) {
        let name = claim_unique(&mut taken, root_name, "root");
        root_gallery.name = root_name.to_string();
        root_gallery.unbound = classify::contained_path(Path::new(&name));
    }
}

/// Derive display, thumbnail and page paths, keeping stems unique.
///
/// Runs in walk order so the plain stem goes to the lexically first file.
/// `index` is reserved for the gallery's own listing page.
fn assign_output_paths(gallery: &mut Gallery) {
    let mut taken = HashSet::from([GALLERY_PAGE_STEM.to_string()]);
    for image in &mut gallery.images {
        let ext = image
            .source
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let stem = claim_unique(&mut taken, &image.name, &ext);

        image.display_path = gallery.unbound.join(format!("{stem}.jpg"));
        image.page_path = gallery.unbound.join(format!("{stem}.html"));
        image.thumb_path = Path::new("thumbs")
            .join(&gallery.unbound)
            .join(format!("{stem}.png"));
        image.output_stem = stem;
    }
}

/// Reserve a name that no earlier caller got, comparing case-insensitively.
///
/// Tries `base`, then `base-tag`, then `base-tag-2`, `base-tag-3`, ...
fn claim_unique(taken: &mut HashSet<String>, base: &str, tag: &str) -> String {
    let mut candidate = base.to_string();
    if !taken.contains(&candidate.to_lowercase()) {
        taken.insert(candidate.to_lowercase());
        return candidate;
    }
    candidate = format!("{base}-{tag}");
    let mut n = 2;
    while taken.contains(&candidate.to_lowercase()) {
        candidate = format!("{base}-{tag}-{n}");
        n += 1;
    }
    taken.insert(candidate.to_lowercase());
    candidate
}

/// Most recently modified first; ties broken by name, then source path.
fn sort_images(images: &mut [Image]) {
    images.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.source.cmp(&b.source))
    });
}
