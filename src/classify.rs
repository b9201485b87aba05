//! Path classification: which entries are images, and what they are called.
//!
//! Everything here is a pure function of a path. The scanner calls these for
//! every walked entry; nothing touches the filesystem.
//!
//! ## Identities
//!
//! ```text
//! images/Trip/Beach.JPG
//! │      │    └── image name: "Beach" (file stem)
//! │      └─────── gallery name: "Trip" (parent directory base name)
//! └────────────── images root, stripped to get the unbound path "Trip/Beach.JPG"
//! ```
//!
//! The gallery *key* is the case-folded parent directory. It is only used for
//! map lookups, so `images/Trip` and `images/trip` land in the same gallery
//! and a case-insensitive filesystem never sees two galleries writing to one
//! output directory.

use std::path::{Component, Path, PathBuf};

/// Extensions (lowercase, without the dot) accepted as source images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Returns true when the path carries a supported image extension.
///
/// The check is case-insensitive and purely name-based; directories must be
/// filtered out by the caller, which already knows the entry's file type.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Lowercased directory path used to deduplicate galleries.
pub fn gallery_key(dir: &Path) -> String {
    dir.to_string_lossy().to_lowercase()
}

/// Name used for a directory with no base name of its own (`/`).
pub const FALLBACK_GALLERY_NAME: &str = "root";

/// Display name of the gallery living in `dir`.
///
/// Paths ending in `.` or `..` have no base name and get
/// [`FALLBACK_GALLERY_NAME`]; resolve them first for a meaningful name.
pub fn gallery_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_GALLERY_NAME.to_string())
}

/// Display name of an image: its file stem.
pub fn image_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Strip the images root from `path`, yielding the site-relative "unbound" path.
///
/// Paths outside the root are returned unchanged.
pub fn unbound_path(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Keep only the plain name components of `path`.
///
/// Root, prefix, `.` and `..` components are dropped, so the result always
/// stays inside whatever directory it is joined onto.
pub fn contained_path(path: &Path) -> PathBuf {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

/// Site-relative directory a subdirectory gallery is published under.
///
/// The root gallery has no relative directory; the scanner names it.
pub fn gallery_unbound(dir: &Path, root: &Path) -> PathBuf {
    contained_path(&unbound_path(dir, root))
}

/// Render a relative path as a `/`-rooted site URL with forward slashes.
pub fn site_link(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    format!("/{}", parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_extensions_case_insensitively() {
        assert!(is_supported_image(Path::new("a/b.jpg")));
        assert!(is_supported_image(Path::new("a/b.JPEG")));
        assert!(is_supported_image(Path::new("a/b.Png")));
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(!is_supported_image(Path::new("a/b.gif")));
        assert!(!is_supported_image(Path::new("a/b.txt")));
        assert!(!is_supported_image(Path::new("a/config.toml")));
        assert!(!is_supported_image(Path::new("a/noext")));
        assert!(!is_supported_image(Path::new("a/.jpg")));
    }

    #[test]
    fn gallery_key_folds_case() {
        assert_eq!(
            gallery_key(Path::new("images/Trip")),
            gallery_key(Path::new("images/TRIP"))
        );
    }

    #[test]
    fn gallery_name_is_base_name() {
        assert_eq!(gallery_name(Path::new("images/2019/Trip")), "Trip");
    }

    #[test]
    fn image_name_is_stem() {
        assert_eq!(image_name(Path::new("images/Trip/Beach.JPG")), "Beach");
        assert_eq!(image_name(Path::new("images/Trip/a.b.png")), "a.b");
    }

    #[test]
    fn unbound_strips_root() {
        assert_eq!(
            unbound_path(Path::new("images/Trip/a.jpg"), Path::new("images")),
            PathBuf::from("Trip/a.jpg")
        );
    }

    #[test]
    fn unbound_outside_root_is_unchanged() {
        assert_eq!(
            unbound_path(Path::new("other/a.jpg"), Path::new("images")),
            PathBuf::from("other/a.jpg")
        );
    }

    #[test]
    fn gallery_unbound_is_relative_to_root() {
        let root = Path::new("photos/images");
        assert_eq!(
            gallery_unbound(&root.join("2019").join("Trip"), root),
            Path::new("2019").join("Trip")
        );
    }

    #[test]
    fn nameless_directories_use_fallback_name() {
        assert_eq!(gallery_name(Path::new(".")), FALLBACK_GALLERY_NAME);
        assert_eq!(gallery_name(Path::new("images/sub/..")), FALLBACK_GALLERY_NAME);
        assert_eq!(gallery_name(Path::new("/")), FALLBACK_GALLERY_NAME);
    }

    #[test]
    fn contained_path_drops_escaping_components() {
        assert_eq!(
            contained_path(Path::new("/abs/images/sub/../a")),
            Path::new("abs").join("images").join("sub").join("a")
        );
        assert_eq!(contained_path(Path::new("./Trip")), PathBuf::from("Trip"));
        assert_eq!(contained_path(Path::new("..")), PathBuf::new());
        assert!(contained_path(Path::new("/x/../y")).is_relative());
    }

    #[test]
    fn site_link_is_slash_rooted() {
        assert_eq!(site_link(Path::new("Trip/a.html")), "/Trip/a.html");
        assert_eq!(
            site_link(&Path::new("thumbs").join("2019").join("x.png")),
            "/thumbs/2019/x.png"
        );
        assert_eq!(site_link(Path::new("")), "/");
    }
}
