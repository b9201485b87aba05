//! EXIF orientation: reading the tag and undoing it.
//!
//! Cameras store pixels in sensor order and record how to turn them upright
//! in the EXIF Orientation tag (0x0112). The eight values combine a rotation
//! with an optional mirror:
//!
//! | Tag | Variant | To display upright |
//! |---|---|---|
//! | 1 | [`Normal`](Orientation::Normal) | nothing |
//! | 2 | [`FlipHorizontal`](Orientation::FlipHorizontal) | mirror left-right |
//! | 3 | [`Rotate180`](Orientation::Rotate180) | rotate 180° |
//! | 4 | [`FlipVertical`](Orientation::FlipVertical) | mirror top-bottom |
//! | 5 | [`Transpose`](Orientation::Transpose) | rotate 90° CW, mirror left-right |
//! | 6 | [`Rotate90`](Orientation::Rotate90) | rotate 90° CW |
//! | 7 | [`Transverse`](Orientation::Transverse) | rotate 270° CW, mirror left-right |
//! | 8 | [`Rotate270`](Orientation::Rotate270) | rotate 270° CW |
//!
//! Missing or unreadable metadata is never an error: the image is simply
//! treated as already upright.

use image::DynamicImage;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    Transpose,
    Rotate90,
    Transverse,
    Rotate270,
}

impl Orientation {
    /// Map an EXIF tag value to an orientation. Values outside 1–8 are `None`.
    pub fn from_exif(value: u32) -> Option<Self> {
        match value {
            1 => Some(Orientation::Normal),
            2 => Some(Orientation::FlipHorizontal),
            3 => Some(Orientation::Rotate180),
            4 => Some(Orientation::FlipVertical),
            5 => Some(Orientation::Transpose),
            6 => Some(Orientation::Rotate90),
            7 => Some(Orientation::Transverse),
            8 => Some(Orientation::Rotate270),
            _ => None,
        }
    }

    pub fn exif_value(self) -> u32 {
        match self {
            Orientation::Normal => 1,
            Orientation::FlipHorizontal => 2,
            Orientation::Rotate180 => 3,
            Orientation::FlipVertical => 4,
            Orientation::Transpose => 5,
            Orientation::Rotate90 => 6,
            Orientation::Transverse => 7,
            Orientation::Rotate270 => 8,
        }
    }

    /// Whether the transform swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90
                | Orientation::Transverse
                | Orientation::Rotate270
        )
    }

    /// Turn a decoded image upright.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Orientation::Normal => img,
            Orientation::FlipHorizontal => img.fliph(),
            Orientation::Rotate180 => img.rotate180(),
            Orientation::FlipVertical => img.flipv(),
            Orientation::Transpose => img.rotate90().fliph(),
            Orientation::Rotate90 => img.rotate90(),
            Orientation::Transverse => img.rotate270().fliph(),
            Orientation::Rotate270 => img.rotate270(),
        }
    }
}

/// Read the orientation stored in a JPEG or PNG file.
///
/// Falls back to [`Orientation::Normal`] when the file can't be opened, has
/// no EXIF block, lacks the tag, or stores something other than 1–8.
pub fn read_orientation(path: &Path) -> Orientation {
    read_exif_orientation(path)
        .and_then(Orientation::from_exif)
        .unwrap_or_default()
}

fn read_exif_orientation(path: &Path) -> Option<u32> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    field.value.get_uint(0)
}
