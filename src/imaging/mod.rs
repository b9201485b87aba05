//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Orientation** | `kamadak-exif`, tag 0x0112 |
//! | **Decode** | `image::ImageReader` (JPEG, PNG) |
//! | **Downscale** | `resize_exact` with Catmull-Rom |
//! | **Thumbnail** | PNG, default compression |
//! | **Display** | JPEG at a fixed quality |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Orientation**: EXIF tag reading and the eight upright transforms
//! - **Parameters**: Data structures describing what to encode
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
pub mod orientation;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::calculate_downscale_dimensions;
pub use operations::{downscale, load_upright, write_variant};
pub use orientation::{Orientation, read_orientation};
pub use params::{EncodeParams, OutputFormat, Quality, Variant};
pub use rust_backend::RustBackend;
