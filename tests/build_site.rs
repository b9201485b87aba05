//! End-to-end builds against real JPEG and PNG files.
//!
//! Every test lays out an `images/` tree in a temp directory, runs the full
//! pipeline with the pure-Rust backend and inspects the produced site.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use shoebox::imaging::RustBackend;
use shoebox::pipeline::{self, BuildError, BuildOptions, BuildReport};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

// =========================================================================
// Fixtures
// =========================================================================

fn picture(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7) as u8, (y * 5) as u8, 64])
    }))
}

fn write_image(path: &Path, width: u32, height: u32, format: ImageFormat) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    picture(width, height).save_with_format(path, format).unwrap();
}

/// JPEG whose APP1 segment carries EXIF Orientation `value`.
fn write_rotated_jpeg(path: &Path, width: u32, height: u32, value: u16) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut encoded = Vec::new();
    picture(width, height)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut encoded, 90))
        .unwrap();

    let mut payload = b"Exif\x00\x00MM\x00\x2A".to_vec();
    payload.extend_from_slice(&8u32.to_be_bytes());
    payload.extend_from_slice(&1u16.to_be_bytes());
    payload.extend_from_slice(&0x0112u16.to_be_bytes());
    payload.extend_from_slice(&3u16.to_be_bytes());
    payload.extend_from_slice(&1u32.to_be_bytes());
    payload.extend_from_slice(&value.to_be_bytes());
    payload.extend_from_slice(&[0, 0]);
    payload.extend_from_slice(&0u32.to_be_bytes());

    let mut bytes = encoded[..2].to_vec();
    bytes.extend_from_slice(&[0xFF, 0xE1]);
    bytes.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    bytes.extend_from_slice(&payload);
    bytes.extend_from_slice(&encoded[2..]);
    fs::write(path, bytes).unwrap();
}

fn mtime(path: &Path) -> SystemTime {
    fs::metadata(path).unwrap().modified().unwrap()
}

fn backdate(path: &Path) -> SystemTime {
    let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(old)
        .unwrap();
    old
}

struct Site {
    _tmp: TempDir,
    options: BuildOptions,
}

impl Site {
    /// `images/Trip` with a JPEG and a PNG, `images/2019/Winter` with one
    /// JPEG, and a one-file stylesheet directory.
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let images = tmp.path().join("images");
        write_image(&images.join("Trip/beach.jpg"), 64, 48, ImageFormat::Jpeg);
        write_image(&images.join("Trip/dunes.png"), 48, 64, ImageFormat::Png);
        write_image(&images.join("2019/Winter/snow.jpg"), 32, 32, ImageFormat::Jpeg);
        let css = tmp.path().join("css");
        fs::create_dir_all(&css).unwrap();
        fs::write(css.join("style.css"), "body { margin: 0 }").unwrap();

        let options = BuildOptions {
            source: images,
            output: tmp.path().join("public"),
            assets: Some(css),
            config: None,
            pages_only: false,
            force: false,
        };
        Site { _tmp: tmp, options }
    }

    fn source(&self, rel: &str) -> PathBuf {
        self.options.source.join(rel)
    }

    fn out(&self, rel: &str) -> PathBuf {
        self.options.output.join(rel)
    }

    fn build(&self) -> BuildReport {
        self.build_with(&self.options).unwrap()
    }

    fn build_with(&self, options: &BuildOptions) -> Result<BuildReport, BuildError> {
        let config = pipeline::load_config(options)?;
        pipeline::build(&RustBackend::new(), &config, options, None)
    }
}

// =========================================================================
// Output tree
// =========================================================================

#[test]
fn produces_the_full_site() {
    let site = Site::new();
    let report = site.build();

    for rel in [
        "index.html",
        "Trip/index.html",
        "Trip/beach.html",
        "Trip/beach.jpg",
        "Trip/dunes.html",
        "Trip/dunes.jpg",
        "thumbs/Trip/beach.png",
        "thumbs/Trip/dunes.png",
        "2019/Winter/index.html",
        "2019/Winter/snow.html",
        "2019/Winter/snow.jpg",
        "thumbs/2019/Winter/snow.png",
        "css/style.css",
    ] {
        assert!(site.out(rel).is_file(), "missing {rel}");
    }

    assert_eq!(report.galleries, 2);
    assert_eq!(report.images, 3);
    assert_eq!(report.pages, 3 + 2 + 1);
    assert_eq!(report.stats.encoded, 3);
    assert_eq!(report.assets_copied, Some(1));
}

#[test]
fn outputs_have_the_expected_formats() {
    let site = Site::new();
    site.build();

    let thumb = fs::read(site.out("thumbs/Trip/dunes.png")).unwrap();
    assert_eq!(image::guess_format(&thumb).unwrap(), ImageFormat::Png);
    let display = fs::read(site.out("Trip/dunes.jpg")).unwrap();
    assert_eq!(image::guess_format(&display).unwrap(), ImageFormat::Jpeg);
    // Small sources pass through at their own size.
    let display = image::open(site.out("Trip/dunes.jpg")).unwrap();
    assert_eq!(display.dimensions(), (48, 64));
}

#[test]
fn index_links_every_gallery() {
    let site = Site::new();
    site.build();

    let index = fs::read_to_string(site.out("index.html")).unwrap();
    assert!(index.contains(r#"href="/Trip/""#));
    assert!(index.contains(r#"href="/2019/Winter/""#));
    assert!(index.contains("/thumbs/Trip/beach.png"));
}

#[test]
fn image_pages_chain_within_a_gallery() {
    let site = Site::new();
    site.build();

    let first = fs::read_to_string(site.out("Trip/beach.html")).unwrap();
    assert!(first.contains("/Trip/beach.jpg"));
    assert!(first.contains("/Trip/dunes.html"));
    let last = fs::read_to_string(site.out("Trip/dunes.html")).unwrap();
    assert!(last.contains("/Trip/beach.html"));
}

#[test]
fn config_file_sets_the_site_title() {
    let site = Site::new();
    fs::write(site.source("config.toml"), "[site]\ntitle = \"Family & Friends\"\n").unwrap();
    site.build();

    let index = fs::read_to_string(site.out("index.html")).unwrap();
    assert!(index.contains("Family &amp; Friends"));
}

#[test]
fn invalid_config_stops_the_build() {
    let site = Site::new();
    fs::write(site.source("config.toml"), "[images]\njpeg_quality = 0\n").unwrap();

    let result = site.build_with(&site.options);
    assert!(matches!(result, Err(BuildError::Config(_))));
    assert!(!site.out("index.html").exists());
}

// =========================================================================
// Caching
// =========================================================================

#[test]
fn second_build_reuses_existing_images() {
    let site = Site::new();
    site.build();
    let display = site.out("Trip/beach.jpg");
    let thumb = site.out("thumbs/Trip/beach.png");
    let old = backdate(&display);
    backdate(&thumb);

    let report = site.build();

    assert_eq!(mtime(&display), old);
    assert_eq!(mtime(&thumb), old);
    assert_eq!(report.stats.cached, 3);
    assert_eq!(report.stats.encoded, 0);
    // Pages are always rewritten.
    assert_eq!(report.pages, 6);
}

#[test]
fn missing_variant_is_filled_in() {
    let site = Site::new();
    site.build();
    fs::remove_file(site.out("thumbs/Trip/beach.png")).unwrap();
    let old = backdate(&site.out("Trip/beach.jpg"));

    let report = site.build();

    assert!(site.out("thumbs/Trip/beach.png").is_file());
    assert_eq!(mtime(&site.out("Trip/beach.jpg")), old);
    assert_eq!(report.stats.encoded, 1);
    assert_eq!(report.stats.cached, 2);
}

#[test]
fn regenerate_rewrites_everything() {
    let site = Site::new();
    site.build();
    let display = site.out("Trip/beach.jpg");
    let old = backdate(&display);

    let options = BuildOptions {
        force: true,
        ..site.options.clone()
    };
    let report = site.build_with(&options).unwrap();

    assert_ne!(mtime(&display), old);
    assert_eq!(report.stats.encoded, 3);
    assert_eq!(report.stats.cached, 0);
}

#[test]
fn pages_only_build_writes_no_images() {
    let site = Site::new();
    let options = BuildOptions {
        pages_only: true,
        ..site.options.clone()
    };
    let report = site.build_with(&options).unwrap();

    assert!(site.out("Trip/beach.html").is_file());
    assert!(!site.out("Trip/beach.jpg").exists());
    assert!(!site.out("thumbs").exists());
    assert_eq!(report.images, 3);
}

// =========================================================================
// Failures and orientation
// =========================================================================

#[test]
fn corrupt_source_is_left_out() {
    let site = Site::new();
    fs::write(site.source("Trip/cracked.jpg"), b"not really a jpeg").unwrap();

    let report = site.build();

    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.images, 3);
    assert!(!site.out("Trip/cracked.html").exists());
    assert!(!site.out("Trip/cracked.jpg").exists());
    assert!(!site.out("thumbs/Trip/cracked.png").exists());
    let gallery = fs::read_to_string(site.out("Trip/index.html")).unwrap();
    assert!(!gallery.contains("cracked"));
}

#[test]
fn rotated_source_is_stored_upright() {
    let site = Site::new();
    write_rotated_jpeg(&site.source("Phone/portrait.jpg"), 40, 20, 6);
    fs::write(site.source("config.toml"), "[images]\nthumbnail_size = 16\n").unwrap();

    site.build();

    let display = image::open(site.out("Phone/portrait.jpg")).unwrap();
    assert_eq!(display.dimensions(), (20, 40));
    // Upright 20x40 against a 16px thumbnail: height 16, width 20*16/40.
    let thumb = image::open(site.out("thumbs/Phone/portrait.png")).unwrap();
    assert_eq!(thumb.dimensions(), (8, 16));
}

#[test]
fn large_source_is_downscaled() {
    let site = Site::new();
    write_image(&site.source("Big/wide.jpg"), 2048, 1536, ImageFormat::Jpeg);

    site.build();

    let display = image::open(site.out("Big/wide.jpg")).unwrap();
    assert_eq!(display.dimensions(), (1365, 1024));
    let thumb = image::open(site.out("thumbs/Big/wide.png")).unwrap();
    assert_eq!(thumb.dimensions(), (341, 256));
}

#[test]
fn missing_images_root_is_fatal() {
    let site = Site::new();
    let options = BuildOptions {
        source: site.source("nowhere"),
        ..site.options.clone()
    };
    assert!(matches!(site.build_with(&options), Err(BuildError::Scan(_))));
}
