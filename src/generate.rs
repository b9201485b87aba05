//! HTML site generation.
//!
//! Stage 3 of the build pipeline. Takes the galleries whose images were
//! normalized successfully and writes the static HTML pages.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): every gallery with a strip of preview
//!   thumbnails
//! - **Gallery pages** (`/{gallery}/index.html`): thumbnail grid
//! - **Image pages** (`/{gallery}/{image}.html`): display image with
//!   previous/next links
//!
//! ## Navigation
//!
//! Previous/next links are positional: they follow the gallery order
//! established by the scan stage (most recent first). The first image has no
//! previous link and the last has no next link; neither wraps around.
//! `static/nav.js` is embedded at compile time and maps the arrow keys to
//! the same links.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. The three
//! page kinds form the closed [`Page`] enum, so a missing template is a
//! compile error rather than a failed build.

use crate::config::SiteConfig;
use crate::scan::{Gallery, Image};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const JS: &str = include_str!("../static/nav.js");

/// Directory under the output root that receives source copies.
pub const ORIGINALS_DIR: &str = "originals";

/// A gallery restricted to the images that made it through processing.
#[derive(Debug, Clone)]
pub struct PublishedGallery<'a> {
    pub gallery: &'a Gallery,
    /// Images in gallery order.
    pub images: Vec<&'a Image>,
}

impl<'a> PublishedGallery<'a> {
    /// Every image of `gallery` is published.
    pub fn all(gallery: &'a Gallery) -> Self {
        Self {
            gallery,
            images: gallery.images.iter().collect(),
        }
    }

    /// The first `n` published images (fewer if the gallery is smaller).
    pub fn first_images(&self, n: usize) -> &[&'a Image] {
        &self.images[..n.min(self.images.len())]
    }
}

/// Previous/next page links of one image page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavLinks {
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// Links to the neighbours of `images[index]`.
pub fn nav_links(images: &[&Image], index: usize) -> NavLinks {
    NavLinks {
        prev: index
            .checked_sub(1)
            .and_then(|i| images.get(i))
            .map(|image| image.page_link()),
        next: images.get(index + 1).map(|image| image.page_link()),
    }
}

/// The closed set of page templates, each with its data.
#[derive(Debug)]
pub enum Page<'a> {
    Image {
        gallery: &'a Gallery,
        image: &'a Image,
        links: NavLinks,
    },
    Gallery {
        published: &'a PublishedGallery<'a>,
    },
    Index {
        galleries: &'a [PublishedGallery<'a>],
    },
}

/// Renders pages into the output directory.
///
/// Built once per build and shared by reference.
pub struct PageRenderer<'c> {
    config: &'c SiteConfig,
    output_dir: PathBuf,
}

impl<'c> PageRenderer<'c> {
    pub fn new(config: &'c SiteConfig, output_dir: &Path) -> Self {
        Self {
            config,
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Build the document for `page` without writing it.
    pub fn markup(&self, page: &Page) -> Markup {
        match page {
            Page::Image {
                gallery,
                image,
                links,
            } => self.image_page(gallery, image, links),
            Page::Gallery { published } => self.gallery_page(published),
            Page::Index { galleries } => self.index_page(galleries),
        }
    }

    /// Write `page` to `rel_path` under the output root, creating parent
    /// directories. Returns the absolute path written.
    pub fn render(&self, rel_path: &Path, page: &Page) -> Result<PathBuf, GenerateError> {
        let path = self.output_dir.join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, self.markup(page).into_string())?;
        Ok(path)
    }

    /// Write every image page of a gallery, then its listing page.
    ///
    /// Returns the number of pages written.
    pub fn render_gallery_pages(
        &self,
        published: &PublishedGallery,
    ) -> Result<usize, GenerateError> {
        for (idx, image) in published.images.iter().copied().enumerate() {
            let page = Page::Image {
                gallery: published.gallery,
                image,
                links: nav_links(&published.images, idx),
            };
            self.render(&image.page_path, &page)?;
        }
        self.render(
            &published.gallery.index_path(),
            &Page::Gallery { published },
        )?;
        Ok(published.images.len() + 1)
    }

    /// Write the global index page.
    pub fn render_index(&self, galleries: &[PublishedGallery]) -> Result<PathBuf, GenerateError> {
        self.render(Path::new("index.html"), &Page::Index { galleries })
    }

    // ========================================================================
    // Templates
    // ========================================================================

    fn base_document(&self, title: &str, body_class: Option<&str>, content: Markup) -> Markup {
        let stylesheet = self.config.site.stylesheet.as_str();
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (title) }
                    @if !stylesheet.is_empty() {
                        link rel="stylesheet" href=(stylesheet);
                    }
                }
                body class=[body_class] {
                    (content)
                }
            }
        }
    }

    fn site_header(&self, breadcrumb: Markup) -> Markup {
        html! {
            header.site-header {
                nav.breadcrumb {
                    a href="/" { (self.config.site.title) }
                    (breadcrumb)
                }
            }
        }
    }

    fn image_page(&self, gallery: &Gallery, image: &Image, links: &NavLinks) -> Markup {
        let gallery_link = gallery.page_link();
        let breadcrumb = html! {
            " › "
            a href=(gallery_link) { (gallery.name) }
        };
        let original = self.config.output.copy_sources.then(|| {
            crate::classify::site_link(&Path::new(ORIGINALS_DIR).join(&image.unbound))
        });

        let content = html! {
            (self.site_header(breadcrumb))
            main.image-page {
                h1 { (image.name) }
                figure.image-frame {
                    img src=(image.image_link()) alt=(image.name);
                }
                nav.image-nav {
                    @if let Some(prev) = &links.prev {
                        a.prev href=(prev) rel="prev" { "← Previous" }
                    }
                    @if let Some(next) = &links.next {
                        a.next href=(next) rel="next" { "Next →" }
                    }
                }
                @if let Some(original) = original {
                    p.original {
                        a href=(original) { "Original" }
                    }
                }
            }
            div.nav-zones
                data-prev=[links.prev.as_deref()]
                data-next=[links.next.as_deref()]
                data-up=(gallery_link) {}
            script { (PreEscaped(JS)) }
        };

        self.base_document(&image.name, Some("image-view"), content)
    }

    fn gallery_page(&self, published: &PublishedGallery) -> Markup {
        let gallery = published.gallery;
        let breadcrumb = html! {
            " › "
            (gallery.name)
        };

        let content = html! {
            (self.site_header(breadcrumb))
            main.gallery-page {
                h1 { (gallery.name) }
                div.thumbnail-grid {
                    @for image in &published.images {
                        a.thumb-link href=(image.page_link()) {
                            img src=(image.thumb_link()) alt=(image.name) loading="lazy";
                        }
                    }
                }
            }
        };

        self.base_document(&gallery.name, None, content)
    }

    fn index_page(&self, galleries: &[PublishedGallery]) -> Markup {
        let preview_count = self.config.site.preview_count;

        let content = html! {
            (self.site_header(html! {}))
            main.index-page {
                h1 { (self.config.site.title) }
                @for published in galleries {
                    section.gallery-card {
                        h2 {
                            a href=(published.gallery.page_link()) { (published.gallery.name) }
                        }
                        div.preview-strip {
                            @for image in published.first_images(preview_count) {
                                a href=(image.page_link()) {
                                    img src=(image.thumb_link()) alt=(image.name) loading="lazy";
                                }
                            }
                        }
                    }
                }
            }
        };

        self.base_document(&self.config.site.title, None, content)
    }
}
