//! Thumbnail derivation with filesystem-based staleness detection.
//!
//! For every image referenced by a descriptor the build needs two web paths:
//! the original under `/static/` and a derived thumbnail under
//! `/static/thumbs/` with the same relative layout. The cache is
//! **stateless**: there is no manifest, validity is re-derived on every call
//! from file modification times. A thumbnail whose mtime is at or after its
//! source's mtime is current and is never rewritten, so repeat builds cost
//! one `stat` per image.
//!
//! Regeneration is a single fixed operation: decode, resize to width
//! [`THUMB_WIDTH`] with proportional height (Lanczos3), save in the source's
//! own format. Nothing else writes under the thumbnails root.
//!
//! ## Concurrency
//!
//! Gallery batches run under rayon, so two workers can ask for the same
//! source in one build (an image shared by the site gallery and an
//! itinerary). The check-then-write sequence is not atomic; a per-path lock
//! map serializes work on one source while distinct sources proceed in
//! parallel.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use thiserror::Error;

/// Fixed thumbnail width in pixels; height follows the source aspect ratio.
pub const THUMB_WIDTH: u32 = 600;

/// Web prefix all normalized asset URLs live under.
pub const STATIC_URL_PREFIX: &str = "/static/";

#[derive(Error, Debug)]
pub enum ThumbError {
    #[error("Source image not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

/// Web-facing URLs for one processed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    /// Original under `/static/`.
    pub original_url: String,
    /// Derived thumbnail under `/static/thumbs/`.
    pub thumbnail_url: String,
}

/// Strip any rooted prefix from a declared asset path.
///
/// Descriptors may reference `img/foo.jpg`, `static/img/foo.jpg`, or
/// `/static/img/foo.jpg`; all mean the same file. Idempotent.
pub fn clean_asset_path(raw: &str) -> &str {
    let p = raw.strip_prefix(STATIC_URL_PREFIX).unwrap_or(raw);
    let p = p.strip_prefix("static/").unwrap_or(p);
    p.trim_start_matches('/')
}

/// Normalize a declared asset path into a site-root-relative URL.
///
/// Idempotent: `static_url(static_url(p)) == static_url(p)`.
pub fn static_url(raw: &str) -> String {
    format!("{}{}", STATIC_URL_PREFIX, clean_asset_path(raw))
}

/// Mtime-validated thumbnail cache rooted at the static-assets directory.
pub struct ThumbnailCache {
    static_dir: PathBuf,
    /// One lock per distinct source path, created on first use.
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl ThumbnailCache {
    pub fn new(static_dir: &Path) -> Self {
        Self {
            static_dir: static_dir.to_path_buf(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Guarantee a current thumbnail exists for `raw` and return both URLs.
    ///
    /// A missing source is a [`ThumbError::NotFound`]; the caller decides the
    /// fallback (the content loader degrades to the original URL).
    pub fn ensure(&self, raw: &str) -> Result<ProcessedImage, ThumbError> {
        let clean = clean_asset_path(raw);
        let source = self.static_dir.join(clean);
        let thumb = self.static_dir.join("thumbs").join(clean);

        let source_mtime = match fs::metadata(&source) {
            Ok(meta) => meta.modified()?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ThumbError::NotFound(source));
            }
            Err(e) => return Err(e.into()),
        };

        let lock = self.lock_for(&source);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if !thumb_is_current(&thumb, source_mtime) {
            regenerate(&source, &thumb)?;
        }

        Ok(ProcessedImage {
            original_url: format!("{}{}", STATIC_URL_PREFIX, clean),
            thumbnail_url: format!("{}thumbs/{}", STATIC_URL_PREFIX, clean),
        })
    }

    fn lock_for(&self, source: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        Arc::clone(
            locks
                .entry(source.to_path_buf())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}

/// A thumbnail is current when its mtime is at or after the source's.
fn thumb_is_current(thumb: &Path, source_mtime: SystemTime) -> bool {
    fs::metadata(thumb)
        .and_then(|meta| meta.modified())
        .map(|thumb_mtime| thumb_mtime >= source_mtime)
        .unwrap_or(false)
}

fn regenerate(source: &Path, thumb: &Path) -> Result<(), ThumbError> {
    let img = ImageReader::open(source)?
        .decode()
        .map_err(|e| ThumbError::Decode {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;

    let height = scaled_height(img.width(), img.height());
    let resized = img.resize_exact(THUMB_WIDTH, height, FilterType::Lanczos3);

    if let Some(parent) = thumb.parent() {
        fs::create_dir_all(parent)?;
    }
    save_as_source_format(&resized, thumb)
}

/// Proportional height for a width-600 thumbnail, at least 1px.
fn scaled_height(width: u32, height: u32) -> u32 {
    if width == 0 {
        return 1;
    }
    ((height as f64 * THUMB_WIDTH as f64 / width as f64).round() as u32).max(1)
}

/// Save inferring the format from the extension. JPEG has no alpha channel,
/// so RGBA sources are flattened first.
fn save_as_source_format(img: &DynamicImage, path: &Path) -> Result<(), ThumbError> {
    let is_jpeg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));

    let result = if is_jpeg && img.color().has_alpha() {
        DynamicImage::ImageRgb8(img.to_rgb8()).save(path)
    } else {
        img.save(path)
    };

    result.map_err(|e| ThumbError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
