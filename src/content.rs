//! Content descriptor loading.
//!
//! The content directory holds human-edited TOML descriptors:
//!
//! ```text
//! content/
//! ├── index.toml            # Site-wide content: shared assets + it/en copy
//! ├── events.toml           # Seasonal events feature (toggle + it/en lists)
//! ├── galleries.toml        # Site gallery index
//! └── itineraries/          # One file per route, any filename
//!     ├── lago-nero.toml
//!     └── cresta-alta.toml
//! ```
//!
//! Every descriptor deserializes into a typed record with
//! `deny_unknown_fields`, so key typos fail the load instead of silently
//! producing empty pages. The `it` and `en` tables of each file share one
//! struct with no defaulted text fields: a key present in one locale but
//! missing from the other is a parse error, which is exactly the
//! "structurally parallel dictionaries" invariant, checked mechanically.
//!
//! Loading also drives the derived-data pipeline:
//!
//! - every declared asset path is normalized to a `/static/`-rooted URL
//!   ([`crate::thumbs::static_url`], idempotent);
//! - itineraries with a GPX reference get their distance/elevation figures
//!   **overwritten** by [`crate::gpx`] analysis — on analysis failure the
//!   author-declared values stay and a warning is printed;
//! - gallery images (site-wide and per-itinerary) go through the
//!   [`crate::thumbs::ThumbnailCache`]; a failure there degrades that one
//!   image to its original URL for both slots.
//!
//! A malformed descriptor is fatal to the whole load. A broken GPX file or
//! missing image is not: one bad itinerary asset never blocks the site.
//!
//! Itineraries are sorted by slug after the directory scan. The traversal
//! order of the filesystem is never exposed downstream.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Deserialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::gpx;
use crate::thumbs::{ProcessedImage, ThumbnailCache, clean_asset_path, static_url};

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: Box<toml::de::Error>,
    },
    #[error("Failed to scan {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

// ============================================================================
// Site descriptor (index.toml)
// ============================================================================

/// Locale-invariant assets and parallel locale dictionaries.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteFile {
    pub hero: HeroShared,
    pub welcome: WelcomeShared,
    pub itineraries: ItinerariesShared,
    pub contacts: Contacts,
    pub it: SiteLocale,
    pub en: SiteLocale,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeroShared {
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WelcomeShared {
    pub image: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItinerariesShared {
    #[serde(default)]
    pub hero_image: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Contacts {
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// One locale's complete text dictionary. No field is defaulted: a missing
/// key in either `[it]` or `[en]` is a load-time error.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteLocale {
    pub nav: NavLabels,
    pub hero: HeroLocale,
    pub welcome: WelcomeLocale,
    pub sections: SectionLabels,
    pub itinerary_page: ItineraryPageLabels,
    pub webcam_page: WebcamPageLabels,
    pub contact_info: ContactInfoLabels,
    pub footer: FooterLabels,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLabels {
    pub home: String,
    pub itineraries: String,
    pub webcam: String,
    pub gallery: String,
    pub contact: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeroLocale {
    pub title: String,
    pub subtitle: String,
    pub cta: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WelcomeLocale {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub altitude: String,
    pub founded: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionLabels {
    pub itineraries_title: String,
    pub itineraries_subtitle: String,
    pub see_all_itineraries: String,
    pub read_more: String,
    pub filter_all: String,
    pub filter_hiking: String,
    pub filter_biking: String,
    pub gallery_title: String,
    pub gallery_subtitle: String,
    pub see_all_gallery: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItineraryPageLabels {
    pub trail_details: String,
    pub author: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub type_hiking: String,
    pub type_biking: String,
    pub duration: String,
    pub distance: String,
    pub elevation_gain: String,
    pub download_gpx: String,
    pub description: String,
    pub difficulty: String,
    pub difficulty_easy: String,
    pub difficulty_medium: String,
    pub difficulty_hard: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebcamPageLabels {
    pub live: String,
    pub panorama_title: String,
    pub location: String,
    pub status_online: String,
    pub next_update: String,
    pub snapshot: String,
    pub archive_title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactInfoLabels {
    pub title: String,
    pub subtitle: String,
    pub email_label: String,
    pub phone_label: String,
    pub address_label: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FooterLabels {
    pub motto: String,
    pub explore_title: String,
    pub contacts_title: String,
    /// May contain a `{year}` token, substituted at render time.
    pub copyright: String,
}

// ============================================================================
// Events descriptor (events.toml)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsFile {
    pub enabled: bool,
    pub it: EventsLocale,
    pub en: EventsLocale,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsLocale {
    pub title: String,
    #[serde(default)]
    pub items: Vec<EventItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventItem {
    pub name: String,
    pub date: String,
    pub time: String,
}

// ============================================================================
// Gallery descriptor (galleries.toml)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct GalleryFile {
    images: Vec<GalleryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct GalleryEntry {
    url: String,
    alt: String,
    /// Attribution (an Instagram handle on the live site).
    #[serde(default)]
    author: Option<String>,
}

/// A processed gallery image: both URLs derived, never authored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    pub url: String,
    pub thumbnail: String,
    pub alt: String,
    pub author: Option<String>,
}

// ============================================================================
// Itinerary descriptors (itineraries/*.toml)
// ============================================================================

/// Route type. Anything other than `hiking`/`biking` is a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Hiking,
    Biking,
}

impl RouteKind {
    pub fn slug(self) -> &'static str {
        match self {
            RouteKind::Hiking => "hiking",
            RouteKind::Biking => "biking",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ItineraryFile {
    slug: String,
    #[serde(rename = "type")]
    kind: RouteKind,
    image: String,
    #[serde(default)]
    gpx_file: Option<String>,
    #[serde(default)]
    youtube_video_id: Option<String>,
    #[serde(default)]
    gallery: Vec<String>,
    difficulty: String,
    duration: String,
    #[serde(default)]
    distance_km: f64,
    #[serde(default)]
    elevation_gain: i64,
    #[serde(default)]
    author: Option<String>,
    it: ItineraryLocale,
    en: ItineraryLocale,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItineraryLocale {
    pub title: String,
    pub description: String,
    pub long_description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One fully loaded route. Constructed once per build, immutable after.
#[derive(Debug, Clone)]
pub struct Itinerary {
    pub slug: String,
    pub kind: RouteKind,
    /// Cover image, `/static/`-rooted.
    pub image: String,
    /// Track download URL, `/static/`-rooted; `None` when the descriptor
    /// declared no track. Items without a track are excluded from every
    /// navigable page.
    pub gpx_url: Option<String>,
    pub youtube_video_id: Option<String>,
    pub gallery: Vec<GalleryImage>,
    pub difficulty: String,
    pub duration: String,
    /// Overwritten by GPX analysis when a track parses cleanly.
    pub distance_km: f64,
    pub elevation_gain_m: i64,
    pub author: Option<String>,
    pub it: ItineraryLocale,
    pub en: ItineraryLocale,
}

impl Itinerary {
    /// Only routes with a declared track appear on listing or detail pages.
    pub fn has_track(&self) -> bool {
        self.gpx_url.as_deref().is_some_and(|u| !u.is_empty())
    }

    pub fn locale(&self, text_of_en: bool) -> &ItineraryLocale {
        if text_of_en { &self.en } else { &self.it }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Everything a build needs, loaded once. Locale selection happens later.
#[derive(Debug, Clone)]
pub struct SiteBundle {
    pub site: SiteFile,
    pub events: EventsFile,
    pub gallery: Vec<GalleryImage>,
    /// Sorted by slug.
    pub itineraries: Vec<Itinerary>,
}

/// Parse every descriptor under `content_dir` and run the derived-data
/// pipeline against `static_dir`.
pub fn load(content_dir: &Path, static_dir: &Path) -> Result<SiteBundle, ContentError> {
    let cache = ThumbnailCache::new(static_dir);

    let mut site: SiteFile = parse_toml(&content_dir.join("index.toml"))?;
    normalize_site_assets(&mut site);

    let events: EventsFile = parse_toml(&content_dir.join("events.toml"))?;

    let gallery_file: GalleryFile = parse_toml(&content_dir.join("galleries.toml"))?;
    let gallery = process_gallery(&gallery_file.images, &cache);

    let itineraries = load_itineraries(&content_dir.join("itineraries"), static_dir, &cache)?;

    Ok(SiteBundle {
        site,
        events,
        gallery,
        itineraries,
    })
}

fn parse_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let text = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

fn normalize_site_assets(site: &mut SiteFile) {
    for img in &mut site.hero.images {
        *img = static_url(img);
    }
    site.welcome.image = static_url(&site.welcome.image);
    if !site.itineraries.hero_image.is_empty() {
        site.itineraries.hero_image = static_url(&site.itineraries.hero_image);
    }
}

/// Thumbnail a batch of gallery entries in parallel.
///
/// Output order matches input order regardless of completion order; a failed
/// image degrades to its normalized original URL in both slots.
fn process_gallery(entries: &[GalleryEntry], cache: &ThumbnailCache) -> Vec<GalleryImage> {
    entries
        .par_iter()
        .map(|entry| {
            let processed = ensure_or_fallback(&entry.url, cache);
            GalleryImage {
                url: processed.original_url,
                thumbnail: processed.thumbnail_url,
                alt: entry.alt.clone(),
                author: entry.author.clone(),
            }
        })
        .collect()
}

fn ensure_or_fallback(raw: &str, cache: &ThumbnailCache) -> ProcessedImage {
    match cache.ensure(raw) {
        Ok(processed) => processed,
        Err(e) => {
            eprintln!("Warning: processing image {raw} failed: {e}");
            let url = static_url(raw);
            ProcessedImage {
                original_url: url.clone(),
                thumbnail_url: url,
            }
        }
    }
}

fn load_itineraries(
    dir: &Path,
    static_dir: &Path,
    cache: &ThumbnailCache,
) -> Result<Vec<Itinerary>, ContentError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|source| ContentError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
        {
            files.push(entry.into_path());
        }
    }

    let mut itineraries = Vec::with_capacity(files.len());
    for path in files {
        let file: ItineraryFile = parse_toml(&path)?;
        itineraries.push(build_itinerary(file, static_dir, cache));
    }

    // Directory traversal order is filesystem-dependent; slugs are the
    // contract for listing order.
    itineraries.sort_by(|a, b| a.slug.cmp(&b.slug));
    Ok(itineraries)
}

fn build_itinerary(file: ItineraryFile, static_dir: &Path, cache: &ThumbnailCache) -> Itinerary {
    let mut distance_km = file.distance_km;
    let mut elevation_gain_m = file.elevation_gain;

    let gpx_url = file
        .gpx_file
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            let fs_path = static_dir.join(clean_asset_path(raw));
            match gpx::analyze_file(&fs_path) {
                Ok(stats) => {
                    distance_km = stats.distance_km;
                    elevation_gain_m = stats.elevation_gain_m;
                }
                Err(e) => {
                    eprintln!(
                        "Warning: failed to analyze GPX {}: {e}",
                        fs_path.display()
                    );
                }
            }
            static_url(raw)
        });

    let gallery: Vec<GalleryImage> = file
        .gallery
        .par_iter()
        .map(|raw| {
            let processed = ensure_or_fallback(raw, cache);
            GalleryImage {
                url: processed.original_url,
                thumbnail: processed.thumbnail_url,
                alt: file.slug.clone(),
                author: None,
            }
        })
        .collect();

    Itinerary {
        slug: file.slug,
        kind: file.kind,
        image: static_url(&file.image),
        gpx_url,
        youtube_video_id: file.youtube_video_id,
        gallery,
        difficulty: file.difficulty,
        duration: file.duration,
        distance_km,
        elevation_gain_m,
        author: file.author,
        it: file.it,
        en: file.en,
    }
}

/// Archival webcam snapshots as `/static/`-rooted URLs, newest first.
///
/// Every `.jpg` under `static/webcam/` except the rolling `current.jpg`;
/// timestamped filenames sort lexicographically, so a reverse name sort is
/// newest-first. A missing directory is an empty list, not an error.
pub fn list_webcam_snapshots(static_dir: &Path) -> Vec<String> {
    let dir = static_dir.join("webcam");
    let mut names: Vec<String> = match fs::read_dir(&dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| name.to_lowercase().ends_with(".jpg") && name != "current.jpg")
            .collect(),
        Err(_) => return Vec::new(),
    };
    names.sort();
    names.reverse();
    names
        .into_iter()
        .map(|name| format!("/static/webcam/{name}"))
        .collect()
}
