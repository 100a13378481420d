//! Full-site build orchestration.
//!
//! A build is one linear pass: load the content bundle once, reset the
//! output directory, mirror the static tree verbatim, then render the
//! complete page set for each locale. Italian pages land at the output root,
//! English pages under `en/`. Nothing is rendered incrementally; the only
//! cross-build cache is the mtime-validated thumbnail store inside
//! `static/thumbs/`, which lives in the *source* static tree. Loading writes
//! into that store, so the mirror runs after it and picks up every thumbnail
//! the pages are about to reference.
//!
//! The webcam publish path ([`update_webcam`]) is the one operation that
//! writes into the source static tree: it installs a new `current.jpg`, adds
//! a timestamped archive copy, and refreshes the already-published webcam
//! pages in place so the archive listing stays in sync without a full
//! rebuild.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use maud::Markup;
use thiserror::Error;
use walkdir::WalkDir;

use crate::content::{self, ContentError, RouteKind, SiteBundle};
use crate::locale::{self, LOCALES, Locale, build_view, localized_itineraries};
use crate::pages::{self, Chrome, ListFilter};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to scan {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> BuildError + '_ {
    move |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// The three directories every command operates on.
#[derive(Debug, Clone)]
pub struct SitePaths {
    pub content: PathBuf,
    pub static_dir: PathBuf,
    pub output: PathBuf,
}

/// Build the whole site from scratch.
///
/// Loading runs first: it writes any freshly derived thumbnails into the
/// source `static/thumbs/`, and the mirror that follows must include them.
pub fn build(paths: &SitePaths) -> Result<(), BuildError> {
    let started = Instant::now();

    let bundle = content::load(&paths.content, &paths.static_dir)?;
    let snapshots = content::list_webcam_snapshots(&paths.static_dir);

    reset_output(&paths.output)?;
    copy_static_tree(&paths.static_dir, &paths.output.join("static"))?;

    let mut pages_written = 0;
    for locale in LOCALES {
        pages_written += render_locale(locale, &bundle, snapshots.clone(), paths)?;
    }

    println!(
        "Built {} pages in {:.2?} ({} itineraries, {} gallery images)",
        pages_written,
        started.elapsed(),
        bundle.itineraries.len(),
        bundle.gallery.len()
    );
    Ok(())
}

fn reset_output(output: &Path) -> Result<(), BuildError> {
    match fs::remove_dir_all(output) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(output)(e)),
    }
    fs::create_dir_all(output.join("en")).map_err(io_err(output))
}

/// Mirror the static tree into the output, byte for byte.
fn copy_static_tree(static_dir: &Path, dest: &Path) -> Result<(), BuildError> {
    for entry in WalkDir::new(static_dir) {
        let entry = entry.map_err(|source| BuildError::Walk {
            path: static_dir.to_path_buf(),
            source,
        })?;
        let rel = entry
            .path()
            .strip_prefix(static_dir)
            .expect("walkdir yields paths under its root");
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_err(&target))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(io_err(parent))?;
            }
            fs::copy(entry.path(), &target).map_err(io_err(&target))?;
        }
    }
    Ok(())
}

/// Output root for one locale's page tree.
fn locale_root(output: &Path, locale: Locale) -> PathBuf {
    match locale {
        Locale::It => output.to_path_buf(),
        Locale::En => output.join("en"),
    }
}

/// Render the full page set for one locale. Returns the page count.
fn render_locale(
    locale: Locale,
    bundle: &SiteBundle,
    snapshots: Vec<String>,
    paths: &SitePaths,
) -> Result<usize, BuildError> {
    let view = build_view(locale, bundle, snapshots);
    let root = locale_root(&paths.output, locale);
    let all = localized_itineraries(locale, &bundle.itineraries);

    let mut written = 0;
    let mut emit = |site_path: &str, markup: Markup| -> Result<(), BuildError> {
        write_page(&root, site_path, markup)?;
        written += 1;
        Ok(())
    };

    {
        let c = Chrome {
            locale,
            path: "/",
            title: &view.hero.title,
            view: &view,
        };
        emit("/index.html", pages::home(&c, &all, &bundle.gallery))?;
    }
    {
        let c = Chrome {
            locale,
            path: "/galleries.html",
            title: &view.sections.gallery_title,
            view: &view,
        };
        emit("/galleries.html", pages::gallery(&c, &bundle.gallery))?;
    }
    {
        let c = Chrome {
            locale,
            path: "/webcam.html",
            title: &view.webcam.labels.panorama_title,
            view: &view,
        };
        emit("/webcam.html", pages::webcam(&c))?;
    }
    {
        let c = Chrome {
            locale,
            path: "/contacts.html",
            title: &view.contact_info.title,
            view: &view,
        };
        emit("/contacts.html", pages::contacts(&c))?;
    }

    for filter in [
        ListFilter::All,
        ListFilter::Kind(RouteKind::Hiking),
        ListFilter::Kind(RouteKind::Biking),
    ] {
        let path = filter.path();
        let subset = match filter {
            ListFilter::All => all.clone(),
            ListFilter::Kind(kind) => locale::of_kind(&all, kind),
        };
        let c = Chrome {
            locale,
            path: &path,
            title: &view.sections.itineraries_title,
            view: &view,
        };
        emit(&path, pages::itinerary_list(&c, filter, &subset))?;
    }

    for it in &all {
        let path = it.detail_path();
        let c = Chrome {
            locale,
            path: &path,
            title: &it.title,
            view: &view,
        };
        emit(&path, pages::itinerary_detail(&c, it))?;
    }

    Ok(written)
}

fn write_page(root: &Path, site_path: &str, markup: Markup) -> Result<(), BuildError> {
    let target = root.join(site_path.trim_start_matches('/'));
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }
    fs::write(&target, markup.into_string()).map_err(io_err(&target))
}

// ============================================================================
// Webcam publish
// ============================================================================

/// Install a new webcam frame and refresh the published webcam pages.
///
/// The image becomes `static/webcam/current.jpg` and also gets an archive
/// copy named after the local wall clock (`%Y-%m-%d_%H-%M-%S.jpg`). Both land
/// in the source static tree and, when an output tree exists, in its mirror,
/// followed by a re-render of the two webcam pages so the archive listing is
/// current without a full site build.
pub fn update_webcam(paths: &SitePaths, image: &Path) -> Result<(), BuildError> {
    let data = fs::read(image).map_err(io_err(image))?;
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let archive_name = format!("{stamp}.jpg");

    let source_webcam = paths.static_dir.join("webcam");
    fs::create_dir_all(&source_webcam).map_err(io_err(&source_webcam))?;
    for name in ["current.jpg", archive_name.as_str()] {
        let target = source_webcam.join(name);
        fs::write(&target, &data).map_err(io_err(&target))?;
    }
    println!("Webcam frame published as {archive_name}");

    if !paths.output.exists() {
        return Ok(());
    }

    let output_webcam = paths.output.join("static/webcam");
    fs::create_dir_all(&output_webcam).map_err(io_err(&output_webcam))?;
    for name in ["current.jpg", archive_name.as_str()] {
        let target = output_webcam.join(name);
        fs::write(&target, &data).map_err(io_err(&target))?;
    }

    let bundle = content::load(&paths.content, &paths.static_dir)?;
    let snapshots = content::list_webcam_snapshots(&paths.static_dir);
    for locale in LOCALES {
        let view = build_view(locale, &bundle, snapshots.clone());
        let chrome = Chrome {
            locale,
            path: "/webcam.html",
            title: &view.webcam.labels.panorama_title,
            view: &view,
        };
        write_page(
            &locale_root(&paths.output, locale),
            "/webcam.html",
            pages::webcam(&chrome),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures as fx;
    use tempfile::TempDir;

    fn setup_site() -> (TempDir, SitePaths) {
        let tmp = TempDir::new().unwrap();
        let paths = SitePaths {
            content: tmp.path().join("content"),
            static_dir: tmp.path().join("static"),
            output: tmp.path().join("output"),
        };
        fs::create_dir_all(paths.content.join("itineraries")).unwrap();
        fs::create_dir_all(paths.static_dir.join("css")).unwrap();
        fs::write(paths.content.join("index.toml"), fx::INDEX_TOML).unwrap();
        fs::write(paths.content.join("events.toml"), fx::EVENTS_TOML).unwrap();
        fs::write(paths.content.join("galleries.toml"), fx::GALLERIES_TOML).unwrap();
        fs::write(paths.static_dir.join("css/style.css"), "body {}").unwrap();
        (tmp, paths)
    }

    fn add_itinerary(paths: &SitePaths, slug: &str, kind: &str, with_track: bool) {
        let gpx = if with_track {
            let rel = format!("gpx/{slug}.gpx");
            fs::create_dir_all(paths.static_dir.join("gpx")).unwrap();
            fs::write(paths.static_dir.join(&rel), fx::CLIMB_GPX).unwrap();
            Some(rel)
        } else {
            None
        };
        fs::write(
            paths.content.join(format!("itineraries/{slug}.toml")),
            fx::itinerary_toml(slug, kind, gpx.as_deref()),
        )
        .unwrap();
    }

    #[test]
    fn build_produces_both_locale_trees() {
        let (_tmp, paths) = setup_site();
        add_itinerary(&paths, "lago-nero", "hiking", true);

        build(&paths).unwrap();

        for page in [
            "index.html",
            "galleries.html",
            "webcam.html",
            "contacts.html",
            "itineraries.html",
            "itineraries/hiking.html",
            "itineraries/biking.html",
            "itineraries/lago-nero.html",
        ] {
            assert!(paths.output.join(page).is_file(), "missing {page}");
            assert!(
                paths.output.join("en").join(page).is_file(),
                "missing en/{page}"
            );
        }

        let it_home = fs::read_to_string(paths.output.join("index.html")).unwrap();
        let en_home = fs::read_to_string(paths.output.join("en/index.html")).unwrap();
        assert!(it_home.contains(r#"<html lang="it">"#));
        assert!(en_home.contains(r#"<html lang="en">"#));
        assert!(en_home.contains("Welcome to Bruggi"));
    }

    #[test]
    fn cold_build_mirrors_fresh_thumbnails() {
        let (_tmp, paths) = setup_site();
        // A real image behind the galleries.toml fixture's first entry, so
        // loading derives a thumbnail during this very build
        let img_path = paths.static_dir.join("img/village.jpg");
        fs::create_dir_all(img_path.parent().unwrap()).unwrap();
        image::RgbImage::from_fn(1200, 800, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        })
        .save(&img_path)
        .unwrap();

        build(&paths).unwrap();

        let gallery_page = fs::read_to_string(paths.output.join("galleries.html")).unwrap();
        assert!(gallery_page.contains("/static/thumbs/img/village.jpg"));
        assert!(
            paths
                .output
                .join("static/thumbs/img/village.jpg")
                .is_file(),
            "thumbnail derived during the build must be in the output mirror"
        );
    }

    #[test]
    fn static_tree_is_mirrored_verbatim() {
        let (_tmp, paths) = setup_site();
        build(&paths).unwrap();

        let copied = paths.output.join("static/css/style.css");
        assert_eq!(fs::read_to_string(copied).unwrap(), "body {}");
    }

    #[test]
    fn trackless_itinerary_gets_no_pages() {
        let (_tmp, paths) = setup_site();
        add_itinerary(&paths, "with-track", "hiking", true);
        add_itinerary(&paths, "no-track", "biking", false);

        build(&paths).unwrap();

        assert!(
            paths
                .output
                .join("itineraries/with-track.html")
                .is_file()
        );
        assert!(!paths.output.join("itineraries/no-track.html").exists());

        let list = fs::read_to_string(paths.output.join("itineraries.html")).unwrap();
        assert!(list.contains("with-track"));
        assert!(!list.contains("no-track"));
    }

    #[test]
    fn detail_page_uses_gpx_metrics() {
        let (_tmp, paths) = setup_site();
        add_itinerary(&paths, "salita", "hiking", true);

        build(&paths).unwrap();

        let detail =
            fs::read_to_string(paths.output.join("itineraries/salita.html")).unwrap();
        // Elevation computed from the track, not the declared sentinel 999
        assert!(detail.contains("25 m"));
        assert!(!detail.contains("999 m"));
        assert!(detail.contains(r#"href="/static/gpx/salita.gpx""#));
    }

    #[test]
    fn rebuild_is_deterministic() {
        let (_tmp, paths) = setup_site();
        add_itinerary(&paths, "lago-nero", "hiking", true);

        build(&paths).unwrap();
        let first = fs::read(paths.output.join("index.html")).unwrap();
        build(&paths).unwrap();
        let second = fs::read(paths.output.join("index.html")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn stale_output_files_are_removed() {
        let (_tmp, paths) = setup_site();
        fs::create_dir_all(&paths.output).unwrap();
        fs::write(paths.output.join("leftover.html"), "old").unwrap();

        build(&paths).unwrap();
        assert!(!paths.output.join("leftover.html").exists());
        assert!(paths.output.join("index.html").is_file());
    }

    #[test]
    fn webcam_update_installs_current_and_archive_copy() {
        let (_tmp, paths) = setup_site();
        build(&paths).unwrap();

        let frame = paths.static_dir.join("frame.jpg");
        fs::write(&frame, b"jpegbytes").unwrap();
        update_webcam(&paths, &frame).unwrap();

        let webcam = paths.static_dir.join("webcam");
        assert_eq!(fs::read(webcam.join("current.jpg")).unwrap(), b"jpegbytes");
        let archived: Vec<String> = fs::read_dir(&webcam)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n != "current.jpg")
            .collect();
        assert_eq!(archived.len(), 1);
        assert!(archived[0].ends_with(".jpg"));

        // Mirrored into the published tree and listed on the refreshed page
        assert!(
            paths
                .output
                .join("static/webcam/current.jpg")
                .is_file()
        );
        let page = fs::read_to_string(paths.output.join("webcam.html")).unwrap();
        assert!(page.contains(&format!("/static/webcam/{}", archived[0])));
        let en_page = fs::read_to_string(paths.output.join("en/webcam.html")).unwrap();
        assert!(en_page.contains(&format!("/static/webcam/{}", archived[0])));
    }

    #[test]
    fn webcam_update_without_output_only_touches_static() {
        let (_tmp, paths) = setup_site();
        let frame = paths.static_dir.join("frame.jpg");
        fs::write(&frame, b"jpegbytes").unwrap();

        update_webcam(&paths, &frame).unwrap();

        assert!(paths.static_dir.join("webcam/current.jpg").is_file());
        assert!(!paths.output.exists());
    }
}
