//! # Sentiero
//!
//! A bilingual (Italian/English) static site generator for a small mountain
//! village: trail itineraries with GPX-derived metrics, photo galleries with
//! cached thumbnails, a webcam page with a timestamped archive, and seasonal
//! events. TOML descriptors are the data source; the output is a plain HTML
//! tree ready for any static host.
//!
//! # Architecture: One Linear Build
//!
//! A build is a single pass with no intermediate artifacts:
//!
//! ```text
//! 1. Load      content/*.toml  →  SiteBundle   (typed descriptors + derived data)
//! 2. Flatten   SiteBundle      →  RenderView   (one per locale, {year} resolved)
//! 3. Render    RenderView      →  output/      (it at the root, en under en/)
//! ```
//!
//! Loading drives the derived-data pipeline as a side effect: GPX tracks are
//! analyzed (overwriting declared distance/elevation figures), asset paths
//! are normalized under `/static/`, and every gallery image gets a
//! width-600 thumbnail, regenerated only when the source file is newer.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | TOML descriptor loading, locale-parallelism checking, derived-data pipeline |
//! | [`gpx`] | GPX track analysis: haversine distance and positive elevation gain |
//! | [`thumbs`] | Mtime-validated thumbnail cache and `/static/` URL normalization |
//! | [`locale`] | Locale routing, alternate-URL pairing, per-locale view models |
//! | [`pages`] | Maud page renderers over the typed view models |
//! | [`build`] | Full-site orchestration and the webcam publish path |
//! | [`serve`] | Watch-and-rebuild loop with a local preview server |
//!
//! # Design Decisions
//!
//! ## Two Locales, One Structure
//!
//! Every descriptor carries parallel `[it]` and `[en]` tables deserialized
//! into the *same* struct with `deny_unknown_fields` and no defaulted text
//! fields. A key present in one language and missing from the other is a
//! load-time parse error naming the file, so the two page trees can never
//! silently diverge. Italian owns the unprefixed URL space; every page links
//! to its counterpart via a fixed path mapping in [`locale`].
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system, rather than a runtime template engine:
//!
//! - **Compile-time checking**: a page referencing a missing field is a build
//!   error, not an empty `<div>` in production.
//! - **Type-safe**: templates consume the view models in [`locale`] directly —
//!   no stringly-typed context lookups.
//! - **XSS-safe by default**: all interpolation is auto-escaped.
//! - **Zero runtime files**: no template directory to ship or watch.
//!
//! ## GPX as the Source of Truth for Metrics
//!
//! Authors may type a distance into an itinerary descriptor, but when the
//! route has a GPX track the build recomputes distance and elevation gain
//! from the track and overwrites the declared figures. Hand-maintained
//! numbers drift; the track does not. Routes without a track are excluded
//! from every navigable page entirely.
//!
//! ## Stateless Thumbnail Cache
//!
//! There is no manifest: a thumbnail is valid exactly when its mtime is at or
//! after its source's. Repeat builds cost one `stat` per image, the cache
//! survives in `static/thumbs/` across runs, and deleting that directory is a
//! full reset with no bookkeeping to repair.

pub mod build;
pub mod content;
pub mod gpx;
pub mod locale;
pub mod pages;
pub mod serve;
pub mod thumbs;

#[cfg(test)]
pub(crate) mod test_fixtures;
