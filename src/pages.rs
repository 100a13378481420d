//! Typed page renderers.
//!
//! Every page is a maud function taking the flattened [`RenderView`] plus
//! its page-specific data and returning markup. There is no string-keyed
//! template context: a missing field is a compile error, interpolation is
//! auto-escaped, and each page kind has exactly one entry point consumed by
//! the build orchestrator.
//!
//! All renderers share one [`Chrome`]: the document shell, header with
//! locale-aware navigation and the cross-language link, and the footer.
//! Styling and behavior come from the user's static tree
//! (`/static/css/style.css`, `/static/js/main.js`), copied verbatim at build
//! time.

use maud::{DOCTYPE, Markup, html};

use crate::content::{GalleryImage, RouteKind};
use crate::locale::{ItineraryView, Locale, RenderView};

/// Everything the shared page shell needs.
pub struct Chrome<'a> {
    pub locale: Locale,
    /// Site-root-relative path of the page being rendered, e.g.
    /// `/itineraries.html`. Drives the cross-language link.
    pub path: &'a str,
    pub title: &'a str,
    pub view: &'a RenderView,
}

impl Chrome<'_> {
    fn base(&self) -> &'static str {
        self.locale.base_url()
    }

    fn alternate_url(&self) -> String {
        self.locale.alternate_url(self.path)
    }
}

// ============================================================================
// Shared chrome
// ============================================================================

fn base_document(chrome: &Chrome<'_>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(chrome.locale.code()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (chrome.title) }
                link rel="stylesheet" href="/static/css/style.css";
                link rel="alternate" hreflang=(other_locale(chrome.locale).code())
                    href=(chrome.alternate_url());
            }
            body {
                (site_header(chrome))
                main { (content) }
                (site_footer(chrome))
                script src="/static/js/main.js" {}
            }
        }
    }
}

fn other_locale(locale: Locale) -> Locale {
    match locale {
        Locale::It => Locale::En,
        Locale::En => Locale::It,
    }
}

fn site_header(chrome: &Chrome<'_>) -> Markup {
    let nav = &chrome.view.nav;
    let base = chrome.base();
    html! {
        header.site-header {
            nav.site-nav {
                a href={ (base) "/" } { (nav.home) }
                a href={ (base) "/itineraries.html" } { (nav.itineraries) }
                a href={ (base) "/webcam.html" } { (nav.webcam) }
                a href={ (base) "/galleries.html" } { (nav.gallery) }
                a href={ (base) "/contacts.html" } { (nav.contact) }
            }
            a.lang-switch href=(chrome.alternate_url()) rel="alternate" {
                (other_locale(chrome.locale).code().to_uppercase())
            }
        }
    }
}

fn site_footer(chrome: &Chrome<'_>) -> Markup {
    let view = chrome.view;
    html! {
        footer.site-footer {
            p.motto { (view.footer.motto) }
            section.footer-contacts {
                h3 { (view.footer.contacts_title) }
                p { (view.contacts.email) }
                p { (view.contacts.phone) }
                p { (view.contacts.address) }
            }
            p.copyright { (view.footer.copyright) }
        }
    }
}

fn gallery_grid(images: &[GalleryImage]) -> Markup {
    html! {
        div.gallery-grid {
            @for img in images {
                figure.gallery-item {
                    a href=(img.url) {
                        img src=(img.thumbnail) alt=(img.alt) loading="lazy";
                    }
                    @if let Some(author) = &img.author {
                        figcaption.attribution { (author) }
                    }
                }
            }
        }
    }
}

/// Route-type label from the locale dictionary.
fn kind_label(view: &RenderView, kind: RouteKind) -> &str {
    match kind {
        RouteKind::Hiking => &view.itinerary_page.type_hiking,
        RouteKind::Biking => &view.itinerary_page.type_biking,
    }
}

/// Difficulty label from the locale dictionary; unknown values pass through.
fn difficulty_label<'a>(view: &'a RenderView, raw: &'a str) -> &'a str {
    match raw {
        "easy" => &view.itinerary_page.difficulty_easy,
        "medium" => &view.itinerary_page.difficulty_medium,
        "hard" => &view.itinerary_page.difficulty_hard,
        other => other,
    }
}

fn itinerary_card(chrome: &Chrome<'_>, it: &ItineraryView) -> Markup {
    let view = chrome.view;
    html! {
        article.itinerary-card {
            a href={ (chrome.base()) (it.detail_path()) } {
                img src=(it.image) alt=(it.title) loading="lazy";
                h3 { (it.title) }
            }
            p.description { (it.description) }
            ul.trail-facts {
                li { (kind_label(view, it.kind)) }
                li { (it.distance_km) " km" }
                li { (it.elevation_gain_m) " m" }
                li { (it.duration) }
            }
            a.read-more href={ (chrome.base()) (it.detail_path()) } {
                (view.sections.read_more)
            }
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

/// Home: hero slideshow, welcome section, itinerary teaser, gallery teaser.
pub fn home(chrome: &Chrome<'_>, itineraries: &[ItineraryView], gallery: &[GalleryImage]) -> Markup {
    let view = chrome.view;

    // The home page shows at most eight gallery tiles
    let teaser = &gallery[..gallery.len().min(8)];

    let content = html! {
        section.hero {
            div.hero-slides {
                @for img in &view.hero.images {
                    img.hero-slide src=(img) alt=(view.hero.title);
                }
            }
            h1 { (view.hero.title) }
            p.subtitle { (view.hero.subtitle) }
            a.cta href={ (chrome.base()) "/itineraries.html" } { (view.hero.cta) }
        }
        section.welcome {
            img src=(view.welcome.image) alt=(view.welcome.title);
            h2 { (view.welcome.title) }
            h3 { (view.welcome.subtitle) }
            p { (view.welcome.description) }
            ul.village-facts {
                li { (view.welcome.altitude) }
                li { (view.welcome.founded) }
            }
        }
        @if view.events.enabled {
            section.events {
                h2 { (view.events.title) }
                ul {
                    @for event in &view.events.items {
                        li {
                            span.name { (event.name) }
                            span.date { (event.date) }
                            span.time { (event.time) }
                        }
                    }
                }
            }
        }
        section.itineraries-teaser {
            h2 { (view.sections.itineraries_title) }
            p { (view.sections.itineraries_subtitle) }
            div.itinerary-grid {
                @for it in itineraries {
                    (itinerary_card(chrome, it))
                }
            }
            a.see-all href={ (chrome.base()) "/itineraries.html" } {
                (view.sections.see_all_itineraries)
            }
        }
        section.gallery-teaser {
            h2 { (view.sections.gallery_title) }
            p { (view.sections.gallery_subtitle) }
            (gallery_grid(teaser))
            a.see-all href={ (chrome.base()) "/galleries.html" } {
                (view.sections.see_all_gallery)
            }
        }
    };

    base_document(chrome, content)
}

/// Gallery index: the full image set.
pub fn gallery(chrome: &Chrome<'_>, images: &[GalleryImage]) -> Markup {
    let view = chrome.view;
    let content = html! {
        section.gallery-page {
            h1 { (view.sections.gallery_title) }
            p { (view.sections.gallery_subtitle) }
            (gallery_grid(images))
        }
    };
    base_document(chrome, content)
}

/// Webcam status page: live frame plus the archival snapshots.
pub fn webcam(chrome: &Chrome<'_>) -> Markup {
    let view = chrome.view;
    let labels = &view.webcam.labels;
    let content = html! {
        section.webcam-page {
            h1 { (labels.panorama_title) }
            p.location { (labels.location) }
            figure.webcam-live {
                span.badge { (labels.live) }
                img src="/static/webcam/current.jpg" alt=(labels.snapshot);
                figcaption {
                    span.status { (labels.status_online) }
                    span.next-update { (labels.next_update) }
                }
            }
            @if !view.webcam.snapshots.is_empty() {
                section.webcam-archive {
                    h2 { (labels.archive_title) }
                    div.snapshot-grid {
                        @for snap in &view.webcam.snapshots {
                            a href=(snap) {
                                img src=(snap) alt=(labels.snapshot) loading="lazy";
                            }
                        }
                    }
                }
            }
        }
    };
    base_document(chrome, content)
}

/// Contacts page.
pub fn contacts(chrome: &Chrome<'_>) -> Markup {
    let view = chrome.view;
    let info = &view.contact_info;
    let content = html! {
        section.contacts-page {
            h1 { (info.title) }
            p { (info.subtitle) }
            dl.contact-details {
                dt { (info.email_label) }
                dd { a href={ "mailto:" (view.contacts.email) } { (view.contacts.email) } }
                dt { (info.phone_label) }
                dd { (view.contacts.phone) }
                dt { (info.address_label) }
                dd { (view.contacts.address) }
            }
        }
    };
    base_document(chrome, content)
}

/// Which slice of the itinerary set a list page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Kind(RouteKind),
}

impl ListFilter {
    /// Site-root-relative path of this list page.
    pub fn path(self) -> String {
        match self {
            ListFilter::All => "/itineraries.html".to_string(),
            ListFilter::Kind(kind) => format!("/itineraries/{}.html", kind.slug()),
        }
    }
}

/// Itinerary list page (all routes or one type).
pub fn itinerary_list(
    chrome: &Chrome<'_>,
    filter: ListFilter,
    itineraries: &[ItineraryView],
) -> Markup {
    let view = chrome.view;
    let filter_link = |target: ListFilter, label: &str| {
        html! {
            a.filter.current[target == filter]
                href={ (chrome.base()) (target.path()) } { (label) }
        }
    };

    let content = html! {
        section.itinerary-list-page {
            @if !view.itineraries_hero_image.is_empty() {
                img.list-hero src=(view.itineraries_hero_image)
                    alt=(view.sections.itineraries_title);
            }
            h1 { (view.sections.itineraries_title) }
            p { (view.sections.itineraries_subtitle) }
            nav.type-filters {
                (filter_link(ListFilter::All, &view.sections.filter_all))
                (filter_link(ListFilter::Kind(RouteKind::Hiking), &view.sections.filter_hiking))
                (filter_link(ListFilter::Kind(RouteKind::Biking), &view.sections.filter_biking))
            }
            div.itinerary-grid {
                @for it in itineraries {
                    (itinerary_card(chrome, it))
                }
            }
        }
    };

    base_document(chrome, content)
}

/// Itinerary detail page.
pub fn itinerary_detail(chrome: &Chrome<'_>, it: &ItineraryView) -> Markup {
    let view = chrome.view;
    let labels = &view.itinerary_page;
    let content = html! {
        article.itinerary-detail {
            img.cover src=(it.image) alt=(it.title);
            h1 { (it.title) }
            p.lead { (it.description) }

            section.trail-details {
                h2 { (labels.trail_details) }
                dl {
                    dt { (labels.kind) }
                    dd { (kind_label(view, it.kind)) }
                    dt { (labels.difficulty) }
                    dd { (difficulty_label(view, &it.difficulty)) }
                    dt { (labels.duration) }
                    dd { (it.duration) }
                    dt { (labels.distance) }
                    dd { (it.distance_km) " km" }
                    dt { (labels.elevation_gain) }
                    dd { (it.elevation_gain_m) " m" }
                    @if let Some(author) = &it.author {
                        dt { (labels.author) }
                        dd { (author) }
                    }
                }
                a.download-gpx href=(it.gpx_url) download {
                    (labels.download_gpx)
                }
            }

            section.description {
                h2 { (labels.description) }
                p { (it.long_description) }
                @if !it.tags.is_empty() {
                    ul.tags {
                        @for tag in &it.tags { li { (tag) } }
                    }
                }
            }

            @if let Some(video_id) = &it.youtube_video_id {
                section.video {
                    iframe src={ "https://www.youtube-nocookie.com/embed/" (video_id) }
                        title=(it.title) allowfullscreen {}
                }
            }

            @if !it.gallery.is_empty() {
                section.itinerary-gallery {
                    (gallery_grid(&it.gallery))
                }
            }
        }
    };

    base_document(chrome, content)
}

// ============================================================================
// Tests
// ============================================================================
