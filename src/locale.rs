//! Locale handling and view-model assembly.
//!
//! Italian is the default locale and owns the unprefixed URL space; English
//! pages are generated under `/en`. The two content dictionaries are
//! structurally parallel (enforced at load time, see [`crate::content`]), so
//! flattening is one uniform operation: pick the locale's dictionary, merge
//! it with the shared locale-invariant fields, and hand the resulting
//! [`RenderView`] to the typed page renderers.
//!
//! View models are built fresh per render and never persisted. The footer's
//! `{year}` token resolves here, at render time, so a long-running watch
//! process always stamps the current year.

use chrono::Datelike;

use crate::content::{
    ContactInfoLabels, Contacts, EventItem, GalleryImage, Itinerary, ItineraryPageLabels,
    NavLabels, RouteKind, SectionLabels, SiteBundle, WebcamPageLabels,
};

/// Supported content languages. Italian is the default locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    It,
    En,
}

pub const LOCALES: [Locale; 2] = [Locale::It, Locale::En];

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::It => "it",
            Locale::En => "en",
        }
    }

    /// URL prefix for links within this locale's page tree.
    pub fn base_url(self) -> &'static str {
        match self {
            Locale::It => "",
            Locale::En => "/en",
        }
    }

    /// Cross-language link for the page at `path` (site-root-relative).
    ///
    /// The mapping pairs the two locale path spaces: the Italian page at `p`
    /// pairs with `/en` + `p` (root pairs with `/en/`), and English pages
    /// already point at the canonical unprefixed target.
    pub fn alternate_url(self, path: &str) -> String {
        match self {
            Locale::It => {
                if path == "/" {
                    "/en/".to_string()
                } else {
                    format!("/en{path}")
                }
            }
            Locale::En => path.to_string(),
        }
    }
}

// ============================================================================
// View models
// ============================================================================

/// Flattened, locale-resolved data shared by every page template.
#[derive(Debug, Clone)]
pub struct RenderView {
    pub nav: NavLabels,
    pub hero: HeroView,
    pub welcome: WelcomeView,
    pub itineraries_hero_image: String,
    pub sections: SectionLabels,
    pub itinerary_page: ItineraryPageLabels,
    pub webcam: WebcamView,
    pub contacts: Contacts,
    pub contact_info: ContactInfoLabels,
    pub events: EventsView,
    pub footer: FooterView,
}

#[derive(Debug, Clone)]
pub struct HeroView {
    pub title: String,
    pub subtitle: String,
    pub cta: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct WelcomeView {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub altitude: String,
    pub founded: String,
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct WebcamView {
    pub labels: WebcamPageLabels,
    pub snapshots: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EventsView {
    pub enabled: bool,
    pub title: String,
    pub items: Vec<EventItem>,
}

#[derive(Debug, Clone)]
pub struct FooterView {
    pub motto: String,
    pub explore_title: String,
    pub contacts_title: String,
    /// `{year}` already substituted.
    pub copyright: String,
}

/// One itinerary flattened for a single locale.
#[derive(Debug, Clone)]
pub struct ItineraryView {
    pub slug: String,
    pub kind: RouteKind,
    pub image: String,
    pub gpx_url: String,
    pub youtube_video_id: Option<String>,
    pub gallery: Vec<GalleryImage>,
    pub difficulty: String,
    pub duration: String,
    pub distance_km: f64,
    pub elevation_gain_m: i64,
    pub author: Option<String>,
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub tags: Vec<String>,
}

impl ItineraryView {
    /// Site-root-relative path of this itinerary's detail page.
    pub fn detail_path(&self) -> String {
        format!("/itineraries/{}.html", self.slug)
    }
}

// ============================================================================
// Assembly
// ============================================================================

/// Merge the shared fields with one locale's dictionary.
pub fn build_view(locale: Locale, bundle: &SiteBundle, webcam_snapshots: Vec<String>) -> RenderView {
    let l = match locale {
        Locale::It => &bundle.site.it,
        Locale::En => &bundle.site.en,
    };
    let el = match locale {
        Locale::It => &bundle.events.it,
        Locale::En => &bundle.events.en,
    };

    RenderView {
        nav: l.nav.clone(),
        hero: HeroView {
            title: l.hero.title.clone(),
            subtitle: l.hero.subtitle.clone(),
            cta: l.hero.cta.clone(),
            images: bundle.site.hero.images.clone(),
        },
        welcome: WelcomeView {
            title: l.welcome.title.clone(),
            subtitle: l.welcome.subtitle.clone(),
            description: l.welcome.description.clone(),
            altitude: l.welcome.altitude.clone(),
            founded: l.welcome.founded.clone(),
            image: bundle.site.welcome.image.clone(),
        },
        itineraries_hero_image: bundle.site.itineraries.hero_image.clone(),
        sections: l.sections.clone(),
        itinerary_page: l.itinerary_page.clone(),
        webcam: WebcamView {
            labels: l.webcam_page.clone(),
            snapshots: webcam_snapshots,
        },
        contacts: bundle.site.contacts.clone(),
        contact_info: l.contact_info.clone(),
        events: EventsView {
            enabled: bundle.events.enabled,
            title: el.title.clone(),
            items: el.items.clone(),
        },
        footer: FooterView {
            motto: l.footer.motto.clone(),
            explore_title: l.footer.explore_title.clone(),
            contacts_title: l.footer.contacts_title.clone(),
            copyright: resolve_copyright(&l.footer.copyright, chrono::Local::now().year()),
        },
    }
}

/// Substitute the `{year}` token. Applied at render time, not load time.
pub fn resolve_copyright(template: &str, year: i32) -> String {
    template.replace("{year}", &year.to_string())
}

/// Flatten the itinerary set for one locale.
///
/// Only routes with a GPX track participate in any listing or detail page;
/// trackless items are excluded from navigable output entirely. Order is the
/// loader's slug order.
pub fn localized_itineraries(locale: Locale, itineraries: &[Itinerary]) -> Vec<ItineraryView> {
    itineraries
        .iter()
        .filter(|it| it.has_track())
        .map(|it| {
            let text = it.locale(locale == Locale::En);
            ItineraryView {
                slug: it.slug.clone(),
                kind: it.kind,
                image: it.image.clone(),
                gpx_url: it.gpx_url.clone().unwrap_or_default(),
                youtube_video_id: it.youtube_video_id.clone(),
                gallery: it.gallery.clone(),
                difficulty: it.difficulty.clone(),
                duration: it.duration.clone(),
                distance_km: it.distance_km,
                elevation_gain_m: it.elevation_gain_m,
                author: it.author.clone(),
                title: text.title.clone(),
                description: text.description.clone(),
                long_description: text.long_description.clone(),
                tags: text.tags.clone(),
            }
        })
        .collect()
}

/// Type-filtered sub-view, same order as the full list.
pub fn of_kind(views: &[ItineraryView], kind: RouteKind) -> Vec<ItineraryView> {
    views.iter().filter(|v| v.kind == kind).cloned().collect()
}
