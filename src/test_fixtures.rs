//! Shared TOML/GPX fixtures for unit tests.
//!
//! One canonical, fully parallel content tree that individual tests mutate
//! (drop a key, break a value) to provoke the failure they care about.

/// Minimal but complete `index.toml` with parallel it/en dictionaries.
pub const INDEX_TOML: &str = r#"
[hero]
images = ["img/hero1.jpg", "img/hero2.jpg"]

[welcome]
image = "img/welcome.jpg"

[itineraries]
hero_image = "img/trails.jpg"

[contacts]
email = "info@bruggi.example"
phone = "+39 000 000000"
address = "Via Roma 1, Bruggi"

[it.nav]
home = "Home"
itineraries = "Itinerari"
webcam = "Webcam"
gallery = "Galleria"
contact = "Contatti"

[it.hero]
title = "Benvenuti a Bruggi"
subtitle = "Il borgo tra i monti"
cta = "Scopri"

[it.welcome]
title = "Il paese"
subtitle = "Una storia antica"
description = "Un piccolo borgo alpino."
altitude = "1.250 m"
founded = "1312"

[it.sections]
itineraries_title = "Itinerari"
itineraries_subtitle = "Sentieri e percorsi"
see_all_itineraries = "Tutti gli itinerari"
read_more = "Leggi"
filter_all = "Tutti"
filter_hiking = "A piedi"
filter_biking = "In bici"
gallery_title = "Galleria"
gallery_subtitle = "Il paese in foto"
see_all_gallery = "Tutte le foto"

[it.itinerary_page]
trail_details = "Dettagli percorso"
author = "Autore"
type = "Tipo"
type_hiking = "Escursione"
type_biking = "Bici"
duration = "Durata"
distance = "Distanza"
elevation_gain = "Dislivello"
download_gpx = "Scarica GPX"
description = "Descrizione"
difficulty = "Difficoltà"
difficulty_easy = "Facile"
difficulty_medium = "Media"
difficulty_hard = "Difficile"

[it.webcam_page]
live = "In diretta"
panorama_title = "Panorama"
location = "Bruggi, 1.250 m"
status_online = "Online"
next_update = "Prossimo aggiornamento"
snapshot = "Istantanea"
archive_title = "Archivio"

[it.contact_info]
title = "Contatti"
subtitle = "Scrivici"
email_label = "Email"
phone_label = "Telefono"
address_label = "Indirizzo"

[it.footer]
motto = "Il borgo tra i monti"
explore_title = "Esplora"
contacts_title = "Contatti"
copyright = "© {year} Bruggi"

[en.nav]
home = "Home"
itineraries = "Itineraries"
webcam = "Webcam"
gallery = "Gallery"
contact = "Contact"

[en.hero]
title = "Welcome to Bruggi"
subtitle = "The village in the mountains"
cta = "Explore"

[en.welcome]
title = "The village"
subtitle = "An ancient history"
description = "A small alpine village."
altitude = "1,250 m"
founded = "1312"

[en.sections]
itineraries_title = "Itineraries"
itineraries_subtitle = "Trails and routes"
see_all_itineraries = "All itineraries"
read_more = "Read more"
filter_all = "All"
filter_hiking = "Hiking"
filter_biking = "Biking"
gallery_title = "Gallery"
gallery_subtitle = "The village in pictures"
see_all_gallery = "All photos"

[en.itinerary_page]
trail_details = "Trail details"
author = "Author"
type = "Type"
type_hiking = "Hiking"
type_biking = "Biking"
duration = "Duration"
distance = "Distance"
elevation_gain = "Elevation gain"
download_gpx = "Download GPX"
description = "Description"
difficulty = "Difficulty"
difficulty_easy = "Easy"
difficulty_medium = "Medium"
difficulty_hard = "Hard"

[en.webcam_page]
live = "Live"
panorama_title = "Panorama"
location = "Bruggi, 1,250 m"
status_online = "Online"
next_update = "Next update"
snapshot = "Snapshot"
archive_title = "Archive"

[en.contact_info]
title = "Contact"
subtitle = "Write to us"
email_label = "Email"
phone_label = "Phone"
address_label = "Address"

[en.footer]
motto = "The village in the mountains"
explore_title = "Explore"
contacts_title = "Contact"
copyright = "© {year} Bruggi"
"#;

pub const EVENTS_TOML: &str = r#"
enabled = true

[it]
title = "Eventi d'agosto"
items = [
    { name = "Festa patronale", date = "10 agosto", time = "18:00" },
]

[en]
title = "August events"
items = [
    { name = "Patron feast", date = "August 10", time = "6 pm" },
]
"#;

pub const GALLERIES_TOML: &str = r#"
[[images]]
url = "img/village.jpg"
alt = "The village"
author = "@bruggi.photo"

[[images]]
url = "img/valley.jpg"
alt = "The valley"
"#;

/// A small climb: +10, -5 (ignored), +15, so the expected gain is 25.
pub const CLIMB_GPX: &str = r#"<?xml version="1.0"?>
<gpx><trk><trkseg>
  <trkpt lat="45.0" lon="9.0"><ele>1000</ele></trkpt>
  <trkpt lat="45.0" lon="9.0"><ele>1010</ele></trkpt>
  <trkpt lat="45.0" lon="9.0"><ele>1005</ele></trkpt>
  <trkpt lat="45.0" lon="9.0"><ele>1020</ele></trkpt>
</trkseg></trk></gpx>"#;

/// Render one itinerary descriptor. `gpx` of `None` omits the key entirely;
/// `Some("")` declares an explicitly empty reference.
pub fn itinerary_toml(slug: &str, kind: &str, gpx: Option<&str>) -> String {
    let gpx_line = match gpx {
        Some(path) => format!("gpx_file = \"{path}\"\n"),
        None => String::new(),
    };
    format!(
        r#"slug = "{slug}"
type = "{kind}"
image = "img/{slug}.jpg"
{gpx_line}gallery = []
difficulty = "medium"
duration = "3h"
distance_km = 9999.0
elevation_gain = 999

[it]
title = "Giro {slug}"
description = "Breve descrizione."
long_description = "Descrizione lunga."
tags = ["panorama"]

[en]
title = "{slug} loop"
description = "Short description."
long_description = "Long description."
tags = ["views"]
"#
    )
}
