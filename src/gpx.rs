//! GPX track analysis.
//!
//! Reads a GPX file down to its ordered track-point stream and computes the
//! two figures the itinerary pages display: total elevation gain and total
//! distance. Track and segment grouping is flattened — a pause in the
//! recording does not reset either accumulator.
//!
//! ## Semantics
//!
//! - **Elevation gain** sums only strictly positive deltas between
//!   consecutive points. Descents contribute nothing (they are not
//!   subtracted). The running sum stays in `f64` and is rounded to whole
//!   meters once, at the end.
//! - **Distance** is the haversine great-circle distance between consecutive
//!   points on a sphere of radius 6 371 000 m, accumulated in meters and
//!   converted to kilometers with two decimals once, at the end.
//!
//! A malformed file yields a [`GpxError`] for that one track; the content
//! loader downgrades it to a warning and keeps the author-declared figures.

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpxError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("Unparsable {field} value: {value:?}")]
    Coordinate { field: &'static str, value: String },
    #[error("Track point missing lat/lon attributes")]
    MissingCoordinate,
}

/// One `<trkpt>`: latitude/longitude in degrees, elevation in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    pub ele: f64,
}

/// Computed metrics for one track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackStats {
    /// Total climb in whole meters.
    pub elevation_gain_m: i64,
    /// Total length in kilometers, two decimals.
    pub distance_km: f64,
}

/// Parse a GPX file and compute its track stats in one step.
pub fn analyze_file(path: &Path) -> Result<TrackStats, GpxError> {
    let points = parse_track_points(path)?;
    Ok(analyze(&points))
}

/// Extract the flattened `<trkpt>` sequence from a GPX file.
///
/// Only `lat`/`lon` attributes and `<ele>` content are consumed; everything
/// else in the document (metadata, waypoints, extensions) is skipped. A
/// point without an `<ele>` child gets elevation 0.
pub fn parse_track_points(path: &Path) -> Result<Vec<TrackPoint>, GpxError> {
    let xml = fs::read_to_string(path).map_err(|source| GpxError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut points = Vec::new();
    // Point of the trkpt currently open, if any
    let mut current: Option<TrackPoint> = None;
    let mut in_ele = false;

    loop {
        match reader.read_event()? {
            // Self-closing trkpt carries no ele child and sees no End event
            Event::Empty(e) if e.name().as_ref() == b"trkpt" => {
                let (lat, lon) = read_lat_lon(&e)?;
                points.push(TrackPoint { lat, lon, ele: 0.0 });
            }
            Event::Start(e) if e.name().as_ref() == b"trkpt" => {
                let (lat, lon) = read_lat_lon(&e)?;
                current = Some(TrackPoint { lat, lon, ele: 0.0 });
            }
            Event::Start(e) if e.name().as_ref() == b"ele" && current.is_some() => {
                in_ele = true;
            }
            Event::Text(t) if in_ele => {
                let text = String::from_utf8_lossy(t.as_ref());
                let ele = text.trim().parse::<f64>().map_err(|_| GpxError::Coordinate {
                    field: "ele",
                    value: text.trim().to_string(),
                })?;
                if let Some(p) = current.as_mut() {
                    p.ele = ele;
                }
            }
            Event::End(e) if e.name().as_ref() == b"ele" => {
                in_ele = false;
            }
            Event::End(e) if e.name().as_ref() == b"trkpt" => {
                if let Some(p) = current.take() {
                    points.push(p);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(points)
}

fn read_lat_lon(e: &quick_xml::events::BytesStart<'_>) -> Result<(f64, f64), GpxError> {
    let mut lat = None;
    let mut lon = None;
    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"lat" => lat = Some(parse_coord("lat", &attr.value)?),
            b"lon" => lon = Some(parse_coord("lon", &attr.value)?),
            _ => {}
        }
    }
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok((lat, lon)),
        _ => Err(GpxError::MissingCoordinate),
    }
}

fn parse_coord(field: &'static str, raw: &[u8]) -> Result<f64, GpxError> {
    let text = String::from_utf8_lossy(raw);
    text.trim().parse::<f64>().map_err(|_| GpxError::Coordinate {
        field,
        value: text.trim().to_string(),
    })
}

/// Compute elevation gain and distance over an ordered point sequence.
///
/// Empty and single-point tracks yield `(0, 0.0)`.
pub fn analyze(points: &[TrackPoint]) -> TrackStats {
    let mut gain = 0.0_f64;
    let mut dist_m = 0.0_f64;

    for pair in points.windows(2) {
        let (prev, next) = (pair[0], pair[1]);

        let delta = next.ele - prev.ele;
        if delta > 0.0 {
            gain += delta;
        }

        dist_m += haversine_m(prev.lat, prev.lon, next.lat, next.lon);
    }

    TrackStats {
        elevation_gain_m: gain.round() as i64,
        distance_km: (dist_m / 1000.0 * 100.0).round() / 100.0,
    }
}

/// Great-circle distance in meters between two lat/lon points (degrees).
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_gpx(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    fn pt(lat: f64, lon: f64, ele: f64) -> TrackPoint {
        TrackPoint { lat, lon, ele }
    }

    // =========================================================================
    // analyze
    // =========================================================================

    #[test]
    fn empty_track_is_zero() {
        let stats = analyze(&[]);
        assert_eq!(stats.elevation_gain_m, 0);
        assert_eq!(stats.distance_km, 0.0);
    }

    #[test]
    fn single_point_is_zero() {
        let stats = analyze(&[pt(45.0, 9.0, 1200.0)]);
        assert_eq!(stats.elevation_gain_m, 0);
        assert_eq!(stats.distance_km, 0.0);
    }

    #[test]
    fn gain_ignores_descents() {
        // 1000 → 1010 → 1005 → 1020: +10, -5 (ignored), +15 = 25
        let points = [
            pt(45.0, 9.0, 1000.0),
            pt(45.0, 9.0, 1010.0),
            pt(45.0, 9.0, 1005.0),
            pt(45.0, 9.0, 1020.0),
        ];
        assert_eq!(analyze(&points).elevation_gain_m, 25);
    }

    #[test]
    fn gain_rounds_once_at_the_end() {
        // Three +0.4 climbs: per-step rounding would give 0, end rounding 1
        let points = [
            pt(45.0, 9.0, 100.0),
            pt(45.0, 9.0, 100.4),
            pt(45.0, 9.0, 100.0),
            pt(45.0, 9.0, 100.4),
            pt(45.0, 9.0, 100.0),
            pt(45.0, 9.0, 100.4),
        ];
        assert_eq!(analyze(&points).elevation_gain_m, 1);
    }

    #[test]
    fn distance_rounded_to_two_decimals() {
        // One degree of latitude is ~111.19 km on this sphere
        let points = [pt(45.0, 9.0, 0.0), pt(46.0, 9.0, 0.0)];
        let stats = analyze(&points);
        assert!(stats.distance_km > 111.0 && stats.distance_km < 111.4);
        let scaled = stats.distance_km * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }

    // =========================================================================
    // haversine
    // =========================================================================

    #[test]
    fn haversine_is_symmetric() {
        let d1 = haversine_m(45.0, 9.0, 46.1, 9.3);
        let d2 = haversine_m(46.1, 9.3, 45.0, 9.0);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn haversine_zero_iff_identical() {
        assert_eq!(haversine_m(45.5, 9.5, 45.5, 9.5), 0.0);
        assert!(haversine_m(45.5, 9.5, 45.5, 9.5001) > 0.0);
    }

    #[test]
    fn haversine_known_distance() {
        // Equator to 1° north along a meridian: R * pi/180 ≈ 111 194.9 m
        let d = haversine_m(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_194.9).abs() < 1.0);
    }

    // =========================================================================
    // parsing
    // =========================================================================

    #[test]
    fn parses_points_across_segments() {
        let tmp = TempDir::new().unwrap();
        let path = write_gpx(
            &tmp,
            "trail.gpx",
            r#"<?xml version="1.0"?>
<gpx><trk>
  <trkseg>
    <trkpt lat="45.0" lon="9.0"><ele>1000</ele></trkpt>
    <trkpt lat="45.1" lon="9.1"><ele>1050.5</ele></trkpt>
  </trkseg>
  <trkseg>
    <trkpt lat="45.2" lon="9.2"><ele>1010</ele></trkpt>
  </trkseg>
</trk></gpx>"#,
        );

        let points = parse_track_points(&path).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], pt(45.0, 9.0, 1000.0));
        assert_eq!(points[1], pt(45.1, 9.1, 1050.5));
        assert_eq!(points[2], pt(45.2, 9.2, 1010.0));
    }

    #[test]
    fn point_without_ele_defaults_to_zero() {
        let tmp = TempDir::new().unwrap();
        let path = write_gpx(
            &tmp,
            "flat.gpx",
            r#"<gpx><trk><trkseg>
                <trkpt lat="45.0" lon="9.0"/>
                <trkpt lat="45.0" lon="9.1"></trkpt>
            </trkseg></trk></gpx>"#,
        );

        let points = parse_track_points(&path).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].ele, 0.0);
        assert_eq!(points[1].ele, 0.0);
    }

    #[test]
    fn bad_coordinate_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_gpx(
            &tmp,
            "bad.gpx",
            r#"<gpx><trk><trkseg>
                <trkpt lat="not-a-number" lon="9.0"><ele>1</ele></trkpt>
            </trkseg></trk></gpx>"#,
        );

        let err = parse_track_points(&path).unwrap_err();
        assert!(matches!(err, GpxError::Coordinate { field: "lat", .. }));
    }

    #[test]
    fn missing_lat_lon_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_gpx(
            &tmp,
            "nolat.gpx",
            r#"<gpx><trk><trkseg><trkpt lon="9.0"/></trkseg></trk></gpx>"#,
        );

        assert!(matches!(
            parse_track_points(&path).unwrap_err(),
            GpxError::MissingCoordinate
        ));
    }

    #[test]
    fn truncated_xml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_gpx(&tmp, "trunc.gpx", "<gpx><trk><trkseg><trkpt lat=");
        assert!(parse_track_points(&path).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_track_points(Path::new("/nonexistent/x.gpx")).unwrap_err();
        assert!(matches!(err, GpxError::Io { .. }));
    }

    #[test]
    fn analyze_file_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let path = write_gpx(
            &tmp,
            "climb.gpx",
            r#"<gpx><trk><trkseg>
                <trkpt lat="45.0" lon="9.0"><ele>1000</ele></trkpt>
                <trkpt lat="45.0" lon="9.0"><ele>1010</ele></trkpt>
                <trkpt lat="45.0" lon="9.0"><ele>1005</ele></trkpt>
                <trkpt lat="45.0" lon="9.0"><ele>1020</ele></trkpt>
            </trkseg></trk></gpx>"#,
        );

        let stats = analyze_file(&path).unwrap();
        assert_eq!(stats.elevation_gain_m, 25);
        assert_eq!(stats.distance_km, 0.0);
    }
}
