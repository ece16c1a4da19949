//! Leaflet HTML export of the selected entries.
//!
//! Three layers, all toggleable from the layer control: markers with film
//! popups, circles coloured by filming attempts, and the route linking the
//! entries in the order given. The page lives in `templates/map.html`.

use crate::error::Error;
use crate::location::Coordinate;
use crate::nearest::CandidateEntry;
use askama::Template;
use std::fs;
use std::path::PathBuf;
use tracing::info;

const INITIAL_ZOOM: f64 = 1.5;
const CIRCLE_RADIUS_PX: u32 = 20;

/// Circle colour for a location's repeat count.
pub fn attempts_color(repeat_count: u32) -> &'static str {
    match repeat_count {
        0..=1 => "orange",
        2..=10 => "red",
        _ => "darkred",
    }
}

#[derive(Template)]
#[template(path = "map.html")]
struct MapPage<'a> {
    year: &'a str,
    center_lat: f64,
    center_lon: f64,
    zoom: f64,
    circle_radius: u32,
    points: Vec<MapPoint<'a>>,
}

struct MapPoint<'a> {
    lat: f64,
    lon: f64,
    color: &'static str,
    film: &'a str,
    distance: String,
    repeat_count: u32,
}

impl<'a> From<&'a CandidateEntry> for MapPoint<'a> {
    fn from(entry: &'a CandidateEntry) -> Self {
        Self {
            lat: entry.coordinate.lat,
            lon: entry.coordinate.lon,
            color: attempts_color(entry.repeat_count),
            film: &entry.film,
            distance: format!("{:.2}", entry.distance_km),
            repeat_count: entry.repeat_count,
        }
    }
}

/// Writes the map for one run to an HTML file.
pub struct LeafletMap {
    output: PathBuf,
}

impl LeafletMap {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    /// Render the page. `entries` are drawn in the given order.
    pub fn render(
        &self,
        entries: &[CandidateEntry],
        reference: Coordinate,
        year: &str,
    ) -> Result<String, Error> {
        let page = MapPage {
            year,
            center_lat: reference.lat,
            center_lon: reference.lon,
            zoom: INITIAL_ZOOM,
            circle_radius: CIRCLE_RADIUS_PX,
            points: entries.iter().map(MapPoint::from).collect(),
        };
        Ok(page.render()?)
    }

    /// Render and write the page, returning the path written.
    pub fn export(
        &self,
        entries: &[CandidateEntry],
        reference: Coordinate,
        year: &str,
    ) -> Result<PathBuf, Error> {
        let html = self.render(entries, reference, year)?;
        fs::write(&self.output, html).map_err(|source| Error::Export {
            path: self.output.clone(),
            source,
        })?;
        info!(path = %self.output.display(), points = entries.len(), "map written");
        Ok(self.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(film: &str, km: f64, repeat: u32, lat: f64, lon: f64) -> CandidateEntry {
        CandidateEntry {
            distance_km: km,
            film: film.into(),
            repeat_count: repeat,
            coordinate: Coordinate::new(lat, lon),
        }
    }

    fn render(entries: &[CandidateEntry], reference: Coordinate, year: &str) -> String {
        LeafletMap::new("unused.html")
            .render(entries, reference, year)
            .unwrap()
    }

    #[test]
    fn test_attempts_color() {
        assert_eq!(attempts_color(1), "orange");
        assert_eq!(attempts_color(2), "red");
        assert_eq!(attempts_color(10), "red");
        assert_eq!(attempts_color(11), "darkred");
    }

    #[test]
    fn test_render_contains_layers_and_points() {
        let html = render(
            &[
                entry("Alpha", 12.5, 1, 48.85, 2.35),
                entry("Beta", 400.0, 4, 45.76, 4.83),
            ],
            Coordinate::new(49.5, 2.25),
            "2020",
        );
        assert!(html.contains("mark layer for 2020"));
        assert!(html.contains("color indicators of filming attempts"));
        assert!(html.contains("the route between the filming places"));
        assert!(html.contains("Film name: Alpha"));
        assert!(html.contains("12.50 km"));
        assert!(html.contains("Beta had 4 filming attempt(s)"));
        assert!(html.contains("data-color=\"red\""));
        assert!(html.contains("data-lat=\"49.5\""));
        assert!(html.contains("data-lon=\"2.25\""));
    }

    #[test]
    fn test_render_preserves_entry_order() {
        let html = render(
            &[
                entry("Far", 900.0, 1, 1.0, 1.0),
                entry("Near", 1.0, 1, 2.0, 2.0),
            ],
            Coordinate::new(0.0, 0.0),
            "2020",
        );
        let far = html.find("Film name: Far").unwrap();
        let near = html.find("Film name: Near").unwrap();
        assert!(far < near);
    }

    #[test]
    fn test_titles_are_escaped() {
        let html = render(
            &[entry("<script>alert(1)</script>", 1.0, 1, 0.0, 0.0)],
            Coordinate::new(0.0, 0.0),
            "2020",
        );
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(1)"));
    }

    #[test]
    fn test_year_is_rendered_verbatim() {
        let html = render(&[], Coordinate::new(0.0, 0.0), "__MAP_DATA__");
        assert!(html.contains("<title>Filming locations __MAP_DATA__</title>"));
        assert!(html.contains("data-marks-layer=\"mark layer for __MAP_DATA__\""));

        let html = render(&[], Coordinate::new(0.0, 0.0), "<b>1999</b>");
        assert!(html.contains("<title>Filming locations &lt;b&gt;1999"));
        assert!(!html.contains("<b>1999"));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Film_map.html");
        let map = LeafletMap::new(&path);

        let written = map
            .export(
                &[entry("Alpha", 1.0, 1, 0.0, 0.0)],
                Coordinate::new(0.0, 0.0),
                "2020",
            )
            .unwrap();
        assert_eq!(written, path);
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_export_empty_entries() {
        let dir = TempDir::new().unwrap();
        let map = LeafletMap::new(dir.path().join("empty.html"));
        assert!(map.export(&[], Coordinate::new(10.0, 20.0), "1999").is_ok());
    }

    #[test]
    fn test_export_to_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let map = LeafletMap::new(dir.path().join("no/such/dir/map.html"));
        let err = map
            .export(&[], Coordinate::new(0.0, 0.0), "2020")
            .unwrap_err();
        assert!(matches!(err, Error::Export { .. }));
    }
}
