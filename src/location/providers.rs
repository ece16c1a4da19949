//! Geocoding providers: ArcGIS World Geocoder, OpenStreetMap Nominatim,
//! and a rate-limiting wrapper.

use super::types::{Coordinate, LocationError};
use serde::Deserialize;
use std::thread;
use std::time::{Duration, Instant};
use tracing::trace;

/// Something that can turn a place description into a coordinate.
///
/// `Ok(None)` means the provider answered but found nothing.
pub trait Geocoder {
    fn name(&self) -> &str;

    fn geocode(&mut self, query: &str) -> Result<Option<Coordinate>, LocationError>;
}

// ─── Rate limiting ──────────────────────────────────────────────

/// Enforces a minimum delay between consecutive calls to the inner provider.
///
/// The first call goes through immediately.
pub struct RateLimited<G> {
    inner: G,
    min_delay: Duration,
    last_call: Option<Instant>,
}

impl<G: Geocoder> RateLimited<G> {
    pub fn new(inner: G, min_delay: Duration) -> Self {
        Self {
            inner,
            min_delay,
            last_call: None,
        }
    }

    fn wait_turn(&mut self) {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                let pause = self.min_delay - elapsed;
                trace!(provider = self.inner.name(), ?pause, "rate limit");
                thread::sleep(pause);
            }
        }
        self.last_call = Some(Instant::now());
    }
}

impl<G: Geocoder> Geocoder for RateLimited<G> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn geocode(&mut self, query: &str) -> Result<Option<Coordinate>, LocationError> {
        self.wait_turn();
        self.inner.geocode(query)
    }
}

// ─── ArcGIS provider ────────────────────────────────────────────

const ARCGIS_URL: &str =
    "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer/findAddressCandidates";

#[derive(Deserialize, Debug)]
struct ArcGisResponse {
    #[serde(default)]
    candidates: Vec<ArcGisCandidate>,
    #[serde(default)]
    error: Option<ArcGisError>,
}

#[derive(Deserialize, Debug)]
struct ArcGisCandidate {
    location: ArcGisPoint,
}

#[derive(Deserialize, Debug)]
struct ArcGisPoint {
    x: f64,
    y: f64,
}

#[derive(Deserialize, Debug)]
struct ArcGisError {
    #[serde(default)]
    message: String,
}

fn arcgis_first(response: ArcGisResponse) -> Result<Option<Coordinate>, LocationError> {
    if let Some(err) = response.error {
        return Err(LocationError::InvalidResponse(err.message));
    }
    Ok(response
        .candidates
        .first()
        .map(|c| Coordinate::new(c.location.y, c.location.x)))
}

/// Single-line address search against the public ArcGIS World Geocoder.
pub struct ArcGisGeocoder {
    agent: ureq::Agent,
}

impl ArcGisGeocoder {
    pub fn new(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Geocoder for ArcGisGeocoder {
    fn name(&self) -> &str {
        "ArcGIS"
    }

    fn geocode(&mut self, query: &str) -> Result<Option<Coordinate>, LocationError> {
        let response = self
            .agent
            .get(ARCGIS_URL)
            .query("singleLine", query)
            .query("f", "json")
            .query("maxLocations", "1")
            .call()
            .map_err(|e| LocationError::Network(e.to_string()))?;

        let body: ArcGisResponse = response
            .into_json()
            .map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

        arcgis_first(body)
    }
}

// ─── Nominatim provider ─────────────────────────────────────────

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Deserialize, Debug, Clone)]
struct NominatimResult {
    lat: String,
    lon: String,
}

fn nominatim_first(results: &[NominatimResult]) -> Result<Option<Coordinate>, LocationError> {
    let Some(top) = results.first() else {
        return Ok(None);
    };
    let lat = top
        .lat
        .parse()
        .map_err(|_| LocationError::InvalidResponse(format!("bad latitude '{}'", top.lat)))?;
    let lon = top
        .lon
        .parse()
        .map_err(|_| LocationError::InvalidResponse(format!("bad longitude '{}'", top.lon)))?;
    Ok(Some(Coordinate::new(lat, lon)))
}

/// Free-form search against OpenStreetMap Nominatim.
pub struct NominatimGeocoder {
    agent: ureq::Agent,
}

impl NominatimGeocoder {
    pub fn new(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Geocoder for NominatimGeocoder {
    fn name(&self) -> &str {
        "Nominatim"
    }

    fn geocode(&mut self, query: &str) -> Result<Option<Coordinate>, LocationError> {
        let response = self
            .agent
            .get(NOMINATIM_URL)
            .query("q", query)
            .query("format", "json")
            .query("limit", "1")
            .call()
            .map_err(|e| LocationError::Network(e.to_string()))?;

        let results: Vec<NominatimResult> = response
            .into_json()
            .map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

        nominatim_first(&results)
    }
}
