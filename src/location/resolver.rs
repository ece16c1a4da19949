//! Location resolver — walks an ordered chain of geocoders.
//!
//! Flow:  primary (rate-limited ArcGIS) → fallback (Nominatim) → failure.
//! A provider error ends the walk immediately; it never hands over to the
//! next provider.

use super::providers::{ArcGisGeocoder, Geocoder, NominatimGeocoder, RateLimited};
use super::types::{Coordinate, LocationError};
use crate::config::Settings;
use std::time::Duration;
use tracing::debug;

/// The location resolver with its provider chain.
pub struct LocationResolver {
    providers: Vec<Box<dyn Geocoder>>,
}

impl LocationResolver {
    /// Resolver over an explicit chain, tried front to back.
    pub fn with_providers(providers: Vec<Box<dyn Geocoder>>) -> Self {
        Self { providers }
    }

    /// `primary` behind a minimum `delay` between calls, then `fallback`
    /// with no delay of its own.
    pub fn primary_with_fallback<P, F>(primary: P, fallback: F, delay: Duration) -> Self
    where
        P: Geocoder + 'static,
        F: Geocoder + 'static,
    {
        Self::with_providers(vec![
            Box::new(RateLimited::new(primary, delay)),
            Box::new(fallback),
        ])
    }

    /// ArcGIS (rate-limited) with Nominatim as fallback.
    pub fn standard(settings: &Settings) -> Self {
        let agent = settings.http_agent();
        Self::primary_with_fallback(
            ArcGisGeocoder::new(agent.clone()),
            NominatimGeocoder::new(agent),
            settings.primary_delay,
        )
    }

    /// Resolve a location, collapsing every failure into `None`.
    pub fn resolve(&mut self, query: &str) -> Option<Coordinate> {
        match self.try_resolve(query) {
            Ok(found) => {
                if found.is_none() {
                    debug!(query, "no provider knows this location");
                }
                found
            }
            Err(e) => {
                debug!(query, error = %e, "geocoding failed");
                None
            }
        }
    }

    /// Resolve a location, keeping the reason for failure.
    pub fn try_resolve(&mut self, query: &str) -> Result<Option<Coordinate>, LocationError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LocationError::EmptyQuery);
        }

        for provider in self.providers.iter_mut() {
            if let Some(coord) = provider.geocode(query)? {
                debug!(query, provider = provider.name(), %coord, "resolved");
                return Ok(Some(coord));
            }
        }
        Ok(None)
    }
}
