//! Location subsystem: turns free-text place names into coordinates.
//!
//! Providers (ArcGIS, Nominatim) implement [`Geocoder`]; the
//! [`LocationResolver`] tries them in order.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{ArcGisGeocoder, Geocoder, NominatimGeocoder, RateLimited};
pub use resolver::LocationResolver;
pub use types::{Coordinate, LocationError};
