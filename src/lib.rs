//! film_map — find where the films of a given year were shot, closest first.
//!
//! Pipeline: dataset lines → [`aggregate`] (with [`location`] resolving each
//! unique place once) → [`nearest`] bounded top-10 selection → [`map`] export.

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod location;
pub mod map;
pub mod nearest;

pub use error::Error;
pub use location::Coordinate;
