use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors of a run. Per-line and per-location problems never get here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read dataset {}: {source}", path.display())]
    Dataset {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write map {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot render map: {0}")]
    Render(#[from] askama::Error),

    #[error(
        "invalid reference point: latitude must be within -90..90 \
         and longitude within -180..180 (got {lat}, {lon})"
    )]
    InvalidCoordinate { lat: f64, lon: f64 },
}
