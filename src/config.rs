//! Runtime settings shared by the geocoders, the selector and the exporter.

use crate::distance::DistanceMetric;
use std::path::PathBuf;
use std::time::Duration;

/// Minimum spacing between calls to the primary geocoder.
pub const DEFAULT_PRIMARY_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_OUTPUT: &str = "Film_map.html";

pub fn default_user_agent() -> String {
    format!("film_map/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Where the HTML map is written.
    pub output: PathBuf,
    pub primary_delay: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Metric used to rank candidates against the reference point.
    pub metric: DistanceMetric,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            primary_delay: DEFAULT_PRIMARY_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: default_user_agent(),
            metric: DistanceMetric::default(),
        }
    }
}

impl Settings {
    /// Build an HTTP agent carrying the configured user agent and timeout.
    pub fn http_agent(&self) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .user_agent(&self.user_agent)
            .timeout(self.request_timeout)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.output, PathBuf::from("Film_map.html"));
        assert_eq!(s.primary_delay, Duration::from_secs(1));
        assert_eq!(s.metric, DistanceMetric::Geodesic);
        assert!(s.user_agent.starts_with("film_map/"));
    }
}
