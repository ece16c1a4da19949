use clap::Parser;
use film_map::aggregate::aggregate_file;
use film_map::config::{self, Settings};
use film_map::distance::DistanceMetric;
use film_map::location::{Coordinate, LocationResolver};
use film_map::map::LeafletMap;
use film_map::nearest::select_nearest;
use film_map::Error;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// film_map — the ten filming locations of a year closest to you
///
/// Reads a tab-separated locations list, geocodes every place shot in the
/// given year and writes an HTML map of the ten nearest films.
///
/// Examples:
///   filmmap 2015 49.83826 24.02324 locations.list
///   filmmap 2006 34.05 -118.24 locations.list --output la.html
#[derive(Parser)]
#[command(name = "filmmap", version, about, long_about = None)]
struct Cli {
    /// Year the films were made (e.g. 2015).
    year: String,

    /// Your latitude (-90 to 90).
    #[arg(allow_hyphen_values = true)]
    latitude: f64,

    /// Your longitude (-180 to 180).
    #[arg(allow_hyphen_values = true)]
    longitude: f64,

    /// Path to the locations dataset.
    dataset_path: PathBuf,

    /// Where to write the HTML map.
    #[arg(long, short = 'o', env = "FILMMAP_OUTPUT", default_value = config::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Minimum delay between primary geocoder calls, in milliseconds.
    #[arg(long, env = "FILMMAP_DELAY_MS", default_value_t = 1000)]
    delay_ms: u64,

    /// HTTP timeout for geocoding requests, in seconds.
    #[arg(long, env = "FILMMAP_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// User-Agent sent to the geocoding services.
    #[arg(long, env = "FILMMAP_USER_AGENT")]
    user_agent: Option<String>,

    /// Distance used for ranking: "geodesic" (WGS84) or "haversine" (sphere).
    #[arg(long, default_value = "geodesic", value_parser = parse_metric)]
    metric: DistanceMetric,

    /// Log progress to stderr.
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn parse_metric(s: &str) -> Result<DistanceMetric, String> {
    match s.to_lowercase().as_str() {
        "geodesic" | "ellipsoid" => Ok(DistanceMetric::Geodesic),
        "haversine" | "sphere" => Ok(DistanceMetric::Haversine),
        _ => Err(format!("Unknown metric '{}'. Use 'geodesic' or 'haversine'.", s)),
    }
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            output: self.output.clone(),
            primary_delay: Duration::from_millis(self.delay_ms),
            request_timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone().unwrap_or_else(config::default_user_agent),
            metric: self.metric,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "film_map=info" } else { "film_map=warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<PathBuf, Error> {
    let reference = Coordinate::new(cli.latitude, cli.longitude);
    if !reference.is_valid() {
        return Err(Error::InvalidCoordinate {
            lat: cli.latitude,
            lon: cli.longitude,
        });
    }

    let settings = cli.settings();
    let mut resolver = LocationResolver::standard(&settings);

    let (index, _stats) = aggregate_file(&cli.dataset_path, &cli.year, &mut resolver)?;
    let nearest = select_nearest(&index, reference, settings.metric);
    tracing::info!(
        metric = %settings.metric,
        candidates = index.len(),
        selected = nearest.len(),
        "nearest locations selected"
    );
    if nearest.is_empty() {
        tracing::warn!(year = %cli.year, "no resolvable filming locations for this year");
    }

    LeafletMap::new(settings.output).export(&nearest, reference, &cli.year)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(path) => eprintln!("  Map saved to {}", path.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_positional_with_negative_coords() {
        let cli = Cli::try_parse_from(["filmmap", "2006", "34.05", "-118.24", "locations.list"])
            .unwrap();
        assert_eq!(cli.year, "2006");
        assert_eq!(cli.longitude, -118.24);
        assert_eq!(cli.metric, DistanceMetric::Geodesic);
        let settings = cli.settings();
        assert_eq!(settings.primary_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!(parse_metric("Haversine"), Ok(DistanceMetric::Haversine));
        assert!(parse_metric("manhattan").is_err());
        assert_eq!(DistanceMetric::Haversine.to_string(), "haversine");
        assert_eq!(
            parse_metric(&DistanceMetric::Geodesic.to_string()),
            Ok(DistanceMetric::Geodesic)
        );
    }

    #[test]
    fn test_invalid_reference_rejected() {
        let cli = Cli::try_parse_from(["filmmap", "2006", "95", "0", "x.list"]).unwrap();
        assert!(matches!(run(&cli), Err(Error::InvalidCoordinate { .. })));
    }
}
