//! One-pass aggregation of dataset lines into a per-location film index.

use crate::dataset::{lossy_lines, RecordParser};
use crate::error::Error;
use crate::location::{Coordinate, LocationResolver};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Everything known about one resolved location.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub coordinate: Coordinate,
    pub films: BTreeSet<String>,
    /// Starts at 1; bumped each time an already-listed film shows up again.
    pub repeat_count: u32,
}

impl LocationRecord {
    fn new(coordinate: Coordinate, film: String) -> Self {
        Self {
            coordinate,
            films: BTreeSet::from([film]),
            repeat_count: 1,
        }
    }

    fn add_film(&mut self, film: String) {
        if self.films.contains(&film) {
            self.repeat_count += 1;
        } else {
            self.films.insert(film);
        }
    }
}

/// Resolved locations keyed by their exact (trimmed) dataset text.
pub type LocationIndex = BTreeMap<String, LocationRecord>;

/// Counters for a single aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub lines: usize,
    pub malformed: usize,
    pub other_year: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

/// Builds a [`LocationIndex`] for one target year.
pub struct Aggregator<'r> {
    year: String,
    resolver: &'r mut LocationResolver,
    parser: RecordParser,
    index: LocationIndex,
    failed: HashSet<String>,
    stats: AggregateStats,
}

impl<'r> Aggregator<'r> {
    pub fn new(year: impl Into<String>, resolver: &'r mut LocationResolver) -> Self {
        Self {
            year: year.into(),
            resolver,
            parser: RecordParser::new(),
            index: LocationIndex::new(),
            failed: HashSet::new(),
            stats: AggregateStats::default(),
        }
    }

    /// Feed a single raw line.
    pub fn push_line(&mut self, line: &str) {
        self.stats.lines += 1;

        let Some(record) = self.parser.parse(line) else {
            self.stats.malformed += 1;
            return;
        };
        if record.year != self.year {
            self.stats.other_year += 1;
            return;
        }

        if let Some(existing) = self.index.get_mut(&record.location) {
            existing.add_film(record.title);
            return;
        }
        if self.failed.contains(&record.location) {
            return;
        }

        match self.resolver.resolve(&record.location) {
            Some(coordinate) => {
                self.stats.resolved += 1;
                self.index
                    .insert(record.location, LocationRecord::new(coordinate, record.title));
            }
            None => {
                self.stats.unresolved += 1;
                debug!(location = %record.location, "dropping unresolved location");
                self.failed.insert(record.location);
            }
        }
    }

    /// Stream every line of `reader` through the aggregator.
    pub fn consume<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        for line in lossy_lines(reader) {
            self.push_line(&line?);
        }
        Ok(())
    }

    pub fn finish(self) -> (LocationIndex, AggregateStats) {
        let s = self.stats;
        info!(
            year = %self.year,
            lines = s.lines,
            malformed = s.malformed,
            other_year = s.other_year,
            resolved = s.resolved,
            unresolved = s.unresolved,
            "aggregation finished"
        );
        (self.index, s)
    }
}

/// Aggregate an in-memory or streamed dataset.
pub fn aggregate_reader<R: BufRead>(
    reader: R,
    year: &str,
    resolver: &mut LocationResolver,
) -> io::Result<LocationIndex> {
    let mut agg = Aggregator::new(year, resolver);
    agg.consume(reader)?;
    Ok(agg.finish().0)
}

/// Aggregate a dataset file. A missing or unreadable file is fatal.
pub fn aggregate_file(
    path: &Path,
    year: &str,
    resolver: &mut LocationResolver,
) -> Result<(LocationIndex, AggregateStats), Error> {
    let dataset_err = |source| Error::Dataset {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(dataset_err)?;
    let mut agg = Aggregator::new(year, resolver);
    agg.consume(BufReader::new(file)).map_err(dataset_err)?;
    Ok(agg.finish())
}
