//! Bounded nearest-K selection over every (location, film) pair.

use crate::aggregate::LocationIndex;
use crate::distance::DistanceMetric;
use crate::location::Coordinate;

/// How many entries end up on the map.
pub const NEAREST_LIMIT: usize = 10;

/// One film at one location, measured from the reference point.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateEntry {
    pub distance_km: f64,
    pub film: String,
    pub repeat_count: u32,
    pub coordinate: Coordinate,
}

/// Holds the `capacity` closest entries offered so far.
///
/// When full, a closer entry evicts the current farthest one and is
/// appended at the end; entries keep their arrival order otherwise.
#[derive(Debug, Clone)]
pub struct NearestSet {
    entries: Vec<CandidateEntry>,
    capacity: usize,
}

impl Default for NearestSet {
    fn default() -> Self {
        Self::with_capacity(NEAREST_LIMIT)
    }
}

impl NearestSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Offer a candidate. Returns whether it was kept.
    pub fn offer(&mut self, entry: CandidateEntry) -> bool {
        if self.entries.len() < self.capacity {
            self.entries.push(entry);
            return true;
        }

        let Some(farthest) = self.farthest_index() else {
            return false;
        };
        if entry.distance_km < self.entries[farthest].distance_km {
            self.entries.remove(farthest);
            self.entries.push(entry);
            true
        } else {
            false
        }
    }

    /// First entry holding the maximum distance.
    fn farthest_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, e) in self.entries.iter().enumerate() {
            match best {
                Some(b) if self.entries[b].distance_km >= e.distance_km => {}
                _ => best = Some(i),
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CandidateEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<CandidateEntry> {
        self.entries
    }
}

/// Pick the [`NEAREST_LIMIT`] (location, film) pairs closest to `reference`.
///
/// The result is in selection order, not sorted by distance.
pub fn select_nearest(
    index: &LocationIndex,
    reference: Coordinate,
    metric: DistanceMetric,
) -> Vec<CandidateEntry> {
    let mut set = NearestSet::default();
    for record in index.values() {
        let distance_km = metric.km(record.coordinate, reference);
        for film in &record.films {
            set.offer(CandidateEntry {
                distance_km,
                film: film.clone(),
                repeat_count: record.repeat_count,
                coordinate: record.coordinate,
            });
        }
    }
    set.into_entries()
}
