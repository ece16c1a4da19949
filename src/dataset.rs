//! Line parser for the tab-separated filming-location dataset.
//!
//! A line looks like
//! `Title (2020) {Episode #1.1}\t\tParis, France\t(studio)`:
//! field 0 carries the title and year, field 1 the location, anything after
//! that is ignored.

use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::iter;

/// One parsed dataset line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmRecord {
    pub title: String,
    pub year: String,
    /// Trimmed location text; may be empty.
    pub location: String,
}

/// Stateful parser.
///
/// Lines whose first field has no `(year)` token inherit the year of the
/// most recent line that had one. Data files rely on this for continuation
/// lines, so it is kept rather than treated as a parse failure.
#[derive(Debug, Default)]
pub struct RecordParser {
    last_year: Option<String>,
}

impl RecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// The year carried over to lines without their own year token.
    pub fn last_year(&self) -> Option<&str> {
        self.last_year.as_deref()
    }

    /// Parse one line. `None` for lines without a tab, without a location
    /// field, or before any year has been seen.
    pub fn parse(&mut self, line: &str) -> Option<FilmRecord> {
        if !line.contains('\t') {
            return None;
        }

        let fields = split_tab_runs(line);
        let head = fields[0].trim();

        if let Some(year) = year_token(head) {
            self.last_year = Some(year);
        }
        let year = self.last_year.clone()?;
        let location = fields.get(1)?.trim().to_string();

        Some(FilmRecord {
            title: film_title(head).to_string(),
            year,
            location,
        })
    }
}

/// Split on runs of tabs. Leading and trailing tabs still produce an empty
/// first or last field.
fn split_tab_runs(line: &str) -> Vec<&str> {
    let pieces: Vec<&str> = line.split('\t').collect();
    let last = pieces.len() - 1;
    pieces
        .into_iter()
        .enumerate()
        .filter(|(i, p)| !p.is_empty() || *i == 0 || *i == last)
        .map(|(_, p)| p)
        .collect()
}

/// Everything before the first `(`, trimmed.
fn film_title(head: &str) -> &str {
    match head.find('(') {
        Some(idx) => head[..idx].trim(),
        None => head.trim(),
    }
}

/// Characters 1..=4 of the first word containing `(` but not `{`.
fn year_token(head: &str) -> Option<String> {
    head.split_whitespace()
        .find(|w| w.contains('(') && !w.contains('{'))
        .map(|w| w.chars().skip(1).take(4).collect())
}

/// Read lines as UTF-8, dropping undecodable bytes.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
pub fn lossy_lines<R: BufRead>(mut reader: R) -> impl Iterator<Item = io::Result<String>> {
    let mut buf = Vec::new();
    let mut pending = VecDeque::new();
    iter::from_fn(move || loop {
        if let Some(line) = pending.pop_front() {
            return Some(Ok(line));
        }
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
                pending.extend(buf.split(|&b| b == b'\r').map(decode_valid));
            }
            Err(e) => return Some(Err(e)),
        }
    })
}

/// Keep the well-formed UTF-8 runs of `bytes`, skip the rest.
fn decode_valid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
