//! Per-declaration marker registry.

use super::parser::{parse_line, ParseFailure};
use super::{known, Marker, MarkerPattern};
use crate::catalog::MarkerCatalog;
use crate::source::CommentLine;
use std::collections::BTreeMap;

/// All markers found on one declaration, indexed by identifier.
///
/// Built once per declaration and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerSet {
    markers: Vec<Marker>,
    index: BTreeMap<String, Vec<usize>>,
    failures: Vec<ParseFailure>,
}

impl MarkerSet {
    /// An empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            markers: Vec::new(),
            index: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    /// Parses every marker line of a doc comment.
    #[must_use]
    pub fn from_comments(lines: &[CommentLine], catalog: &MarkerCatalog) -> Self {
        let mut set = Self::empty();
        for line in lines {
            match parse_line(line, catalog) {
                Some(Ok(marker)) => set.insert(marker),
                Some(Err(failure)) => set.failures.push(failure),
                None => {}
            }
        }
        set
    }

    /// Builds a set from already parsed markers.
    #[must_use]
    pub fn from_markers(markers: impl IntoIterator<Item = Marker>) -> Self {
        let mut set = Self::empty();
        for marker in markers {
            set.insert(marker);
        }
        set
    }

    fn insert(&mut self, marker: Marker) {
        self.index
            .entry(marker.identifier.clone())
            .or_default()
            .push(self.markers.len());
        self.markers.push(marker);
    }

    /// Returns true if at least one marker has this identifier.
    #[must_use]
    pub fn has(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// Returns true if any of the identifiers is present.
    #[must_use]
    pub fn has_any(&self, identifiers: &[&str]) -> bool {
        identifiers.iter().any(|id| self.has(id))
    }

    /// Returns every marker with this identifier, in source order.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Vec<&Marker> {
        self.index
            .get(identifier)
            .map(|indices| indices.iter().map(|&i| &self.markers[i]).collect())
            .unwrap_or_default()
    }

    /// Returns the first marker with this identifier.
    ///
    /// For markers expected at most once. Repeated occurrences are not
    /// resolved here; they are reported by the uniqueness check.
    #[must_use]
    pub fn get_single(&self, identifier: &str) -> Option<&Marker> {
        self.index
            .get(identifier)
            .and_then(|indices| indices.first())
            .map(|&i| &self.markers[i])
    }

    /// Returns the first marker among several spellings, in the order given.
    #[must_use]
    pub fn first_of(&self, identifiers: &[&str]) -> Option<&Marker> {
        identifiers.iter().find_map(|id| self.get_single(id))
    }

    /// Carries any spelling of the required marker.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.has_any(known::REQUIRED_SPELLINGS)
    }

    /// Carries any spelling of the optional marker.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.has_any(known::OPTIONAL_SPELLINGS)
    }

    /// Carries any spelling of the default marker.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.has_any(known::DEFAULT_SPELLINGS)
    }

    /// Returns the markers satisfying a configuration pattern.
    #[must_use]
    pub fn matching(&self, pattern: &MarkerPattern) -> Vec<&Marker> {
        self.markers.iter().filter(|m| pattern.matches(m)).collect()
    }

    /// Returns true if any marker satisfies the pattern.
    #[must_use]
    pub fn has_matching(&self, pattern: &MarkerPattern) -> bool {
        self.markers.iter().any(|m| pattern.matches(m))
    }

    /// Returns a new set holding the markers of both sets.
    ///
    /// `self` comes first, so source order of the usage site is kept.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut set = self.clone();
        for marker in &other.markers {
            set.insert(marker.clone());
        }
        set.failures.extend(other.failures.iter().cloned());
        set
    }

    /// Iterates over all markers in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    /// Lines that started with `+` but could not be parsed.
    #[must_use]
    pub fn failures(&self) -> &[ParseFailure] {
        &self.failures
    }

    /// Number of parsed markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns true when no marker was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl<'a> IntoIterator for &'a MarkerSet {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}
