//! Searchable index over a catalog snapshot.
//!
//! The matching strategy sits behind a narrow trait pair so the cache never
//! depends on a specific algorithm: a builder turns one catalog snapshot
//! into an index, the index answers ranked queries with a raw dissimilarity
//! per hit.

use super::bitap::{bitap_search, BitapConfig, Pattern};
use crate::steam::SteamApp;

/// One raw hit from an index query.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexMatch {
    /// Position of the entry in the catalog snapshot the index was built from.
    pub position: usize,
    /// Dissimilarity in [0, 1]; 0 is a perfect match.
    pub distance: f64,
}

pub trait SearchIndex: Send + Sync {
    /// Ranked approximate matches, best first, at most `limit`.
    fn query(&self, text: &str, limit: usize) -> Vec<IndexMatch>;

    /// Number of indexed entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait IndexBuilder: Send + Sync {
    fn build(&self, entries: &[SteamApp]) -> Box<dyn SearchIndex>;
}

/// Builds `BitapIndex`es with a fixed matcher configuration.
pub struct BitapIndexBuilder {
    config: BitapConfig,
}

impl BitapIndexBuilder {
    pub fn new(config: BitapConfig) -> Self {
        Self { config }
    }
}

impl Default for BitapIndexBuilder {
    fn default() -> Self {
        Self::new(BitapConfig::default())
    }
}

impl IndexBuilder for BitapIndexBuilder {
    fn build(&self, entries: &[SteamApp]) -> Box<dyn SearchIndex> {
        // Names are folded once at build time; queries fold per call.
        let names = entries.iter().map(|e| e.name.to_lowercase()).collect();
        Box::new(BitapIndex {
            names,
            config: self.config,
        })
    }
}

/// Linear-scan bitap index: every query runs the matcher over all names.
/// Plenty fast for a few hundred thousand short strings.
struct BitapIndex {
    names: Vec<String>,
    config: BitapConfig,
}

impl SearchIndex for BitapIndex {
    fn query(&self, text: &str, limit: usize) -> Vec<IndexMatch> {
        let Some(pattern) = Pattern::compile(text, &self.config) else {
            return Vec::new();
        };

        let mut matches: Vec<IndexMatch> = self
            .names
            .iter()
            .enumerate()
            .filter_map(|(position, name)| {
                bitap_search(name, &pattern, &self.config)
                    .map(|distance| IndexMatch { position, distance })
            })
            .collect();

        matches.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.position.cmp(&b.position))
        });
        matches.truncate(limit);
        matches
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}
