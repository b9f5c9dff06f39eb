use crate::algorithms::mass::{find_matches, MatchOptions};
use crate::core::config::FinderConfig;

/// Source of raw candidate offsets for a reference subsequence.
///
/// Implementations return start offsets into `series`, ordered by ascending
/// dissimilarity. The list may be empty and may contain offsets whose window
/// runs past the end of the series; the verifier drops those.
pub trait SimilaritySearch: Send + Sync {
    fn search(&self, reference: &[f64], series: &[f64]) -> Vec<usize>;
}

impl<F> SimilaritySearch for F
where
    F: Fn(&[f64], &[f64]) -> Vec<usize> + Send + Sync,
{
    fn search(&self, reference: &[f64], series: &[f64]) -> Vec<usize> {
        self(reference, series)
    }
}

/// MASS-based search: z-normalized distance profile, default stumpy-style
/// threshold, and exclusion-zone match extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MassSearch {
    pub options: MatchOptions,
}

impl MassSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &FinderConfig) -> Self {
        Self {
            options: MatchOptions {
                max_distance: config.max_distance,
                exclusion_zone: config.exclusion_zone,
                max_matches: config.max_matches,
                dot_product: config.dot_product,
            },
        }
    }
}

impl SimilaritySearch for MassSearch {
    fn search(&self, reference: &[f64], series: &[f64]) -> Vec<usize> {
        find_matches(reference, series, &self.options)
            .into_iter()
            .map(|m| m.index)
            .collect()
    }
}

/// Returns the same offsets for every query.
///
/// Useful for replaying matches computed elsewhere, and as a deterministic
/// stand-in in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedOffsets {
    pub offsets: Vec<usize>,
}

impl FixedOffsets {
    pub fn new(offsets: Vec<usize>) -> Self {
        Self { offsets }
    }
}

impl SimilaritySearch for FixedOffsets {
    fn search(&self, _reference: &[f64], _series: &[f64]) -> Vec<usize> {
        self.offsets.clone()
    }
}
