pub mod algorithms;
pub mod core;

pub use crate::algorithms::mass::{find_matches, mass, mass_with, Match, MatchOptions};
pub use crate::algorithms::pipeline::{detect, detect_channel, ChannelOutcome};
pub use crate::algorithms::resolve::resolve_overlaps;
pub use crate::algorithms::search::{FixedOffsets, MassSearch, SimilaritySearch};
pub use crate::algorithms::verify::{CandidateVerifier, ReferenceProfile, Verdict};
pub use crate::core::config::{DotProductMethod, FinderConfig, ResultOrder};
pub use crate::core::error::{Error, Result};
pub use crate::core::motif::{Candidate, MotifRecord, MotifResults, SkipReason, SkippedPattern};
pub use crate::core::pattern::{ColorMap, PatternLibrary, PatternSpec};
pub use crate::core::series::{ChannelSeries, Dataset};

/// High-level facade: a dataset, the patterns registered against it, and
/// the similarity search used to propose candidates.
///
/// # Examples
///
/// ```
/// use job_motifs::{ChannelSeries, Dataset, FixedOffsets, FinderConfig, MotifFinder};
///
/// let cycle: Vec<f64> = (0..8).map(|i| 100.0 + 10.0 * (i as f64)).collect();
/// let series: Vec<f64> = cycle.iter().chain(&cycle).copied().collect();
/// let dataset = Dataset::new().with_channel("P1", ChannelSeries::new(series));
///
/// let mut finder =
///     MotifFinder::with_search(dataset, FixedOffsets::new(vec![0, 8]), FinderConfig::new());
/// finder.add_pattern("P1", 0, 8, 0.05, "press").unwrap();
///
/// let results = finder.find_motifs().unwrap();
/// assert_eq!(results.channel("P1").len(), 2);
/// ```
pub struct MotifFinder<S: SimilaritySearch = MassSearch> {
    dataset: Dataset,
    library: PatternLibrary,
    search: S,
    config: FinderConfig,
}

impl MotifFinder<MassSearch> {
    /// Create a finder using MASS with default settings.
    pub fn new(dataset: Dataset) -> Self {
        Self::with_config(dataset, FinderConfig::new())
    }

    /// Create a finder using MASS configured from `config`.
    pub fn with_config(dataset: Dataset, config: FinderConfig) -> Self {
        let search = MassSearch::from_config(&config);
        Self::with_search(dataset, search, config)
    }
}

impl<S: SimilaritySearch> MotifFinder<S> {
    /// Create a finder with a custom similarity search.
    pub fn with_search(dataset: Dataset, search: S, config: FinderConfig) -> Self {
        Self {
            dataset,
            library: PatternLibrary::new(),
            search,
            config,
        }
    }

    /// Register the reference `[start, end)` of `channel` for `job`.
    ///
    /// Bounds are checked against the channel when the dataset has it. A
    /// pattern on an unknown channel is accepted here and makes
    /// [`MotifFinder::find_motifs`] fail. Returns the job's color index.
    pub fn add_pattern(
        &mut self,
        channel: &str,
        start: usize,
        end: usize,
        threshold: f64,
        job: &str,
    ) -> Result<usize> {
        match self.dataset.get(channel) {
            Some(series) => {
                self.library
                    .register_within(channel, start, end, threshold, job, series.len())
            }
            None => self.library.register(channel, start, end, threshold, job),
        }
    }

    /// Register every pattern of a JSON array of `{channel, start, end, threshold, job}`.
    ///
    /// Stops at the first rejected registration; earlier ones stay registered.
    pub fn add_patterns_json(&mut self, json: &str) -> Result<usize> {
        let specs: Vec<PatternSpec> = serde_json::from_str(json)?;
        let count = specs.len();
        for spec in specs {
            self.add_pattern(&spec.channel, spec.start, spec.end, spec.threshold, &spec.job)?;
        }
        Ok(count)
    }

    /// Run one detection pass over every channel with registered patterns.
    pub fn find_motifs(&self) -> Result<MotifResults> {
        detect(&self.dataset, &self.library, &self.search, self.config.order)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    pub fn color_map(&self) -> &ColorMap {
        self.library.color_map()
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }
}
