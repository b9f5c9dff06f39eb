//! One detection pass over a dataset: generate and verify candidates for
//! every pattern of a channel, then resolve overlaps for that channel.

use std::collections::BTreeMap;

use crate::algorithms::resolve::{apply_order, resolve_overlaps};
use crate::algorithms::search::SimilaritySearch;
use crate::algorithms::verify::{CandidateVerifier, ReferenceProfile};
use crate::core::config::ResultOrder;
use crate::core::error::{Error, Result};
use crate::core::motif::{Candidate, MotifRecord, MotifResults, SkipReason, SkippedPattern};
use crate::core::pattern::{PatternLibrary, PatternSpec};
use crate::core::series::{ChannelSeries, Dataset};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Verified candidates for a single pattern.
///
/// Fails with [`Error::InvalidRange`] if the pattern does not fit in the
/// series and with [`Error::DegenerateReference`] if its reference cannot be
/// used for relative comparisons.
pub fn pattern_candidates<S: SimilaritySearch + ?Sized>(
    series: &ChannelSeries,
    spec: &PatternSpec,
    color: usize,
    search: &S,
) -> Result<Vec<Candidate>> {
    spec.check_bounds(series.len())?;
    let values = series.values();
    let reference = &values[spec.range()];
    let profile = ReferenceProfile::new(reference, spec.threshold, &spec.job)?;

    let offsets = search.search(reference, values);
    Ok(CandidateVerifier::new(values, profile, &spec.job, color).verify_all(&offsets))
}

/// Resolved motifs and skipped patterns of one channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelOutcome {
    pub records: Vec<MotifRecord>,
    pub skipped: Vec<SkippedPattern>,
}

fn skip_reason(err: &Error, series_len: usize) -> Option<SkipReason> {
    match err {
        Error::DegenerateReference {
            statistic, value, ..
        } => Some(SkipReason::DegenerateReference {
            statistic: (*statistic).to_owned(),
            value: *value,
        }),
        Error::InvalidRange { .. } => Some(SkipReason::InvalidRange { len: series_len }),
        _ => None,
    }
}

/// Run generate-and-verify for every pattern of `channel`, then resolve.
///
/// Pattern-level failures are logged and reported as skipped patterns; they
/// never abort the channel. Candidates are concatenated in registration
/// order before resolution, so the outcome does not depend on scheduling.
pub fn detect_channel<S: SimilaritySearch + ?Sized>(
    channel: &str,
    series: &ChannelSeries,
    library: &PatternLibrary,
    search: &S,
    order: ResultOrder,
) -> ChannelOutcome {
    let entries: Vec<(&PatternSpec, usize)> = library.entries_for(channel).collect();

    #[cfg(feature = "parallel")]
    let per_pattern: Vec<Result<Vec<Candidate>>> = entries
        .par_iter()
        .map(|&(spec, color)| pattern_candidates(series, spec, color, search))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let per_pattern: Vec<Result<Vec<Candidate>>> = entries
        .iter()
        .map(|&(spec, color)| pattern_candidates(series, spec, color, search))
        .collect();

    let mut candidates = Vec::new();
    let mut skipped = Vec::new();
    for (pattern_index, ((spec, _), outcome)) in entries.iter().zip(per_pattern).enumerate() {
        match outcome {
            Ok(found) => candidates.extend(found),
            Err(err) => {
                log::warn!("Skipping pattern {pattern_index} ('{}') on channel {channel}: {err}", spec.job);
                if let Some(reason) = skip_reason(&err, series.len()) {
                    skipped.push(SkippedPattern {
                        channel: channel.to_owned(),
                        pattern_index,
                        job: spec.job.clone(),
                        reason,
                    });
                }
            }
        }
    }

    let n_candidates = candidates.len();
    let mut records = resolve_overlaps(candidates);
    apply_order(&mut records, order);
    log::debug!(
        "Channel {channel}: {} patterns, {n_candidates} candidates, {} motifs",
        entries.len(),
        records.len()
    );

    ChannelOutcome { records, skipped }
}

/// Run a full detection pass over every channel that has patterns.
///
/// A channel named by the library but absent from the dataset aborts the
/// run with [`Error::UnknownChannel`] before any work is done.
pub fn detect<S: SimilaritySearch + ?Sized>(
    dataset: &Dataset,
    library: &PatternLibrary,
    search: &S,
    order: ResultOrder,
) -> Result<MotifResults> {
    let channels: Vec<(&str, &ChannelSeries)> = library
        .channels()
        .map(|name| {
            dataset
                .get(name)
                .map(|series| (name, series))
                .ok_or_else(|| Error::UnknownChannel(name.to_owned()))
        })
        .collect::<Result<_>>()?;

    #[cfg(feature = "parallel")]
    let outcomes: Vec<ChannelOutcome> = channels
        .par_iter()
        .map(|&(name, series)| detect_channel(name, series, library, search, order))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<ChannelOutcome> = channels
        .iter()
        .map(|&(name, series)| detect_channel(name, series, library, search, order))
        .collect();

    let mut results = MotifResults {
        channels: BTreeMap::new(),
        color_map: library.color_map().clone(),
        skipped: Vec::new(),
    };
    for ((name, _), outcome) in channels.into_iter().zip(outcomes) {
        results.channels.insert(name.to_owned(), outcome.records);
        results.skipped.extend(outcome.skipped);
    }
    Ok(results)
}
