//! Statistical verification of raw candidate offsets.
//!
//! Every raw offset goes through three gates:
//! 1. the window must fit inside the series,
//! 2. the pre-check segment (first quarter of the window) must match the
//!    reference's first quarter in mean and standard deviation,
//! 3. the whole window must match the whole reference the same way.
//!
//! "Match" means the relative deviation `|candidate - reference| / |reference|`
//! is at most the pattern threshold. Accepted windows are scored by their
//! energy, the sum of squared deviations from the window mean.

use crate::core::error::{Error, Result};
use crate::core::motif::Candidate;
use crate::core::stats::SegmentStats;

/// Relative deviation of `candidate` from `reference`.
#[inline]
fn relative_deviation(candidate: f64, reference: f64) -> f64 {
    (candidate - reference).abs() / reference.abs()
}

fn check_denominator(job: &str, statistic: &'static str, value: f64) -> Result<()> {
    if value == 0.0 || !value.is_finite() {
        return Err(Error::DegenerateReference {
            job: job.to_owned(),
            statistic,
            value,
        });
    }
    Ok(())
}

/// Precomputed statistics of a reference pattern.
///
/// The pre-check segment has `floor(len / 4)` samples. With an empty segment
/// the pre-check is skipped, and with a single sample only its mean is
/// compared, since a one-sample standard deviation is undefined. The full
/// check always compares both, so a pattern needs at least two samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceProfile {
    pub len: usize,
    pub quarter: usize,
    pub pre: SegmentStats,
    pub full: SegmentStats,
    pub threshold: f64,
}

impl ReferenceProfile {
    /// Build the profile of `reference`.
    ///
    /// Fails with [`Error::DegenerateReference`] if a statistic that will be
    /// used as a denominator is zero or not finite (including the undefined
    /// std of a one-sample reference), and with [`Error::InvalidRange`] for
    /// an empty reference.
    pub fn new(reference: &[f64], threshold: f64, job: &str) -> Result<Self> {
        let len = reference.len();
        if len == 0 {
            return Err(Error::invalid_range(0, 0, None));
        }
        let quarter = len / 4;
        let pre = SegmentStats::compute(&reference[..quarter]);
        let full = SegmentStats::compute(reference);

        if quarter >= 1 {
            check_denominator(job, "pre-check mean", pre.mean)?;
        }
        if quarter >= 2 {
            check_denominator(job, "pre-check std", pre.std)?;
        }
        check_denominator(job, "mean", full.mean)?;
        check_denominator(job, "std", full.std)?;

        Ok(Self {
            len,
            quarter,
            pre,
            full,
            threshold,
        })
    }

    fn matches(&self, reference: &SegmentStats, window: &SegmentStats) -> bool {
        if relative_deviation(window.mean, reference.mean) > self.threshold {
            return false;
        }
        reference.len < 2 || relative_deviation(window.std, reference.std) <= self.threshold
    }

    /// Early-reject test on the first `quarter` samples of `window`.
    pub fn pre_check(&self, window: &[f64]) -> bool {
        if self.quarter == 0 {
            return true;
        }
        self.matches(&self.pre, &SegmentStats::compute(&window[..self.quarter]))
    }

    /// Full-window test. Returns the window's statistics when it matches.
    pub fn full_check(&self, window: &[f64]) -> Option<SegmentStats> {
        let stats = SegmentStats::compute(window);
        self.matches(&self.full, &stats).then_some(stats)
    }
}

/// Outcome of verifying one raw offset.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted(Candidate),
    /// The window would run past the end of the series.
    Truncated,
    /// Rejected by the pre-check segment.
    EarlyReject,
    /// Passed the pre-check but not the full-window test.
    Rejected,
}

/// Verifies raw offsets for one pattern against one channel series.
#[derive(Debug, Clone)]
pub struct CandidateVerifier<'a> {
    series: &'a [f64],
    reference: ReferenceProfile,
    job: &'a str,
    color: usize,
}

impl<'a> CandidateVerifier<'a> {
    pub fn new(series: &'a [f64], reference: ReferenceProfile, job: &'a str, color: usize) -> Self {
        Self {
            series,
            reference,
            job,
            color,
        }
    }

    pub fn reference(&self) -> &ReferenceProfile {
        &self.reference
    }

    /// Run all gates for the window starting at `offset`.
    pub fn evaluate(&self, offset: usize) -> Verdict {
        let len = self.reference.len;
        let Some(window) = offset
            .checked_add(len)
            .and_then(|end| self.series.get(offset..end))
        else {
            return Verdict::Truncated;
        };

        if !self.reference.pre_check(window) {
            return Verdict::EarlyReject;
        }
        match self.reference.full_check(window) {
            Some(stats) => Verdict::Accepted(Candidate {
                start: offset,
                len,
                energy: stats.energy,
                job: self.job.to_owned(),
                color: self.color,
            }),
            None => Verdict::Rejected,
        }
    }

    /// Verify `offsets` in order, keeping accepted candidates.
    pub fn verify_all(&self, offsets: &[usize]) -> Vec<Candidate> {
        let mut accepted = Vec::new();
        let (mut truncated, mut early, mut rejected) = (0usize, 0usize, 0usize);
        for &offset in offsets {
            match self.evaluate(offset) {
                Verdict::Accepted(c) => accepted.push(c),
                Verdict::Truncated => truncated += 1,
                Verdict::EarlyReject => early += 1,
                Verdict::Rejected => rejected += 1,
            }
        }
        log::trace!(
            "job '{}': {} raw offsets, {} accepted, {truncated} truncated, {early} early rejects, {rejected} rejected",
            self.job,
            offsets.len(),
            accepted.len(),
        );
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn waveform(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| 1000.0 + 200.0 * (i as f64 * 0.3).sin() + i as f64)
            .collect()
    }

    #[test]
    fn test_exact_window_accepted_with_energy() {
        let reference = waveform(40);
        let mut series = vec![900.0; 10];
        series.extend_from_slice(&reference);

        let profile = ReferenceProfile::new(&reference, 0.01, "press").unwrap();
        assert_eq!(profile.quarter, 10);
        let verifier = CandidateVerifier::new(&series, profile, "press", 3);

        match verifier.evaluate(10) {
            Verdict::Accepted(c) => {
                assert_eq!((c.start, c.len, c.color), (10, 40, 3));
                assert_eq!(c.job, "press");
                assert_relative_eq!(c.energy, SegmentStats::compute(&reference).energy);
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_window() {
        let reference = waveform(40);
        let series = waveform(60);
        let profile = ReferenceProfile::new(&reference, 1.0, "press").unwrap();
        let verifier = CandidateVerifier::new(&series, profile, "press", 0);
        assert!(matches!(verifier.evaluate(20), Verdict::Accepted(_)));
        assert_eq!(verifier.evaluate(21), Verdict::Truncated);
        assert_eq!(verifier.evaluate(usize::MAX), Verdict::Truncated);
    }

    #[test]
    fn test_early_reject_on_startup_phase() {
        let reference = waveform(40);
        // Startup phase boosted by 50%.
        let mut shifted = reference.clone();
        for v in shifted.iter_mut().take(10) {
            *v *= 1.5;
        }
        let profile = ReferenceProfile::new(&reference, 0.05, "press").unwrap();
        let verifier = CandidateVerifier::new(&shifted, profile, "press", 0);
        assert_eq!(verifier.evaluate(0), Verdict::EarlyReject);
    }

    #[test]
    fn test_full_check_reject_after_pre_check_pass() {
        let reference = waveform(40);
        let mut tail_changed = reference.clone();
        for v in tail_changed.iter_mut().skip(10) {
            *v *= 2.0;
        }
        let profile = ReferenceProfile::new(&reference, 0.05, "press").unwrap();
        let verifier = CandidateVerifier::new(&tail_changed, profile, "press", 0);
        assert_eq!(verifier.evaluate(0), Verdict::Rejected);
    }

    #[test]
    fn test_threshold_boundary() {
        // Window mean is exactly 10% above the reference mean; std is equal.
        let reference = vec![10.0, 20.0, 10.0, 20.0, 10.0, 20.0, 10.0, 20.0];
        let window: Vec<f64> = reference.iter().map(|v| v + 1.5).collect();
        let at = ReferenceProfile::new(&reference, 0.1 + 1e-12, "j").unwrap();
        let below = ReferenceProfile::new(&reference, 0.09, "j").unwrap();
        assert!(matches!(
            CandidateVerifier::new(&window, at, "j", 0).evaluate(0),
            Verdict::Accepted(_)
        ));
        assert!(!matches!(
            CandidateVerifier::new(&window, below, "j", 0).evaluate(0),
            Verdict::Accepted(_)
        ));
    }

    #[test]
    fn test_degenerate_references() {
        let flat = vec![5.0; 16];
        assert!(matches!(
            ReferenceProfile::new(&flat, 0.1, "idle"),
            Err(Error::DegenerateReference {
                statistic: "pre-check std",
                ..
            })
        ));

        let mut zero_start = waveform(16);
        zero_start[..4].iter_mut().for_each(|v| *v = 0.0);
        assert!(matches!(
            ReferenceProfile::new(&zero_start, 0.1, "idle"),
            Err(Error::DegenerateReference {
                statistic: "pre-check mean",
                ..
            })
        ));

        // A flat tail is fine while the startup varies.
        let mut flat_tail = vec![7.0; 16];
        flat_tail[0] = 9.0;
        flat_tail[1] = 3.0;
        assert!(ReferenceProfile::new(&flat_tail, 0.1, "idle").is_ok());
    }

    #[test]
    fn test_single_sample_reference_is_degenerate() {
        match ReferenceProfile::new(&[100.0], 0.01, "spike") {
            Err(Error::DegenerateReference {
                statistic, value, ..
            }) => {
                assert_eq!(statistic, "std");
                assert!(value.is_nan());
            }
            other => panic!("expected a degenerate reference, got {other:?}"),
        }
        assert!(ReferenceProfile::new(&[100.0, 100.5], 0.01, "spike").is_ok());
    }

    #[test]
    fn test_short_reference_skips_pre_check() {
        // len 3 -> quarter 0: only the full-window test applies.
        let reference = vec![1.0, 2.0, 3.0];
        let profile = ReferenceProfile::new(&reference, 0.01, "tiny").unwrap();
        assert_eq!(profile.quarter, 0);
        assert!(profile.pre_check(&[100.0, 2.0, 3.0]));

        // len 5 -> quarter 1: pre-check compares the first sample's value only.
        let reference = vec![2.0, 4.0, 6.0, 4.0, 2.0];
        let profile = ReferenceProfile::new(&reference, 0.01, "tiny").unwrap();
        assert_eq!(profile.quarter, 1);
        assert!(profile.pre_check(&[2.0, 0.0, 0.0, 0.0, 0.0]));
        assert!(!profile.pre_check(&[3.0, 4.0, 6.0, 4.0, 2.0]));
    }

    #[test]
    fn test_verify_all_keeps_input_order() {
        let reference = waveform(20);
        let mut series = Vec::new();
        for _ in 0..3 {
            series.extend_from_slice(&reference);
        }
        let profile = ReferenceProfile::new(&reference, 0.01, "press").unwrap();
        let verifier = CandidateVerifier::new(&series, profile, "press", 0);
        let accepted = verifier.verify_all(&[40, 0, 55, 20]);
        let starts: Vec<usize> = accepted.iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![40, 0, 20]);
    }
}
