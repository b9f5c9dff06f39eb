use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::pattern::ColorMap;

/// A verified match waiting for overlap resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub start: usize,
    pub len: usize,
    /// Sum of squared deviations from the window mean; ranking only.
    pub energy: f64,
    pub job: String,
    pub color: usize,
}

impl Candidate {
    /// One past the last sample covered by the candidate.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// An accepted, non-overlapping motif in a channel's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifRecord {
    pub start: usize,
    pub len: usize,
    pub color: usize,
    pub job: String,
}

impl MotifRecord {
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Whether the index ranges of `self` and `other` intersect.
    #[inline]
    pub fn overlaps(&self, other: &MotifRecord) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

impl From<Candidate> for MotifRecord {
    fn from(c: Candidate) -> Self {
        Self {
            start: c.start,
            len: c.len,
            color: c.color,
            job: c.job,
        }
    }
}

/// Why a registered pattern took no part in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    /// A reference statistic needed as a denominator was zero or not finite.
    DegenerateReference { statistic: String, value: f64 },
    /// The pattern range does not fit inside the channel of `len` samples.
    InvalidRange { len: usize },
}

/// A pattern excluded from a run, with its position in the channel's registration list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedPattern {
    pub channel: String,
    pub pattern_index: usize,
    pub job: String,
    pub reason: SkipReason,
}

/// Output of one detection pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotifResults {
    /// Accepted motifs per channel.
    pub channels: BTreeMap<String, Vec<MotifRecord>>,
    /// Job label to color index mapping, shared across channels.
    pub color_map: ColorMap,
    /// Patterns that were skipped rather than matched.
    pub skipped: Vec<SkippedPattern>,
}

impl MotifResults {
    /// Motifs for `channel`, or an empty slice if the channel had no patterns.
    pub fn channel(&self, channel: &str) -> &[MotifRecord] {
        self.channels.get(channel).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MotifRecord])> {
        self.channels
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Number of accepted motifs across all channels.
    pub fn total_motifs(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }
}
