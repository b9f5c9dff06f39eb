use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// A registered reference pattern: the half-open range `[start, end)` of
/// `channel`, matched with a fractional tolerance and labelled `job`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub channel: String,
    pub start: usize,
    pub end: usize,
    /// Maximum relative deviation of mean and standard deviation.
    pub threshold: f64,
    pub job: String,
}

impl PatternSpec {
    /// Number of samples in the reference subsequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Check the range against a channel of `len` samples.
    pub fn check_bounds(&self, len: usize) -> Result<()> {
        if self.start >= self.end || self.end > len {
            return Err(Error::invalid_range(self.start, self.end, Some(len)));
        }
        Ok(())
    }
}

/// Stable job label to color index mapping.
///
/// Indices are handed out in first-seen order starting at 0 and are never
/// reassigned or reused. Serialized as the ordered list of labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ColorMap {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `job`, assigning the next one if the label is new.
    pub fn assign(&mut self, job: &str) -> usize {
        if let Some(&idx) = self.index.get(job) {
            return idx;
        }
        let idx = self.labels.len();
        self.labels.push(job.to_owned());
        self.index.insert(job.to_owned(), idx);
        idx
    }

    pub fn index_of(&self, job: &str) -> Option<usize> {
        self.index.get(job).copied()
    }

    pub fn label_of(&self, idx: usize) -> Option<&str> {
        self.labels.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(label, index)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.labels.iter().enumerate().map(|(i, l)| (l.as_str(), i))
    }
}

impl From<Vec<String>> for ColorMap {
    fn from(labels: Vec<String>) -> Self {
        let mut map = Self::new();
        for label in &labels {
            map.assign(label);
        }
        map
    }
}

impl From<ColorMap> for Vec<String> {
    fn from(map: ColorMap) -> Self {
        map.labels
    }
}

/// Patterns of one channel with the color index assigned at registration.
#[derive(Debug, Clone, Default)]
struct ChannelPatterns {
    specs: Vec<PatternSpec>,
    colors: Vec<usize>,
}

/// Registered reference patterns, grouped per channel, plus the color map
/// shared by every channel.
#[derive(Debug, Clone, Default)]
pub struct PatternLibrary {
    patterns: BTreeMap<String, ChannelPatterns>,
    /// Channels in order of their first registration.
    channel_order: Vec<String>,
    colors: ColorMap,
}

impl PatternLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pattern whose channel length is not (yet) known.
    ///
    /// Only the ordering of `start` and `end` is checked. Returns the color
    /// index of `job`.
    pub fn register(
        &mut self,
        channel: &str,
        start: usize,
        end: usize,
        threshold: f64,
        job: &str,
    ) -> Result<usize> {
        if start >= end {
            return Err(Error::invalid_range(start, end, None));
        }
        Ok(self.push(PatternSpec {
            channel: channel.to_owned(),
            start,
            end,
            threshold,
            job: job.to_owned(),
        }))
    }

    /// Register a pattern on a channel of known length `len`.
    pub fn register_within(
        &mut self,
        channel: &str,
        start: usize,
        end: usize,
        threshold: f64,
        job: &str,
        len: usize,
    ) -> Result<usize> {
        let spec = PatternSpec {
            channel: channel.to_owned(),
            start,
            end,
            threshold,
            job: job.to_owned(),
        };
        spec.check_bounds(len)?;
        Ok(self.push(spec))
    }

    fn push(&mut self, spec: PatternSpec) -> usize {
        let color = self.colors.assign(&spec.job);
        if !self.patterns.contains_key(&spec.channel) {
            self.channel_order.push(spec.channel.clone());
        }
        let entry = self.patterns.entry(spec.channel.clone()).or_default();
        entry.specs.push(spec);
        entry.colors.push(color);
        color
    }

    /// Patterns registered on `channel`, in registration order.
    pub fn patterns_for(&self, channel: &str) -> &[PatternSpec] {
        self.patterns
            .get(channel)
            .map(|p| p.specs.as_slice())
            .unwrap_or(&[])
    }

    /// Patterns registered on `channel` paired with their color index.
    pub fn entries_for(&self, channel: &str) -> impl Iterator<Item = (&PatternSpec, usize)> {
        self.patterns
            .get(channel)
            .into_iter()
            .flat_map(|p| p.specs.iter().zip(p.colors.iter().copied()))
    }

    /// Channels with at least one pattern, in order of first registration.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.channel_order.iter().map(String::as_str)
    }

    pub fn color_map(&self) -> &ColorMap {
        &self.colors
    }

    /// Total number of registered patterns across all channels.
    pub fn len(&self) -> usize {
        self.patterns.values().map(|p| p.specs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Build a library from a JSON array of pattern registrations.
    ///
    /// Registrations are applied in array order; the first malformed range
    /// aborts loading.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let specs: Vec<PatternSpec> = serde_json::from_str(json)?;
        let mut lib = Self::new();
        for spec in specs {
            lib.register(&spec.channel, spec.start, spec.end, spec.threshold, &spec.job)?;
        }
        Ok(lib)
    }
}
