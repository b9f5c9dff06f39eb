use std::collections::BTreeMap;
use std::io::Read;
use std::sync::Arc;

use crate::core::error::Result;

/// A gap-free channel of samples, indexed by integer time step.
///
/// Built once from a raw column by dropping missing samples (NaN or `None`).
/// The samples are shared behind an `Arc`, so cloning a series is cheap and
/// every pattern registered on the channel reads the same buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSeries {
    values: Arc<[f64]>,
}

impl ChannelSeries {
    /// Build a series from samples that are already gap-free.
    ///
    /// Use [`ChannelSeries::from_raw`] for columns that may still hold NaN gaps.
    pub fn new(values: Vec<f64>) -> Self {
        debug_assert!(
            !values.iter().any(|v| v.is_nan()),
            "ChannelSeries::new given NaN samples"
        );
        Self {
            values: values.into(),
        }
    }

    /// Build a series from a raw column, dropping NaN samples.
    pub fn from_raw(raw: &[f64]) -> Self {
        Self::new(raw.iter().copied().filter(|v| !v.is_nan()).collect())
    }

    /// Build a series from a column with explicit gaps.
    pub fn from_optional(raw: &[Option<f64>]) -> Self {
        Self::new(raw.iter().flatten().copied().filter(|v| !v.is_nan()).collect())
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<f64>> for ChannelSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::from_raw(&values)
    }
}

/// A named set of channel series for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    channels: BTreeMap<String, ChannelSeries>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a channel.
    pub fn insert(&mut self, name: impl Into<String>, series: ChannelSeries) {
        self.channels.insert(name.into(), series);
    }

    /// Builder-style variant of [`Dataset::insert`].
    pub fn with_channel(mut self, name: impl Into<String>, series: ChannelSeries) -> Self {
        self.insert(name, series);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ChannelSeries> {
        self.channels.get(name)
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Load a dataset from CSV with a header row of channel names.
    ///
    /// Every column becomes its own channel. Empty, `NaN` and unparsable cells
    /// count as missing and are dropped from that column only, so columns of
    /// different effective lengths are fine.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let names: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

        for record in rdr.records() {
            let record = record?;
            for (col, cell) in columns.iter_mut().zip(record.iter()) {
                if let Ok(v) = cell.parse::<f64>() {
                    if v.is_finite() {
                        col.push(v);
                    }
                }
            }
        }

        let mut dataset = Self::new();
        for (name, col) in names.into_iter().zip(columns) {
            dataset.insert(name, ChannelSeries::new(col));
        }
        log::debug!("Loaded {} channels from CSV", dataset.len());
        Ok(dataset)
    }
}
