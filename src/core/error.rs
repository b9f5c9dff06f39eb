//! Error types for motif detection.

use thiserror::Error;

/// Errors raised while registering patterns or running a detection pass.
#[derive(Error, Debug)]
pub enum Error {
    /// A pattern range is empty, reversed, or runs past the end of its channel.
    ///
    /// `len` is `None` when the channel length was not known at the time of the check.
    #[error("Invalid pattern range [{start}, {end}) for channel of length {len:?}")]
    InvalidRange {
        start: usize,
        end: usize,
        len: Option<usize>,
    },

    /// A reference statistic used as a relative-deviation denominator is zero
    /// or not finite, so no candidate can be compared against it.
    #[error("Degenerate reference for job '{job}': {statistic} is {value}")]
    DegenerateReference {
        job: String,
        statistic: &'static str,
        value: f64,
    },

    /// A pattern targets a channel the dataset does not contain.
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// CSV decoding error while loading a dataset.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON decoding error while loading pattern registrations.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a pattern range `[start, end)` checked against an optional length.
    pub fn invalid_range(start: usize, end: usize, len: Option<usize>) -> Self {
        Self::InvalidRange { start, end, len }
    }
}
