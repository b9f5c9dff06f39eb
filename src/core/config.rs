use serde::{Deserialize, Serialize};

/// Order of the motif records handed back for each channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultOrder {
    /// Selection order of the greedy resolver (descending energy).
    #[default]
    Selection,
    /// Ascending start offset.
    Start,
}

/// Work size (`reference.len() * series.len()`) above which
/// [`DotProductMethod::Auto`] switches to the FFT path.
pub const DEFAULT_FFT_ABOVE: usize = 1 << 18;

/// How MASS computes the sliding dot products of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DotProductMethod {
    /// Direct products for small inputs, FFT once the work exceeds `fft_above`.
    Auto { fft_above: usize },
    Direct,
    Fft,
}

impl Default for DotProductMethod {
    fn default() -> Self {
        Self::Auto {
            fft_above: DEFAULT_FFT_ABOVE,
        }
    }
}

/// Configuration for a detection run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Ordering of each channel's result.
    pub order: ResultOrder,
    /// Maximum MASS distance for a raw match. `None` uses the
    /// `max(mean(D) - 2*std(D), min(D))` default.
    pub max_distance: Option<f64>,
    /// Exclusion zone radius between raw matches. `None` uses `ceil(m / 4)`.
    pub exclusion_zone: Option<usize>,
    /// Cap on raw matches per pattern.
    pub max_matches: Option<usize>,
    /// Dot-product dispatch for the MASS distance profile.
    pub dot_product: DotProductMethod,
}

impl FinderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, order: ResultOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    pub fn with_exclusion_zone(mut self, zone: usize) -> Self {
        self.exclusion_zone = Some(zone);
        self
    }

    pub fn with_max_matches(mut self, max_matches: usize) -> Self {
        self.max_matches = Some(max_matches);
        self
    }

    pub fn with_dot_product(mut self, method: DotProductMethod) -> Self {
        self.dot_product = method;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FinderConfig::new();
        assert_eq!(config.order, ResultOrder::Selection);
        assert!(config.max_distance.is_none());
        assert!(config.exclusion_zone.is_none());
        assert!(config.max_matches.is_none());
        assert_eq!(
            config.dot_product,
            DotProductMethod::Auto {
                fft_above: DEFAULT_FFT_ABOVE
            }
        );
    }

    #[test]
    fn test_builder_and_json() {
        let config = FinderConfig::new()
            .with_order(ResultOrder::Start)
            .with_max_distance(2.5)
            .with_max_matches(8)
            .with_dot_product(DotProductMethod::Fft);
        let json = serde_json::to_string(&config).unwrap();
        let back: FinderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.exclusion_zone, None);
    }
}
