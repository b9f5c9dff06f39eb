/// Mean, sample standard deviation and energy of a single segment.
///
/// The standard deviation uses Bessel's correction (ddof = 1) and is `NaN`
/// for segments with fewer than two samples. `energy` is the sum of squared
/// deviations from the segment's own mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentStats {
    pub len: usize,
    pub mean: f64,
    pub std: f64,
    pub energy: f64,
}

impl SegmentStats {
    /// Two-pass statistics over `x`. An empty segment has `NaN` mean and std.
    pub fn compute(x: &[f64]) -> Self {
        let n = x.len();
        if n == 0 {
            return Self {
                len: 0,
                mean: f64::NAN,
                std: f64::NAN,
                energy: 0.0,
            };
        }
        let mean = x.iter().sum::<f64>() / n as f64;
        let energy: f64 = x.iter().map(|v| (v - mean) * (v - mean)).sum();
        let std = if n > 1 {
            (energy / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };
        Self {
            len: n,
            mean,
            std,
            energy,
        }
    }
}

/// Rolling mean and population standard deviation for all subsequences of length `m`.
///
/// Computed via a single-pass sliding window over cumulative sums and
/// sums-of-squares, matching stumpy's numerical approach.
#[derive(Debug, Clone)]
pub struct RollingStats {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl RollingStats {
    /// Compute rolling statistics for subsequences of length `m`.
    ///
    /// # Panics
    /// Panics if `m == 0` or `ts.len() < m`.
    pub fn compute(ts: &[f64], m: usize) -> Self {
        assert!(m > 0, "Subsequence length must be > 0");
        assert!(ts.len() >= m, "Time series must be at least as long as m");

        let n = ts.len();
        let n_subs = n - m + 1;

        let mut cumsum = vec![0.0; n + 1];
        let mut cumsum_sq = vec![0.0; n + 1];
        for i in 0..n {
            cumsum[i + 1] = cumsum[i] + ts[i];
            cumsum_sq[i + 1] = cumsum_sq[i] + ts[i] * ts[i];
        }

        let m_f = m as f64;
        let (mean, std): (Vec<f64>, Vec<f64>) = (0..n_subs)
            .map(|i| {
                let mu = (cumsum[i + m] - cumsum[i]) / m_f;
                // E[X^2] - E[X]^2, clamped to 0 for numerical stability
                let var = ((cumsum_sq[i + m] - cumsum_sq[i]) / m_f - mu * mu).max(0.0);
                (mu, var.sqrt())
            })
            .unzip();

        Self { mean, std }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_segment_stats_sample_std() {
        // pandas: pd.Series([2, 4, 4, 4, 5, 5, 7, 9]).std() == 2.138089935299395
        let s = SegmentStats::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(s.len, 8);
        assert_relative_eq!(s.mean, 5.0);
        assert_relative_eq!(s.energy, 32.0);
        assert_relative_eq!(s.std, 2.138089935299395, epsilon = 1e-12);
    }

    #[test]
    fn test_segment_stats_short() {
        let one = SegmentStats::compute(&[3.0]);
        assert_relative_eq!(one.mean, 3.0);
        assert!(one.std.is_nan());
        assert_eq!(one.energy, 0.0);

        let empty = SegmentStats::compute(&[]);
        assert!(empty.mean.is_nan());
        assert!(empty.std.is_nan());
    }

    #[test]
    fn test_rolling_stats_simple() {
        // Subsequences [1,2,3], [2,3,4], [3,4,5]: means 2, 3, 4; std sqrt(2/3)
        let ts = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = RollingStats::compute(&ts, 3);

        assert_eq!(stats.mean.len(), 3);
        assert!((stats.mean[0] - 2.0).abs() < 1e-10);
        assert!((stats.mean[1] - 3.0).abs() < 1e-10);
        assert!((stats.mean[2] - 4.0).abs() < 1e-10);

        let expected_std = (2.0_f64 / 3.0).sqrt();
        for s in &stats.std {
            assert!((s - expected_std).abs() < 1e-10);
        }
    }

    #[test]
    fn test_rolling_stats_constant() {
        let ts = vec![5.0; 10];
        let stats = RollingStats::compute(&ts, 4);
        for mu in &stats.mean {
            assert!((mu - 5.0).abs() < 1e-10);
        }
        for s in &stats.std {
            assert!(*s < 1e-10);
        }
    }
}
