//! MASS distance profiles and raw match extraction for reference cycles.

use crate::algorithms::sliding::sliding_dot_product;
use crate::core::config::DotProductMethod;
use crate::core::stats::RollingStats;

/// Standard deviations below this are treated as a constant subsequence.
const CONSTANT_STD: f64 = 1e-15;

/// A single raw match from pattern matching.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Start offset of the matching window in the series.
    pub index: usize,
    /// Z-normalized Euclidean distance between reference and window.
    pub distance: f64,
}

/// Options for [`find_matches`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchOptions {
    /// Maximum accepted distance. `None` uses `max(mean(D) - 2*std(D), min(D))`.
    pub max_distance: Option<f64>,
    /// Exclusion zone radius. `None` uses `ceil(m / 4)`.
    pub exclusion_zone: Option<usize>,
    /// Stop after this many matches.
    pub max_matches: Option<usize>,
    pub dot_product: DotProductMethod,
}

/// Z-normalized distance of `query` to every window of `ts`, with the
/// default dot-product dispatch.
pub fn mass(query: &[f64], ts: &[f64]) -> Vec<f64> {
    mass_with(query, ts, DotProductMethod::default())
}

/// Z-normalized Euclidean distance profile (MASS) of `query` against `ts`.
///
/// Standard deviations are population (ddof = 0). A constant window is at
/// distance 0 from a constant query and `sqrt(m)` from any other query, the
/// value stumpy assigns. Empty if `query` is empty or longer than `ts`.
pub fn mass_with(query: &[f64], ts: &[f64], method: DotProductMethod) -> Vec<f64> {
    let m = query.len();
    if m == 0 || ts.len() < m {
        return Vec::new();
    }
    let m_f = m as f64;
    let windows = RollingStats::compute(ts, m);

    let q_mean = query.iter().sum::<f64>() / m_f;
    let q_std = (query.iter().map(|v| (v - q_mean).powi(2)).sum::<f64>() / m_f).sqrt();
    let flat_query = q_std < CONSTANT_STD;

    sliding_dot_product(query, ts, method)
        .into_iter()
        .zip(windows.mean.iter().zip(&windows.std))
        .map(|(dot, (&w_mean, &w_std))| {
            let flat_window = w_std < CONSTANT_STD;
            if flat_query && flat_window {
                0.0
            } else if flat_query || flat_window {
                m_f.sqrt()
            } else {
                let corr = ((dot - m_f * q_mean * w_mean) / (m_f * q_std * w_std)).clamp(-1.0, 1.0);
                (2.0 * m_f * (1.0 - corr)).sqrt()
            }
        })
        .collect()
}

/// Default distance threshold: `max(mean(D) - 2*std(D), min(D))` over finite entries.
fn default_max_distance(dp: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = dp.iter().copied().filter(|d| d.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let n_f = finite.len() as f64;
    let mean_d = finite.iter().sum::<f64>() / n_f;
    let var_d = finite.iter().map(|d| (d - mean_d).powi(2)).sum::<f64>() / n_f;
    let min_d = finite.iter().copied().fold(f64::INFINITY, f64::min);
    Some((mean_d - 2.0 * var_d.sqrt()).max(min_d))
}

/// Mask `[center - radius, center + radius]` so no later match lands there.
fn mask_exclusion_zone(profile: &mut [f64], center: usize, radius: usize) {
    let lo = center.saturating_sub(radius);
    let hi = center.saturating_add(radius).saturating_add(1).min(profile.len());
    profile[lo..hi].fill(f64::INFINITY);
}

/// Windows of `ts` that resemble `query`, best first.
///
/// The smallest remaining distance under the threshold is taken, its
/// exclusion zone is masked, and the search repeats until nothing under the
/// threshold is left or `max_matches` is reached. An empty query, a query
/// longer than the series, or a profile without finite entries yields no
/// matches.
pub fn find_matches(query: &[f64], ts: &[f64], opts: &MatchOptions) -> Vec<Match> {
    let mut profile = mass_with(query, ts, opts.dot_product);
    if profile.is_empty() {
        return Vec::new();
    }
    let Some(max_dist) = opts.max_distance.or_else(|| default_max_distance(&profile)) else {
        return Vec::new();
    };
    let zone = opts
        .exclusion_zone
        .unwrap_or_else(|| query.len().div_ceil(4))
        .max(1)
        .min(profile.len());
    let limit = opts.max_matches.unwrap_or(usize::MAX);

    let mut matches = Vec::new();
    while matches.len() < limit {
        let best = profile
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_finite() && **d <= max_dist)
            .min_by(|(_, a), (_, b)| a.total_cmp(b));
        let Some((index, &distance)) = best else {
            break;
        };
        matches.push(Match { index, distance });
        mask_exclusion_zone(&mut profile, index, zone);
    }
    matches
}
