//! Sliding dot products of a reference cycle against every window of a channel.

use realfft::RealFftPlanner;

use crate::core::config::DotProductMethod;

/// `out[i] = dot(reference, series[i..i + m])` for every full window of `series`.
///
/// Empty when the reference is empty or longer than the series.
pub fn sliding_dot_product(reference: &[f64], series: &[f64], method: DotProductMethod) -> Vec<f64> {
    let use_fft = match method {
        DotProductMethod::Direct => false,
        DotProductMethod::Fft => true,
        DotProductMethod::Auto { fft_above } => {
            reference.len().saturating_mul(series.len()) > fft_above
        }
    };
    if use_fft {
        dot_products_fft(reference, series)
    } else {
        dot_products_direct(reference, series)
    }
}

/// Window-by-window products, O(n * m).
pub fn dot_products_direct(reference: &[f64], series: &[f64]) -> Vec<f64> {
    if reference.is_empty() || series.len() < reference.len() {
        return Vec::new();
    }
    series
        .windows(reference.len())
        .map(|w| w.iter().zip(reference).map(|(a, b)| a * b).sum())
        .collect()
}

/// Circular cross-correlation through real FFTs, O(n log n).
///
/// The transform length only needs to cover the series: every product at a
/// full-window offset reads indices below `n`, so nothing wraps around.
pub fn dot_products_fft(reference: &[f64], series: &[f64]) -> Vec<f64> {
    let (m, n) = (reference.len(), series.len());
    if m == 0 || n < m {
        return Vec::new();
    }
    let fft_len = n.next_power_of_two().max(2);

    let mut planner = RealFftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_len);
    let inverse = planner.plan_fft_inverse(fft_len);

    let mut buf = forward.make_input_vec();
    buf[..m].copy_from_slice(reference);
    let mut reference_spectrum = forward.make_output_vec();
    if forward.process(&mut buf, &mut reference_spectrum).is_err() {
        return fft_fallback("forward", reference, series);
    }

    buf[..n].copy_from_slice(series);
    buf[n..].fill(0.0);
    let mut spectrum = forward.make_output_vec();
    if forward.process(&mut buf, &mut spectrum).is_err() {
        return fft_fallback("forward", reference, series);
    }

    for (s, r) in spectrum.iter_mut().zip(&reference_spectrum) {
        *s *= r.conj();
    }
    // DC and Nyquist bins of a real signal carry no imaginary part
    spectrum[0].im = 0.0;
    if let Some(last) = spectrum.last_mut() {
        last.im = 0.0;
    }

    let mut out = inverse.make_output_vec();
    if inverse.process(&mut spectrum, &mut out).is_err() {
        return fft_fallback("inverse", reference, series);
    }

    let scale = 1.0 / fft_len as f64;
    out.truncate(n - m + 1);
    out.iter_mut().for_each(|v| *v *= scale);
    out
}

fn fft_fallback(stage: &str, reference: &[f64], series: &[f64]) -> Vec<f64> {
    log::warn!(
        "{stage} FFT failed (n={}, m={}); using direct dot products",
        series.len(),
        reference.len()
    );
    dot_products_direct(reference, series)
}
