//! Frequency-domain feature families.
//!
//! Two band-power estimators over the trailing axis of an arbitrarily
//! batched tensor:
//!
//! * [`bin_power`] — raw DFT magnitude summed per frequency band, no
//!   normalisation. Cheap, resolution tied to the segment length.
//! * [`power_spectral_density`] — Welch's averaged periodogram (Hann
//!   window, 50 % overlap, per-segment constant detrend, one-sided density
//!   scaling), averaged per band.
//!
//! The Welch variant historically dropped its outermost bands; that
//! behaviour is kept behind [`PsdBandMode::Legacy`], with
//! [`PsdBandMode::Full`] as the corrected alternative.
use ndarray::{ArrayBase, ArrayD, Axis, Data, Dimension, Slice, Zip};
use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::{Error, Result};
use crate::tensor::{last_axis, stack_features};

/// Which of the intervals implied by a band vector become output features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PsdBandMode {
    /// Compatibility behaviour: the first and last interval only delimit
    /// exclusion ranges, so `band.len() - 3` features are emitted. For
    /// `(4, 8, 14, 31, 65)` that is `(8, 14)` and `(14, 31)` only.
    #[default]
    Legacy,
    /// Every consecutive boundary pair becomes a feature
    /// (`band.len() - 1` features).
    Full,
}

/// Sum of raw DFT magnitudes per frequency band.
///
/// For each consecutive boundary pair `(lo, hi)` the magnitudes of the DFT
/// bins with index in `[floor(lo/fs·n), floor(hi/fs·n))` are summed; the
/// result has `band.len() - 1` features. No bin-width normalisation is
/// applied.
///
/// # Errors
///
/// [`Error::Parameter`] for a band with fewer than two boundaries, a
/// non-increasing band, or a non-positive sample rate.
pub fn bin_power<S, D>(
    data: &ArrayBase<S, D>,
    band: &[f64],
    sample_rate: f64,
    combined: bool,
) -> Result<ArrayD<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    validate_band(band)?;
    if sample_rate <= 0.0 {
        return Err(Error::Parameter("sample_rate must be positive".into()));
    }

    let x = data.view().into_dyn();
    let ax = last_axis(&x.view());
    let n = x.len_of(ax);

    // DFT magnitude, same shape as the input.
    let mut planner: FftPlanner<f64> = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let mut magnitude = ArrayD::<f64>::zeros(x.raw_dim());
    Zip::from(magnitude.lanes_mut(ax)).and(x.lanes(ax)).for_each(|mut m, lane| {
        let mut buf: Vec<Complex<f64>> =
            lane.iter().map(|&v| Complex { re: v, im: 0.0 }).collect();
        fft.process(&mut buf);
        for (out, c) in m.iter_mut().zip(buf.iter()) {
            *out = c.norm();
        }
    });

    let mut features = Vec::with_capacity(band.len() - 1);
    for pair in band.windows(2) {
        let lo = ((pair[0] / sample_rate * n as f64).floor() as usize).min(n);
        let hi = ((pair[1] / sample_rate * n as f64).floor() as usize).min(n);
        let hi = hi.max(lo);
        features.push(
            magnitude
                .slice_axis(ax, Slice::from(lo..hi))
                .sum_axis(ax),
        );
    }
    Ok(stack_features(&features, combined))
}

/// Welch-method band power averaged per frequency band.
///
/// The PSD of every batch lane is estimated with `nperseg`-sample segments
/// (clamped to the lane length), Hann window, 50 % overlap, per-segment
/// mean removal and one-sided density scaling. Each emitted feature is the
/// mean PSD over the bins whose frequency lies in `[lo, hi)`; which
/// intervals are emitted depends on `mode` (see [`PsdBandMode`]).
///
/// A band interval narrower than the `fs/nperseg` bin spacing selects no
/// bins and propagates NaN for that feature.
///
/// # Errors
///
/// [`Error::Parameter`] for an invalid band, `nperseg == 0`, a
/// non-positive sample rate, or [`PsdBandMode::Legacy`] with fewer than
/// four boundaries (it needs at least one interval left after trimming).
pub fn power_spectral_density<S, D>(
    data: &ArrayBase<S, D>,
    sample_rate: f64,
    nperseg: usize,
    band: &[f64],
    mode: PsdBandMode,
    combined: bool,
) -> Result<ArrayD<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    validate_band(band)?;
    if sample_rate <= 0.0 {
        return Err(Error::Parameter("sample_rate must be positive".into()));
    }
    if nperseg == 0 {
        return Err(Error::Parameter("nperseg must be at least 1".into()));
    }
    if mode == PsdBandMode::Legacy && band.len() < 4 {
        return Err(Error::Parameter(
            "legacy band mode trims the outer intervals and needs at least 4 boundaries".into(),
        ));
    }

    let x = data.view().into_dyn();
    let ax = last_axis(&x.view());
    let samples = x.len_of(ax);
    let nperseg = nperseg.min(samples.max(1));

    let n_bins = nperseg / 2 + 1;
    let window = hann(nperseg);
    let win_power: f64 = window.iter().map(|w| w * w).sum();

    let mut planner: FftPlanner<f64> = FftPlanner::new();
    let fft = planner.plan_fft_forward(nperseg);

    let mut shape = x.shape().to_vec();
    let nd = shape.len();
    shape[nd - 1] = n_bins;
    let mut psd = ArrayD::<f64>::zeros(shape);
    Zip::from(psd.lanes_mut(Axis(nd - 1))).and(x.lanes(ax)).for_each(|mut p, lane| {
        let samples: Vec<f64> = lane.iter().cloned().collect();
        let est = welch_1d(&samples, &window, win_power, sample_rate, fft.as_ref());
        for (out, v) in p.iter_mut().zip(est) {
            *out = v;
        }
    });

    // Mean PSD over the bins inside each kept interval. Bin k sits at
    // k·fs/nperseg Hz; the bins of an interval are contiguous.
    let intervals: Vec<(f64, f64)> = band.windows(2).map(|p| (p[0], p[1])).collect();
    let kept: &[(f64, f64)] = match mode {
        PsdBandMode::Legacy => &intervals[1..intervals.len() - 1],
        PsdBandMode::Full => &intervals,
    };
    let bin_hz = sample_rate / nperseg as f64;
    let mut features = Vec::with_capacity(kept.len());
    for &(lo, hi) in kept {
        let k_lo = ((lo / bin_hz).ceil() as usize).min(n_bins);
        let mut k_hi = k_lo;
        while k_hi < n_bins && (k_hi as f64) * bin_hz < hi {
            k_hi += 1;
        }
        let count = (k_hi - k_lo) as f64;
        features.push(
            psd.slice_axis(Axis(nd - 1), Slice::from(k_lo..k_hi))
                .sum_axis(Axis(nd - 1))
                / count,
        );
    }
    Ok(stack_features(&features, combined))
}

/// Welch PSD of one lane: one-sided, density-scaled, mean over segments.
fn welch_1d(
    x: &[f64],
    window: &[f64],
    win_power: f64,
    sample_rate: f64,
    fft: &dyn rustfft::Fft<f64>,
) -> Vec<f64> {
    let nperseg = window.len();
    let n_bins = nperseg / 2 + 1;
    let step = (nperseg - nperseg / 2).max(1);
    let scale = 1.0 / (sample_rate * win_power);

    let mut acc = vec![0.0_f64; n_bins];
    let mut n_segments = 0usize;
    let mut start = 0usize;
    while start + nperseg <= x.len() {
        let seg = &x[start..start + nperseg];
        let mean = seg.iter().sum::<f64>() / nperseg as f64;
        let mut buf: Vec<Complex<f64>> = seg
            .iter()
            .zip(window)
            .map(|(&v, &w)| Complex { re: (v - mean) * w, im: 0.0 })
            .collect();
        fft.process(&mut buf);

        for (k, slot) in acc.iter_mut().enumerate() {
            let mut p = buf[k].norm_sqr() * scale;
            // One-sided spectrum: double everything except DC and (for even
            // nperseg) the Nyquist bin.
            if k != 0 && !(nperseg % 2 == 0 && k == n_bins - 1) {
                p *= 2.0;
            }
            *slot += p;
        }
        n_segments += 1;
        start += step;
    }

    for slot in acc.iter_mut() {
        *slot /= n_segments as f64;
    }
    acc
}

/// Periodic Hann window of length `n`.
fn hann(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / n as f64).cos())
        .collect()
}

fn validate_band(band: &[f64]) -> Result<()> {
    if band.len() < 2 {
        return Err(Error::Parameter(format!(
            "band needs at least 2 boundaries, got {}",
            band.len()
        )));
    }
    if band.windows(2).any(|p| p[1] <= p[0]) {
        return Err(Error::Parameter(
            "band boundaries must be strictly increasing".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array3};
    use std::f64::consts::PI;

    fn sine(freq: f64, sample_rate: f64, n: usize) -> Array1<f64> {
        Array1::from_shape_fn(n, |i| (2.0 * PI * freq * i as f64 / sample_rate).sin())
    }

    #[test]
    fn bin_power_concentrates_at_the_tone() {
        // 10 Hz tone @128 Hz, 1 s: all energy in the 8–12 Hz band.
        let x = sine(10.0, 128.0, 128);
        let f = bin_power(&x, &[4.0, 8.0, 12.0, 16.0, 25.0, 45.0], 128.0, true).unwrap();
        assert_eq!(f.shape(), &[5]);
        let total: f64 = f.iter().sum();
        assert!(f[[1]] / total > 0.95, "8–12 Hz share = {}", f[[1]] / total);
    }

    #[test]
    fn bin_power_preserves_batch_axes() {
        let batch = Array3::from_shape_fn((2, 4, 128), |(_, c, s)| {
            (2.0 * PI * (6 + 2 * c) as f64 * s as f64 / 128.0).sin()
        });
        let f = bin_power(&batch, &[4.0, 8.0, 12.0, 16.0], 128.0, true).unwrap();
        assert_eq!(f.shape(), &[2, 4, 3]);
    }

    #[test]
    fn bin_power_rejects_bad_bands() {
        let x = sine(10.0, 128.0, 128);
        assert!(bin_power(&x, &[4.0], 128.0, true).is_err());
        assert!(bin_power(&x, &[8.0, 8.0], 128.0, true).is_err());
        assert!(bin_power(&x, &[8.0, 4.0], 128.0, true).is_err());
    }

    #[test]
    fn welch_peak_sits_on_the_tone() {
        let x: Vec<f64> = sine(20.0, 128.0, 1024).to_vec();
        let window = hann(128);
        let win_power: f64 = window.iter().map(|w| w * w).sum();
        let mut planner: FftPlanner<f64> = FftPlanner::new();
        let fft = planner.plan_fft_forward(128);
        let psd = welch_1d(&x, &window, win_power, 128.0, fft.as_ref());
        assert_eq!(psd.len(), 65);
        let peak = psd
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(peak, 20); // 1 Hz bin spacing at nperseg=128, fs=128
    }

    #[test]
    fn legacy_mode_emits_only_the_middle_bands() {
        let x = sine(10.0, 128.0, 512);
        let f = power_spectral_density(
            &x,
            128.0,
            128,
            &[4.0, 8.0, 14.0, 31.0, 65.0],
            PsdBandMode::Legacy,
            true,
        )
        .unwrap();
        // Five boundaries, two features: (8,14) and (14,31).
        assert_eq!(f.shape(), &[2]);
    }

    #[test]
    fn full_mode_emits_every_interval() {
        let x = sine(10.0, 128.0, 512);
        let f = power_spectral_density(
            &x,
            128.0,
            128,
            &[4.0, 8.0, 14.0, 31.0, 65.0],
            PsdBandMode::Full,
            true,
        )
        .unwrap();
        assert_eq!(f.shape(), &[4]);
        // The 10 Hz tone lands in (8,14).
        let peak = f
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(peak, 1);
    }

    #[test]
    fn legacy_mode_needs_enough_boundaries() {
        let x = sine(10.0, 128.0, 512);
        assert!(power_spectral_density(
            &x,
            128.0,
            128,
            &[4.0, 8.0, 14.0],
            PsdBandMode::Legacy,
            true
        )
        .is_err());
    }
}
