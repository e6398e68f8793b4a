//! Time-domain feature families.
//!
//! Five independent descriptor functions over the trailing ("time") axis of
//! an arbitrarily-batched tensor: summary statistics, Hjorth parameters,
//! higher-order crossing counts and two fractal-dimension estimators.
//! Leading axes are preserved positionally; a `(trial, channel, samples)`
//! input yields `(trial, channel, n_features)`.
//!
//! Zero-variance (flat) segments produce NaN/Inf in the variance-normalised
//! features — by the crate's degeneracy policy these propagate instead of
//! raising.
use ndarray::{ArrayBase, ArrayD, Axis, Data, Dimension, Zip};

use crate::error::{Error, Result};
use crate::tensor::{
    diff2_last, diff_last, last_axis, lsq_slope, mean_last, stack_features, var_last,
};

/// Seven summary statistics per segment.
///
/// In order: mean power, mean, standard deviation, mean absolute first
/// difference, the same normalised by the standard deviation, mean absolute
/// second (stride-2) difference, and the same normalised by the standard
/// deviation.
pub fn statistics<S, D>(data: &ArrayBase<S, D>, combined: bool) -> ArrayD<f64>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let x = data.view().into_dyn();

    let power = mean_last(&x.mapv(|v| v * v).view());
    let mean = mean_last(&x);
    let std = var_last(&x).mapv(f64::sqrt);

    let diff_1st = mean_last(&diff_last(&x).mapv(f64::abs).view());
    let normal_diff_1st = &diff_1st / &std;
    let diff_2nd = mean_last(&diff2_last(&x).mapv(f64::abs).view());
    let normal_diff_2nd = &diff_2nd / &std;

    stack_features(
        &[power, mean, std, diff_1st, normal_diff_1st, diff_2nd, normal_diff_2nd],
        combined,
    )
}

/// Hjorth parameters: activity, mobility, complexity.
///
/// Activity is the signal variance; mobility the square root of the
/// first-difference variance over the activity; complexity the square root
/// of the second- over first-difference variance ratio, divided by the
/// mobility. Zero activity or mobility propagates Inf/NaN.
pub fn hjorth<S, D>(data: &ArrayBase<S, D>, combined: bool) -> ArrayD<f64>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let x = data.view().into_dyn();

    let activity = var_last(&x);
    let var_diff_1st = var_last(&diff_last(&x).view());
    let mobility = (&var_diff_1st / &activity).mapv(f64::sqrt);
    let var_diff_2nd = var_last(&diff2_last(&x).view());
    let complexity = (&var_diff_2nd / &var_diff_1st).mapv(f64::sqrt) / &mobility;

    stack_features(&[activity, mobility, complexity], combined)
}

/// Higher-order crossing counts for difference orders `0..k`.
///
/// For each order the signal's finite difference of that order is
/// thresholded at `>= 0` and the number of changes in the resulting boolean
/// sequence is counted along the time axis. Order 0 is the raw signal.
///
/// # Errors
///
/// [`Error::Parameter`] when `k == 0` or when the signal is too short for
/// the highest requested difference order.
pub fn higher_order_crossing<S, D>(
    data: &ArrayBase<S, D>,
    k: usize,
    combined: bool,
) -> Result<ArrayD<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if k == 0 {
        return Err(Error::Parameter("higher_order_crossing needs k >= 1".into()));
    }
    let x = data.view().into_dyn();
    let samples = x.len_of(last_axis(&x.view()));
    // Order k-1 differencing consumes k-1 samples; counting changes needs 2.
    if samples < k + 1 {
        return Err(Error::Parameter(format!(
            "higher_order_crossing with k = {k} needs at least {} samples, got {samples}",
            k + 1
        )));
    }

    let mut counts = Vec::with_capacity(k);
    let mut current = x.to_owned();
    for order in 0..k {
        let thresholded = current.mapv(|v| if v >= 0.0 { 1.0 } else { 0.0 });
        let changes = diff_last(&thresholded.view());
        counts.push(changes.mapv(f64::abs).sum_axis(last_axis(&changes.view())));
        if order + 1 < k {
            current = diff_last(&current.view());
        }
    }
    Ok(stack_features(&counts, combined))
}

/// Sevcik fractal dimension.
///
/// The time axis is normalised to `(0, 1]` by its index range and the
/// amplitude to `[0, 1]` by the per-segment min/max; the dimension is
/// `1 + ln(L) / ln(2 (n - 1))` where `L` is the normalised path length.
/// Single-element feature axis. A constant segment divides by a zero
/// amplitude range and propagates NaN.
pub fn sevcik_fd<S, D>(data: &ArrayBase<S, D>, combined: bool) -> ArrayD<f64>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let x = data.view().into_dyn();
    let ax = last_axis(&x.view());
    let n = x.len_of(ax);
    let dx = 1.0 / n as f64;

    let min_y = x.fold_axis(ax, f64::INFINITY, |acc, &v| acc.min(v)).insert_axis(ax);
    let max_y = x.fold_axis(ax, f64::NEG_INFINITY, |acc, &v| acc.max(v)).insert_axis(ax);
    let y = (&x - &min_y) / (&max_y - &min_y);

    let dy = diff_last(&y.view());
    let length = dy
        .mapv(|v| (v * v + dx * dx).sqrt())
        .sum_axis(Axis(dy.ndim() - 1));
    let fd = length.mapv(|l| 1.0 + l.ln() / (2.0 * (n as f64 - 1.0)).ln());

    stack_features(&[fd], combined)
}

/// Higuchi fractal dimension with integration intervals `1..=k_max`.
///
/// For every interval `k` and offset `m < k` the curve length of the
/// `m`-offset, every-`k`-th-sample sub-sequence is computed and normalised;
/// the dimension is the negated least-squares slope of `log2(<L(k)>)`
/// against `log2(k)`. Batch positions whose `k = 1` curve length is zero
/// (flat or too-short segments) keep a dimension of 0.
///
/// # Errors
///
/// [`Error::Parameter`] when `k_max < 2` — the regression needs at least
/// two points.
pub fn higuchi_fd<S, D>(
    data: &ArrayBase<S, D>,
    k_max: usize,
    combined: bool,
) -> Result<ArrayD<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if k_max < 2 {
        return Err(Error::Parameter("higuchi_fd needs k_max >= 2".into()));
    }
    let x = data.view().into_dyn();
    let ax = last_axis(&x.view());

    let mut shape = x.shape().to_vec();
    let nd = shape.len();
    shape[nd - 1] = 1;
    let mut out = ArrayD::<f64>::zeros(shape);

    let log_k: Vec<f64> = (1..=k_max).map(|k| (k as f64).log2()).collect();
    Zip::from(out.lanes_mut(Axis(nd - 1)))
        .and(x.lanes(ax))
        .for_each(|mut o, lane| {
            let samples: Vec<f64> = lane.iter().cloned().collect();
            let lengths = curve_lengths(&samples, k_max);
            o[0] = if lengths[0] != 0.0 {
                let log_l: Vec<f64> = lengths.iter().map(|l| l.log2()).collect();
                -lsq_slope(&log_k, &log_l)
            } else {
                0.0
            };
        });

    Ok(stack_features(&[out.index_axis_move(Axis(nd - 1), 0)], combined))
}

/// Mean normalised curve length `<L(k)>` for each `k` in `1..=k_max`.
fn curve_lengths(x: &[f64], k_max: usize) -> Vec<f64> {
    let n = x.len();
    let mut lengths = Vec::with_capacity(k_max);
    for k in 1..=k_max {
        let mut acc = 0.0;
        for m in 0..k {
            let sub: Vec<f64> = x.iter().skip(m).step_by(k).cloned().collect();
            let abs_diff_sum: f64 = sub.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
            let intervals = (n - m) / k;
            let norm = (n as f64 - 1.0) / (intervals * k) as f64;
            acc += abs_diff_sum * norm / k as f64;
        }
        lengths.push(acc / k as f64);
    }
    lengths
}
