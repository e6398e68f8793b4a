//! Last-axis tensor helpers shared by every feature family.
//!
//! All feature functions reduce along the trailing ("time") axis of an
//! arbitrarily-batched array and stack their per-segment scalars into a new
//! trailing feature axis. The helpers here keep that behaviour identical
//! across families: same difference operators, same population-variance
//! definition (ddof = 0), and one shared implementation of the `combined`
//! shape policy.
use ndarray::{ArrayD, ArrayViewD, Axis, Slice};

/// The trailing (time or feature) axis of `x`.
pub(crate) fn last_axis(x: &ArrayViewD<'_, f64>) -> Axis {
    Axis(x.ndim() - 1)
}

/// Mean along the last axis.
///
/// Computed as sum/len rather than `mean_axis` so a zero-length time axis
/// propagates NaN instead of panicking.
pub(crate) fn mean_last(x: &ArrayViewD<'_, f64>) -> ArrayD<f64> {
    let ax = last_axis(x);
    let n = x.len_of(ax) as f64;
    x.sum_axis(ax) / n
}

/// Population variance (ddof = 0) along the last axis.
pub(crate) fn var_last(x: &ArrayViewD<'_, f64>) -> ArrayD<f64> {
    let ax = last_axis(x);
    let mean = mean_last(x).insert_axis(ax);
    let centered = x - &mean;
    mean_last(&centered.mapv(|v| v * v).view())
}

/// First difference along the last axis: `x[..., 1..] - x[..., ..-1]`.
pub(crate) fn diff_last(x: &ArrayViewD<'_, f64>) -> ArrayD<f64> {
    let ax = last_axis(x);
    let hi = x.slice_axis(ax, Slice::from(1..));
    let lo = x.slice_axis(ax, Slice::from(..-1));
    &hi - &lo
}

/// Non-adjacent (stride-2) difference: `x[..., 2..] - x[..., ..-2]`.
pub(crate) fn diff2_last(x: &ArrayViewD<'_, f64>) -> ArrayD<f64> {
    let ax = last_axis(x);
    let hi = x.slice_axis(ax, Slice::from(2..));
    let lo = x.slice_axis(ax, Slice::from(..-2));
    &hi - &lo
}

/// Stack per-segment reductions into a new trailing feature axis and apply
/// the `combined` policy.
///
/// Every `part` has the batch shape (input shape minus the time axis). The
/// parts become a trailing axis of length `parts.len()`. With
/// `combined = true` a singleton feature axis is collapsed back into the
/// batch — `(..., channels, 1)` → `(..., channels)`; feature counts > 1 are
/// left as stacked.
pub(crate) fn stack_features(parts: &[ArrayD<f64>], combined: bool) -> ArrayD<f64> {
    let views: Vec<_> = parts.iter().map(|p| p.view()).collect();
    let feature_axis = Axis(parts[0].ndim());
    let stacked = ndarray::stack(feature_axis, &views)
        .expect("feature parts share the batch shape");
    collapse_singleton(stacked, combined)
}

/// The `combined` policy itself: drop the trailing feature axis iff it has
/// length 1. Shared by [`stack_features`] and the families that fill their
/// feature axis directly.
pub(crate) fn collapse_singleton(features: ArrayD<f64>, combined: bool) -> ArrayD<f64> {
    let feature_axis = Axis(features.ndim() - 1);
    if combined && features.len_of(feature_axis) == 1 {
        features.index_axis_move(feature_axis, 0)
    } else {
        features
    }
}

/// Least-squares slope of `ys` against `xs`.
///
/// Used by the Higuchi fractal-dimension fit; NaN/Inf in `ys` propagate
/// into the slope.
pub(crate) fn lsq_slope(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let mx = xs.iter().sum::<f64>() / n;
    let my = ys.iter().sum::<f64>() / n;
    let mut num = 0.0;
    let mut den = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        num += (x - mx) * (y - my);
        den += (x - mx) * (x - mx);
    }
    num / den
}
