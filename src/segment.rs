//! Fixed-length windowing of `(trial, channel, sample)` recordings.
//!
//! [`segment`] slices each trial into fixed-size, optionally overlapping
//! windows, flattens `(trial, slice)` into one batch axis and derives a
//! group identifier per output segment so downstream cross-validation can
//! keep segments of the same trial (or the same temporal position) together.
//! Labels, when given, are replicated across the slices of their trial.
//!
//! Shuffling is driven by an explicit seed rather than ambient global
//! randomness, so a segmentation run is reproducible end to end.
use ndarray::{Array2, Array3, ArrayBase, ArrayD, Axis, Data, Dimension, Ix3, Slice};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};

/// How output segments are assigned group identifiers (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMode {
    /// All slices of a trial share the trial's index.
    #[default]
    Trial,
    /// All trials of a temporal position share the slice index.
    Slice,
    /// Two-column groups carrying both the trial and the slice index.
    Both,
}

/// Configuration for [`segment`].
///
/// All fields are `pub` so a config can be built with struct-update syntax:
///
/// ```
/// use eegfeat::{SegmentConfig, GroupMode};
///
/// let cfg = SegmentConfig {
///     window: 2.0,                  // 2 s windows
///     step: Some(1.0),              // 50 % overlap
///     group_mode: GroupMode::Both,
///     ..SegmentConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// Window length in seconds. Converted to samples by truncation.
    ///
    /// Default: `1.0`.
    pub window: f64,

    /// Step between window starts in seconds; `None` means `window`
    /// (non-overlapping tiling). Steps smaller than the window overlap,
    /// larger ones leave gaps.
    ///
    /// Default: `None`.
    pub step: Option<f64>,

    /// Sampling rate of the input in Hz.
    ///
    /// Default: `128.0`.
    pub sample_rate: f64,

    /// Group-identifier addressing mode.
    ///
    /// Default: [`GroupMode::Trial`].
    pub group_mode: GroupMode,

    /// When `Some(seed)`, one random permutation of the segment order is
    /// drawn from a seeded [`StdRng`] and applied identically to groups,
    /// data and labels.
    ///
    /// Default: `None` (original order).
    pub shuffle_seed: Option<u64>,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        SegmentConfig {
            window: 1.0,
            step: None,
            sample_rate: 128.0,
            group_mode: GroupMode::Trial,
            shuffle_seed: None,
        }
    }
}

/// Output of [`segment`]: aligned groups, windowed data and replicated labels.
#[derive(Debug, Clone)]
pub struct Segmented {
    /// `(n_segments, 1)` for [`GroupMode::Trial`]/[`GroupMode::Slice`],
    /// `(n_segments, 2)` for [`GroupMode::Both`]. Values are 1-based.
    pub groups: Array2<u32>,
    /// `(trial * slice, channel, window_samples)`.
    pub data: Array3<f64>,
    /// Per-trial labels replicated over slices, `None` when not supplied.
    pub labels: Option<ArrayD<f64>>,
}

/// Split a `(trial, channel, sample)` recording into fixed-length windows.
///
/// Window starts advance by `step` samples from 0; a window is emitted while
/// `start + window <= n_samples`. A recording shorter than one window still
/// yields a single (short) segment covering what there is.
///
/// # Errors
///
/// * [`Error::Rank`] when `signal` does not have exactly 3 axes.
/// * [`Error::LabelMismatch`] when `labels.shape()[0]` differs from the
///   trial count.
/// * [`Error::Parameter`] for non-positive window, step or sample rate.
pub fn segment<S, D>(
    signal: &ArrayBase<S, D>,
    labels: Option<&ArrayD<f64>>,
    cfg: &SegmentConfig,
) -> Result<Segmented>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if signal.ndim() != 3 {
        return Err(Error::Rank { expected: 3, got: signal.ndim() });
    }
    let signal = signal
        .view()
        .into_dimensionality::<Ix3>()
        .map_err(|_| Error::Rank { expected: 3, got: signal.ndim() })?;
    let (trials, channels, samples) = signal.dim();

    if cfg.window <= 0.0 || cfg.sample_rate <= 0.0 || cfg.step.is_some_and(|s| s <= 0.0) {
        return Err(Error::Parameter(
            "window, step and sample_rate must be positive".into(),
        ));
    }
    let window_n = (cfg.window * cfg.sample_rate) as usize;
    let step_n = (cfg.step.unwrap_or(cfg.window) * cfg.sample_rate) as usize;
    if window_n == 0 || step_n == 0 {
        return Err(Error::Parameter(format!(
            "window ({} s) and step at {} Hz are below one sample",
            cfg.window, cfg.sample_rate
        )));
    }

    if let Some(l) = labels {
        if l.shape()[0] != trials {
            return Err(Error::LabelMismatch { labels: l.shape()[0], trials });
        }
    }

    // Window start offsets. A recording shorter than one window still emits
    // a single (truncated) segment.
    let mut starts = Vec::new();
    let mut start = 0usize;
    while start + window_n <= samples {
        starts.push(start);
        start += step_n;
    }
    let (slice_count, win_len) = if starts.is_empty() {
        (1, samples)
    } else {
        (starts.len(), window_n)
    };
    let starts = if starts.is_empty() { vec![0] } else { starts };

    let n_segments = trials * slice_count;
    let mut data = Array3::<f64>::zeros((n_segments, channels, win_len));
    for t in 0..trials {
        for (si, &st) in starts.iter().enumerate() {
            data.index_axis_mut(Axis(0), t * slice_count + si)
                .assign(&signal.slice(ndarray::s![t, .., st..st + win_len]));
        }
    }

    let groups = build_groups(trials, slice_count, cfg.group_mode);

    let labels = labels.map(|l| replicate_labels(l, slice_count));

    let mut out = Segmented { groups, data, labels };
    if let Some(seed) = cfg.shuffle_seed {
        let mut index: Vec<usize> = (0..n_segments).collect();
        index.shuffle(&mut StdRng::seed_from_u64(seed));
        out.groups = out.groups.select(Axis(0), &index);
        out.data = out.data.select(Axis(0), &index);
        out.labels = out.labels.map(|l| l.select(Axis(0), &index));
    }
    Ok(out)
}

/// Slice `[start, stop)` seconds off the trailing axis of a tensor.
///
/// With `stop = None` the range is `[0, start)`, mirroring a plain "keep the
/// first N seconds" call. Out-of-range bounds are clamped to the signal.
pub fn intercept_signal<S, D>(
    signal: &ArrayBase<S, D>,
    start: f64,
    stop: Option<f64>,
    sample_rate: f64,
) -> Result<ndarray::Array<f64, D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if sample_rate <= 0.0 || start < 0.0 || stop.is_some_and(|s| s < 0.0) {
        return Err(Error::Parameter(
            "start/stop must be non-negative and sample_rate positive".into(),
        ));
    }
    let (start, stop) = match stop {
        Some(stop) => (start, stop),
        None => (0.0, start),
    };
    let samples = signal.len_of(Axis(signal.ndim() - 1));
    let p0 = ((start * sample_rate) as usize).min(samples);
    let p1 = ((stop * sample_rate) as usize).min(samples).max(p0);
    let ax = Axis(signal.ndim() - 1);
    Ok(signal
        .slice_axis(ax, Slice::from(p0..p1))
        .to_owned())
}

fn build_groups(trials: usize, slices: usize, mode: GroupMode) -> Array2<u32> {
    let n = trials * slices;
    match mode {
        GroupMode::Trial => {
            Array2::from_shape_fn((n, 1), |(i, _)| (i / slices) as u32 + 1)
        }
        GroupMode::Slice => {
            Array2::from_shape_fn((n, 1), |(i, _)| (i % slices) as u32 + 1)
        }
        GroupMode::Both => Array2::from_shape_fn((n, 2), |(i, c)| {
            if c == 0 {
                (i / slices) as u32 + 1
            } else {
                (i % slices) as u32 + 1
            }
        }),
    }
}

/// Repeat each trial's label `slices` times along axis 0, in the same order
/// as [`GroupMode::Trial`] group assignment.
fn replicate_labels(labels: &ArrayD<f64>, slices: usize) -> ArrayD<f64> {
    let trials = labels.shape()[0];
    let mut shape = labels.shape().to_vec();
    shape[0] = trials * slices;
    let mut out = ArrayD::<f64>::zeros(shape);
    for t in 0..trials {
        let src = labels.index_axis(Axis(0), t);
        for s in 0..slices {
            out.index_axis_mut(Axis(0), t * slices + s).assign(&src);
        }
    }
    out
}
