//! # eegfeat — batched EEG feature extraction in pure Rust
//!
//! `eegfeat` turns multi-channel physiological recordings (EEG and
//! peripheral signals) into per-segment feature tensors for downstream
//! classification. It covers segmentation plus seven descriptor families;
//! model training and dataset file parsing are out of scope.
//!
//! ## Pipeline overview
//!
//! ```text
//! (trial, channel, sample) f64
//!   │
//!   ├─ label_binarizer        optional rating → class relabeling
//!   ├─ intercept_signal       optional [start, stop) seconds trim
//!   ├─ segment                fixed windows → (trial·slice, channel, win)
//!   │                          + 1-based group ids + replicated labels
//!   │
//!   ├─ statistics             7  power/mean/std/diff features
//!   ├─ hjorth                 3  activity/mobility/complexity
//!   ├─ higher_order_crossing  k  thresholded-difference crossing counts
//!   ├─ sevcik_fd              1  path-length fractal dimension
//!   ├─ higuchi_fd             1  multi-scale fractal dimension
//!   ├─ bin_power              |band|-1 raw FFT band magnitudes
//!   ├─ power_spectral_density Welch band power (legacy or full bands)
//!   └─ wavelet_features       6  db4 relative energies + entropy
//! ```
//!
//! Every feature function reduces along the **last** axis and preserves all
//! leading batch axes, whatever their number: `(..., samples)` in,
//! `(..., n_features)` out. With `combined = true` a trailing feature axis
//! of length 1 is collapsed back into the batch, so the single-feature
//! families return plain `(..., channels)` tensors.
//!
//! ## Quick start
//!
//! ```
//! use eegfeat::{segment, statistics, SegmentConfig};
//! use ndarray::Array3;
//!
//! // 2 trials, 4 channels, 2 s at 128 Hz.
//! let signal = Array3::<f64>::from_shape_fn((2, 4, 256), |(t, c, s)| {
//!     ((s * (t + c + 1)) as f64 * 0.05).sin()
//! });
//!
//! let out = segment(&signal, None, &SegmentConfig::default()).unwrap();
//! assert_eq!(out.data.dim(), (4, 4, 128)); // 2 trials × 2 one-second slices
//!
//! let f = statistics(&out.data, true);
//! assert_eq!(f.shape(), &[4, 4, 7]);
//! ```
//!
//! ## Degenerate inputs
//!
//! Flat or zero-energy segments are legitimate inputs: variance-normalised
//! and log-based features propagate IEEE NaN/Inf instead of raising, so a
//! batch never fails on a pathological segment. Structural problems (wrong
//! rank, bad parameters) fail fast with [`Error`] before any computation.

pub mod error;
pub mod frequency;
pub mod label;
pub mod segment;
mod tensor;
pub mod time_domain;
pub mod wavelet;

// ── Crate-root re-exports ─────────────────────────────────────────────────
//
// Everything a downstream user is likely to need is available directly as
// `eegfeat::foo` without having to know the internal module layout.

// error
pub use error::{Error, Result};

// segmentation
pub use segment::{intercept_signal, segment, GroupMode, SegmentConfig, Segmented};

// labels
pub use label::label_binarizer;

// time domain
pub use time_domain::{higher_order_crossing, higuchi_fd, hjorth, sevcik_fd, statistics};

// frequency domain
pub use frequency::{bin_power, power_spectral_density, PsdBandMode};

// wavelet
pub use wavelet::{dwt_1d, wavedec_1d, wavelet_features};
