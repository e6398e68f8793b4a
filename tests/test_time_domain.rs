use eegfeat::{higher_order_crossing, higuchi_fd, hjorth, sevcik_fd, statistics};
use ndarray::{Array1, Array3, Array4, IxDyn};

fn noisy_batch() -> Array3<f64> {
    // Deterministic pseudo-noise: sum of incommensurate sines.
    Array3::from_shape_fn((2, 3, 256), |(t, c, s)| {
        let x = s as f64;
        ((x * 0.37 + t as f64).sin() + (x * 1.93 + c as f64).sin() * 0.5).sin()
    })
}

#[test]
fn statistics_on_constant_segment() {
    let dc = Array3::from_elem((2, 2, 128), 4.0);
    let f = statistics(&dc, true);
    assert_eq!(f.shape(), &[2, 2, 7]);
    for t in 0..2 {
        for c in 0..2 {
            assert_eq!(f[[t, c, 0]], 16.0); // power
            assert_eq!(f[[t, c, 1]], 4.0); // mean
            assert_eq!(f[[t, c, 2]], 0.0); // std
            assert_eq!(f[[t, c, 3]], 0.0); // |Δ¹|
            assert!(f[[t, c, 4]].is_nan()); // |Δ¹|/std = 0/0
            assert_eq!(f[[t, c, 5]], 0.0); // |Δ²|
            assert!(f[[t, c, 6]].is_nan());
        }
    }
}

#[test]
fn hjorth_on_constant_segment() {
    let dc = Array3::from_elem((1, 2, 128), -3.0);
    let f = hjorth(&dc, true);
    assert_eq!(f.shape(), &[1, 2, 3]);
    for c in 0..2 {
        assert_eq!(f[[0, c, 0]], 0.0); // activity
        assert!(f[[0, c, 1]].is_nan()); // mobility = sqrt(0/0)
        assert!(f[[0, c, 2]].is_nan());
    }
}

#[test]
fn hoc_zero_for_positive_monotone_ramp() {
    // A strictly increasing, all-positive ramp: the 0th-order difference is
    // the signal itself, its >=0 thresholding is constant, so no crossings.
    let ramp = Array1::from_shape_fn(128, |i| 1.0 + i as f64);
    let f = higher_order_crossing(&ramp, 1, false).unwrap();
    assert_eq!(f[[0]], 0.0);
}

#[test]
fn hoc_one_for_sign_crossing_ramp() {
    // Crossing zero once flips the thresholded sequence exactly once.
    let ramp = Array1::from_shape_fn(128, |i| i as f64 - 63.5);
    let f = higher_order_crossing(&ramp, 1, false).unwrap();
    assert_eq!(f[[0]], 1.0);
}

#[test]
fn hoc_orders_are_independent_counts() {
    let f = higher_order_crossing(&noisy_batch(), 10, true).unwrap();
    assert_eq!(f.shape(), &[2, 3, 10]);
    for &v in f.iter() {
        assert!(v >= 0.0 && v.fract() == 0.0, "count must be integral, got {v}");
    }
}

#[test]
fn sevcik_of_ramp_is_close_to_one() {
    let ramp = Array1::from_shape_fn(8192, |i| i as f64 * 0.01);
    let f = sevcik_fd(&ramp, true);
    let fd = f[IxDyn(&[])];
    assert!(fd > 1.0 && fd < 1.05, "ramp fractal dimension = {fd}");
}

#[test]
fn sevcik_noisy_signal_exceeds_ramp() {
    let ramp = Array1::from_shape_fn(4096, |i| i as f64);
    let noisy = Array1::from_shape_fn(4096, |i| ((i as f64 * 12.9898).sin() * 43_758.5453).fract());
    let fd_ramp = sevcik_fd(&ramp, true)[IxDyn(&[])];
    let fd_noisy = sevcik_fd(&noisy, true)[IxDyn(&[])];
    assert!(fd_noisy > fd_ramp + 0.1, "ramp={fd_ramp} noisy={fd_noisy}");
}

#[test]
fn higuchi_separates_smooth_from_rough() {
    let smooth = Array1::from_shape_fn(2048, |i| (i as f64 * 0.01).sin());
    let rough =
        Array1::from_shape_fn(2048, |i| ((i as f64 * 12.9898).sin() * 43_758.5453).fract());
    let fd_smooth = higuchi_fd(&smooth, 10, true).unwrap()[IxDyn(&[])];
    let fd_rough = higuchi_fd(&rough, 10, true).unwrap()[IxDyn(&[])];
    assert!(fd_smooth < 1.3, "smooth fd = {fd_smooth}");
    // The hash signal measures ~1.65 at k_max = 10; a rougher-than-smooth
    // bound with margin, not a white-noise ideal of 2.
    assert!(fd_rough > 1.5, "rough fd = {fd_rough}");
    assert!(fd_rough > fd_smooth + 0.3, "rough {fd_rough} vs smooth {fd_smooth}");
}

#[test]
fn all_families_preserve_rank_four_batches() {
    // (trial, slice, channel, samples) — no feature function may assume
    // rank 3.
    let x = Array4::from_shape_fn((2, 3, 4, 128), |(a, b, c, s)| {
        ((s * (a + b + c + 1)) as f64 * 0.1).sin()
    });
    assert_eq!(statistics(&x, true).shape(), &[2, 3, 4, 7]);
    assert_eq!(hjorth(&x, true).shape(), &[2, 3, 4, 3]);
    assert_eq!(
        higher_order_crossing(&x, 5, true).unwrap().shape(),
        &[2, 3, 4, 5]
    );
    assert_eq!(sevcik_fd(&x, true).shape(), &[2, 3, 4]);
    assert_eq!(sevcik_fd(&x, false).shape(), &[2, 3, 4, 1]);
    assert_eq!(higuchi_fd(&x, 6, true).unwrap().shape(), &[2, 3, 4]);
}

#[test]
fn higuchi_requires_two_regression_points() {
    let x = Array1::from_shape_fn(64, |i| i as f64);
    assert!(higuchi_fd(&x, 1, true).is_err());
    assert!(higuchi_fd(&x, 2, true).is_ok());
}
