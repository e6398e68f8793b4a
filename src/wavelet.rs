//! Wavelet sub-band energy features.
//!
//! A 4-level discrete wavelet decomposition with the Daubechies db4 wavelet
//! (8 taps) splits each segment into one approximation band and four detail
//! bands. The feature vector is the five relative sub-band energies followed
//! by their Shannon entropy.
//!
//! The decomposition uses half-sample symmetric signal extension and
//! `floor((n + taps - 1) / 2)` coefficients per level, so the sub-band
//! lengths match the usual pywt/MATLAB convention.
use ndarray::{ArrayBase, ArrayD, Axis, Data, Dimension, Zip};

use crate::error::{Error, Result};
use crate::tensor::{collapse_singleton, last_axis};

/// db4 decomposition low-pass (scaling) filter, ascending index order.
const DB4_DEC_LO: [f64; 8] = [
    -0.010597401784997278,
    0.032883011666982945,
    0.030841381835986965,
    -0.18703481171888114,
    -0.02798376941698385,
    0.6308807679295904,
    0.7148465705525415,
    0.23037781330885523,
];

/// db4 decomposition high-pass (wavelet) filter, quadrature mirror of the
/// low-pass: `hi[k] = (-1)^k · lo[taps-1-k]`.
const DB4_DEC_HI: [f64; 8] = [
    -0.23037781330885523,
    0.7148465705525415,
    -0.6308807679295904,
    -0.02798376941698385,
    0.18703481171888114,
    0.030841381835986965,
    -0.032883011666982945,
    -0.010597401784997278,
];

/// One db4 analysis step: approximation and detail coefficients of `x`.
///
/// Both outputs have `floor((x.len() + 7) / 2)` samples.
pub fn dwt_1d(x: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let taps = DB4_DEC_LO.len();
    let n = x.len();
    let out_len = (n + taps - 1) / 2;
    let mut approx = Vec::with_capacity(out_len);
    let mut detail = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let mut a = 0.0;
        let mut d = 0.0;
        for (k, (&lo, &hi)) in DB4_DEC_LO.iter().zip(DB4_DEC_HI.iter()).enumerate() {
            let v = sym_sample(x, 2 * i as isize + 1 - k as isize);
            a += lo * v;
            d += hi * v;
        }
        approx.push(a);
        detail.push(d);
    }
    (approx, detail)
}

/// Multi-level db4 decomposition.
///
/// Returns `levels + 1` coefficient vectors ordered coarse-to-fine:
/// `[cA_L, cD_L, cD_{L-1}, ..., cD_1]`, the `wavedec` convention.
///
/// # Errors
///
/// [`Error::Parameter`] when `levels == 0`.
pub fn wavedec_1d(x: &[f64], levels: usize) -> Result<Vec<Vec<f64>>> {
    if levels == 0 {
        return Err(Error::Parameter("wavedec needs at least 1 level".into()));
    }
    Ok(decompose(x, levels))
}

fn decompose(x: &[f64], levels: usize) -> Vec<Vec<f64>> {
    let mut details = Vec::with_capacity(levels + 1);
    let mut approx = x.to_vec();
    for _ in 0..levels {
        let (a, d) = dwt_1d(&approx);
        details.push(d);
        approx = a;
    }
    let mut bands = vec![approx];
    bands.extend(details.into_iter().rev());
    bands
}

/// Relative wavelet energies and their entropy, six features per segment.
///
/// The signal is decomposed into 4 db4 levels; each band's energy (sum of
/// squared coefficients) is divided by the total over all five bands, and
/// the Shannon entropy `-Σ p·log2(p)` of that distribution is appended.
/// Feature order: `[cA4, cD4, cD3, cD2, cD1, entropy]`.
///
/// A zero-energy (all-zero) segment divides by zero and propagates NaN
/// through all six features. A single sub-band with exactly zero energy
/// against a nonzero total likewise turns the entropy into NaN
/// (`0 · log2(0)` is not evaluated as a limit); in practice the db4
/// filter's rounding keeps real-signal band energies nonzero.
pub fn wavelet_features<S, D>(data: &ArrayBase<S, D>, combined: bool) -> ArrayD<f64>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let x = data.view().into_dyn();
    let ax = last_axis(&x.view());

    let mut shape = x.shape().to_vec();
    let nd = shape.len();
    shape[nd - 1] = 6;
    let mut out = ArrayD::<f64>::zeros(shape);
    Zip::from(out.lanes_mut(Axis(nd - 1))).and(x.lanes(ax)).for_each(|mut o, lane| {
        let samples: Vec<f64> = lane.iter().cloned().collect();
        let bands = decompose(&samples, 4);
        let energies: Vec<f64> = bands
            .iter()
            .map(|b| b.iter().map(|c| c * c).sum::<f64>())
            .collect();
        let total: f64 = energies.iter().sum();
        let mut entropy = 0.0;
        for (slot, e) in o.iter_mut().zip(&energies) {
            let p = e / total;
            *slot = p;
            entropy -= p * p.log2();
        }
        o[5] = entropy;
    });

    // Same `combined` policy as every other family; a 6-feature axis never
    // collapses.
    collapse_singleton(out, combined)
}

/// Sample `x` at a possibly out-of-range index under half-sample symmetric
/// extension (`… x1 x0 | x0 x1 … x_{n-1} | x_{n-1} x_{n-2} …`).
fn sym_sample(x: &[f64], idx: isize) -> f64 {
    let n = x.len() as isize;
    let period = 2 * n;
    let mut j = idx.rem_euclid(period);
    if j >= n {
        j = period - 1 - j;
    }
    x[j as usize]
}
