//! Rating-to-class relabeling.
use ndarray::{Array, ArrayBase, Data, Dimension};

/// Threshold continuous ratings into binary classes.
///
/// Values below `threshold` map to `1.0`, values at or above it to `0.0`
/// (low ratings are the positive class). The input is never mutated.
///
/// ```
/// use eegfeat::label_binarizer;
/// use ndarray::array;
///
/// let y = label_binarizer(&array![2.0, 5.0, 8.9], 5.0);
/// assert_eq!(y, array![1.0, 0.0, 0.0]);
/// ```
pub fn label_binarizer<S, D>(labels: &ArrayBase<S, D>, threshold: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    labels.mapv(|v| if v < threshold { 1.0 } else { 0.0 })
}
