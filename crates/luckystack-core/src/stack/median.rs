use ndarray::{Array3, ArrayView3};

use crate::error::Result;
use crate::sample::Sample;

use super::reduce::{reduce_layers, PixelEstimate};

/// Stack layers by taking the median at each pixel and channel.
pub fn median_stack<S: Sample>(layers: &[ArrayView3<'_, S>]) -> Result<Array3<S>> {
    Ok(reduce_layers(layers, |samples| PixelEstimate::exact(median_sorted(samples)))?.data)
}

/// Median of an ascending, non-empty slice. Even counts average the two
/// central samples.
pub(crate) fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}
