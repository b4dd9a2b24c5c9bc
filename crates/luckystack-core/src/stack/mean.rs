use ndarray::{Array3, ArrayView3};

use crate::error::Result;
use crate::sample::Sample;

use super::reduce::{reduce_layers, PixelEstimate};

/// Stack layers by computing the mean at each pixel and channel.
pub fn mean_stack<S: Sample>(layers: &[ArrayView3<'_, S>]) -> Result<Array3<S>> {
    let reduced = reduce_layers(layers, |samples| {
        PixelEstimate::exact(samples.iter().sum::<f64>() / samples.len() as f64)
    })?;
    Ok(reduced.data)
}
