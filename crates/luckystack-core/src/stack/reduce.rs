use ndarray::{Array3, ArrayView3, ArrayViewMut2, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{LuckyError, Result};
use crate::frame::FrameShape;
use crate::sample::Sample;

/// Per-pixel estimate produced by a reducer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PixelEstimate {
    pub value: f64,
    /// The reducer had to fall back to its robust default.
    pub fallback: bool,
}

impl PixelEstimate {
    pub fn exact(value: f64) -> Self {
        Self {
            value,
            fallback: false,
        }
    }

    pub fn fallback(value: f64) -> Self {
        Self {
            value,
            fallback: true,
        }
    }
}

/// Result of reducing a stack of layers.
pub(crate) struct Reduced<S: Sample> {
    pub data: Array3<S>,
    pub fallbacks: usize,
}

/// Verify every layer matches the first one's geometry.
pub(crate) fn check_geometry<S: Sample>(layers: &[ArrayView3<'_, S>]) -> Result<FrameShape> {
    let first = layers.first().ok_or(LuckyError::EmptyInput)?;
    let expected: FrameShape = first.dim().into();
    if expected.area() == 0 || expected.channels == 0 {
        return Err(LuckyError::InvalidGeometry {
            index: Some(0),
            width: expected.width,
            height: expected.height,
        });
    }

    for (index, layer) in layers.iter().enumerate().skip(1) {
        let found: FrameShape = layer.dim().into();
        if found != expected {
            return Err(LuckyError::ShapeMismatch {
                index,
                expected,
                found,
            });
        }
    }
    Ok(expected)
}

/// Reduce N equally shaped layers into one, pixel by pixel and channel by
/// channel.
///
/// The reducer sees the N samples widened to `f64` and sorted ascending, so
/// its result does not depend on the order of `layers`. Rows are processed
/// in parallel for large images; each output row belongs to exactly one task.
pub(crate) fn reduce_layers<S, F>(layers: &[ArrayView3<'_, S>], reducer: F) -> Result<Reduced<S>>
where
    S: Sample,
    F: Fn(&[f64]) -> PixelEstimate + Sync,
{
    let shape = check_geometry(layers)?;
    let n = layers.len();
    let mut data = Array3::<S>::default((shape.height, shape.width, shape.channels));

    let reduce_row = |(row, mut out_row): (usize, ArrayViewMut2<'_, S>)| -> usize {
        let mut samples = vec![0.0f64; n];
        let mut fallbacks = 0;
        for col in 0..shape.width {
            for ch in 0..shape.channels {
                for (slot, layer) in samples.iter_mut().zip(layers) {
                    *slot = layer[[row, col, ch]].to_working();
                }
                samples.sort_unstable_by(f64::total_cmp);

                let estimate = reducer(&samples);
                if estimate.fallback {
                    fallbacks += 1;
                }
                out_row[[col, ch]] = S::from_working(estimate.value);
            }
        }
        fallbacks
    };

    let fallbacks: usize = if shape.area() >= PARALLEL_PIXEL_THRESHOLD && n > 1 {
        data.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .map(reduce_row)
            .sum()
    } else {
        data.axis_iter_mut(Axis(0))
            .enumerate()
            .map(reduce_row)
            .sum()
    };

    Ok(Reduced { data, fallbacks })
}
