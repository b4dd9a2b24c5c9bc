use ndarray::{Array3, ArrayView3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::DEFAULT_CLIP_SIGMA;
use crate::error::{LuckyError, Result};
use crate::sample::Sample;

use super::median::median_sorted;
use super::reduce::{reduce_layers, PixelEstimate};

/// Parameters for sigma-clipped mean stacking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SigmaClipParams {
    /// Clipping coefficient k: values beyond mean +/- k*stddev are rejected (default: 2.0).
    pub sigma: f64,
}

impl Default for SigmaClipParams {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_CLIP_SIGMA,
        }
    }
}

impl SigmaClipParams {
    pub fn validate(&self) -> Result<()> {
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(LuckyError::invalid_input(format!(
                "sigma clipping coefficient must be finite and >= 0, got {}",
                self.sigma
            )));
        }
        Ok(())
    }
}

/// Stack layers using a single-pass sigma-clipped mean.
///
/// Per pixel and channel: compute mean and population stddev of all N
/// samples, average the samples inside [mean - k*stddev, mean + k*stddev].
/// Mean and stddev are not re-estimated from the survivors. When no sample
/// survives, the median of all N samples is used instead. Identical samples
/// pass through unchanged.
pub fn sigma_clip_stack<S: Sample>(
    layers: &[ArrayView3<'_, S>],
    params: &SigmaClipParams,
) -> Result<Array3<S>> {
    params.validate()?;

    let sigma = params.sigma;
    let reduced = reduce_layers(layers, |samples| clip_sorted(samples, sigma))?;
    if reduced.fallbacks > 0 {
        warn!(
            samples = reduced.fallbacks,
            sigma, "Sigma band rejected every sample, used median instead"
        );
    }
    Ok(reduced.data)
}

fn clip_sorted(sorted: &[f64], sigma: f64) -> PixelEstimate {
    let n = sorted.len();
    let (first, last) = (sorted[0], sorted[n - 1]);
    if first == last {
        return PixelEstimate::exact(first);
    }

    let count = n as f64;
    let mean = sorted.iter().sum::<f64>() / count;
    let var = sorted
        .iter()
        .map(|&v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / count;
    let stddev = var.sqrt();
    if stddev == 0.0 {
        return PixelEstimate::exact(mean);
    }

    let lo = mean - sigma * stddev;
    let hi = mean + sigma * stddev;

    let mut sum = 0.0f64;
    let mut kept = 0usize;
    for &v in sorted.iter().filter(|&&v| v >= lo && v <= hi) {
        sum += v;
        kept += 1;
    }

    if kept > 0 {
        PixelEstimate::exact(sum / kept as f64)
    } else {
        PixelEstimate::fallback(median_sorted(sorted))
    }
}
