pub mod mean;
pub mod median;
mod reduce;
pub mod sigma_clip;

use ndarray::ArrayView3;
use tracing::info;

use crate::error::Result;
use crate::frame::{AlignedFrame, CompositeFrame};
use crate::pipeline::config::{StackConfig, StackMethod};
use crate::sample::Sample;

pub use mean::mean_stack;
pub use median::median_stack;
pub use sigma_clip::{sigma_clip_stack, SigmaClipParams};

/// Combine an aligned frame set into one composite with the configured method.
///
/// Fails with `EmptyInput` for an empty set and `ShapeMismatch` when the
/// frames disagree in geometry. Either a complete composite is returned or
/// nothing.
pub fn stack<S: Sample>(
    aligned: &[AlignedFrame<S>],
    config: &StackConfig,
) -> Result<CompositeFrame<S>> {
    let layers: Vec<ArrayView3<'_, S>> = aligned.iter().map(|f| f.frame().color().view()).collect();
    info!(frames = layers.len(), method = %config.method, "Stacking");

    let data = match &config.method {
        StackMethod::SigmaClip(params) => sigma_clip_stack(&layers, params)?,
        StackMethod::Mean => mean_stack(&layers)?,
        StackMethod::Median => median_stack(&layers)?,
    };

    Ok(CompositeFrame::new(data, layers.len()))
}
