use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    DEFAULT_CONTRAST_WEIGHT, DEFAULT_SHARPNESS_WEIGHT, DEFAULT_SNR_WEIGHT,
    PARALLEL_FRAME_THRESHOLD, SNR_EPSILON,
};
use crate::error::{LuckyError, Result};
use crate::frame::{Frame, QualityScore, ScoredFrame};
use crate::sample::Sample;

use super::laplacian::sharpness;
use super::stats::mean_stddev;

/// Weights of the composite quality score. One value is shared by every frame
/// scored in a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityWeights {
    pub contrast: f64,
    pub sharpness: f64,
    pub snr: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            contrast: DEFAULT_CONTRAST_WEIGHT,
            sharpness: DEFAULT_SHARPNESS_WEIGHT,
            snr: DEFAULT_SNR_WEIGHT,
        }
    }
}

impl QualityWeights {
    /// Weighted sum of the three metrics.
    pub fn combine(&self, contrast: f64, sharpness: f64, snr: f64) -> f64 {
        self.contrast * contrast + self.sharpness * sharpness + self.snr * snr
    }
}

/// Score a grayscale raster: contrast, Laplacian sharpness and SNR folded
/// into one composite with `weights`.
pub fn score_frame<S: Sample>(gray: &Array2<S>, weights: &QualityWeights) -> Result<QualityScore> {
    if gray.is_empty() {
        return Err(LuckyError::invalid_input(format!(
            "cannot score a {}x{} raster",
            gray.ncols(),
            gray.nrows()
        )));
    }

    let (mean, stddev) = mean_stddev(gray);
    let contrast = stddev;
    let snr = mean / (stddev + SNR_EPSILON);
    let sharpness = sharpness(gray);

    Ok(QualityScore {
        contrast,
        sharpness,
        snr,
        composite: weights.combine(contrast, sharpness, snr),
    })
}

/// Score every frame, keeping input order.
pub fn score_frames<S: Sample>(
    frames: Vec<Frame<S>>,
    weights: &QualityWeights,
) -> Result<Vec<ScoredFrame<S>>> {
    score_frames_with_progress(frames, weights, |_| {})
}

/// Score every frame with per-frame progress reporting.
///
/// Calls `on_progress(items_done)` as each frame is scored. The first
/// failing frame's error carries its index.
pub fn score_frames_with_progress<S: Sample>(
    frames: Vec<Frame<S>>,
    weights: &QualityWeights,
    on_progress: impl Fn(usize) + Send + Sync,
) -> Result<Vec<ScoredFrame<S>>> {
    let done = AtomicUsize::new(0);
    let score_one = |(i, frame): (usize, Frame<S>)| -> Result<ScoredFrame<S>> {
        let scored = ScoredFrame::new(frame, i, weights)?;
        debug!(
            frame = i,
            contrast = scored.score().contrast,
            sharpness = scored.score().sharpness,
            snr = scored.score().snr,
            composite = scored.quality(),
            "Scored frame"
        );
        on_progress(done.fetch_add(1, Ordering::Relaxed) + 1);
        Ok(scored)
    };

    if frames.len() >= PARALLEL_FRAME_THRESHOLD {
        frames.into_par_iter().enumerate().map(score_one).collect()
    } else {
        frames.into_iter().enumerate().map(score_one).collect()
    }
}

/// Positions of `scored`, best quality first. Equal scores keep input order.
pub fn rank_frames<S: Sample>(scored: &[ScoredFrame<S>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scored.len()).collect();
    order.sort_by(|&a, &b| scored[b].cmp(&scored[a]));
    order
}

/// Keep the best `fraction` (0.0..=1.0) of frames, at least one when any
/// exist. Survivors stay in input order.
pub fn select_best<S: Sample>(scored: Vec<ScoredFrame<S>>, fraction: f32) -> Vec<ScoredFrame<S>> {
    let total = scored.len();
    let keep = ((total as f32 * fraction.clamp(0.0, 1.0)).ceil() as usize)
        .max(1)
        .min(total);
    if keep == total {
        return scored;
    }

    let mut kept = vec![false; total];
    for i in rank_frames(&scored).into_iter().take(keep) {
        kept[i] = true;
    }
    scored
        .into_iter()
        .zip(kept)
        .filter_map(|(frame, keep)| keep.then_some(frame))
        .collect()
}
