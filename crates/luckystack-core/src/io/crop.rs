//! Centroid crop: cut a fixed-size square around the bright target so every
//! frame handed to the stacker has the same geometry.

use ndarray::{Array2, Array3};
use rayon::prelude::*;
use tracing::debug;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{LuckyError, Result};
use crate::frame::Frame;
use crate::pipeline::config::CropConfig;
use crate::sample::Sample;

/// Intensity-weighted center of mass of the pixels brighter than
/// `threshold * max`, as `(row, col)`.
///
/// Returns `None` when the raster is empty or holds no positive intensity.
pub fn find_centroid<S: Sample>(gray: &Array2<S>, threshold: f64) -> Option<(f64, f64)> {
    let (h, w) = gray.dim();
    let max_val = gray
        .iter()
        .map(|v| v.to_working())
        .fold(f64::NEG_INFINITY, f64::max);
    if max_val.is_nan() || max_val <= 0.0 {
        return None;
    }
    let cutoff = threshold * max_val;

    let row_sums = |row: usize| {
        let mut sum_r = 0.0f64;
        let mut sum_c = 0.0f64;
        let mut sum_w = 0.0f64;
        for col in 0..w {
            let val = gray[[row, col]].to_working();
            if val > cutoff {
                sum_r += row as f64 * val;
                sum_c += col as f64 * val;
                sum_w += val;
            }
        }
        (sum_r, sum_c, sum_w)
    };
    let add = |(ar, ac, aw): (f64, f64, f64), (r, c, w): (f64, f64, f64)| (ar + r, ac + c, aw + w);

    let (total_r, total_c, total_w) = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<(f64, f64, f64)> = (0..h).into_par_iter().map(row_sums).collect();
        rows.into_iter().fold((0.0, 0.0, 0.0), add)
    } else {
        (0..h).map(row_sums).fold((0.0, 0.0, 0.0), add)
    };

    (total_w > 0.0).then(|| (total_r / total_w, total_c / total_w))
}

/// Cut a `size x size` square centered on the target's centroid.
///
/// `size` is clamped to the smaller image side. Parts of the square that
/// fall outside the image are filled with zero.
pub fn crop_to_target<S: Sample>(frame: &Frame<S>, config: &CropConfig) -> Result<Frame<S>> {
    let (h, w) = (frame.height(), frame.width());
    let size = config.size.min(h).min(w);
    if size == 0 {
        return Err(LuckyError::InvalidGeometry {
            index: None,
            width: w,
            height: h,
        });
    }

    let (cy, cx) =
        find_centroid(frame.gray(), config.threshold).ok_or(LuckyError::NoTarget { index: None })?;
    let top = cy.round() as i64 - (size / 2) as i64;
    let left = cx.round() as i64 - (size / 2) as i64;
    let source = |row: usize, col: usize| -> Option<(usize, usize)> {
        let r = top + row as i64;
        let c = left + col as i64;
        (r >= 0 && r < h as i64 && c >= 0 && c < w as i64).then_some((r as usize, c as usize))
    };

    let color = frame.color();
    let cropped_color = Array3::from_shape_fn((size, size, frame.channels()), |(row, col, ch)| {
        source(row, col)
            .map(|(r, c)| color[[r, c, ch]])
            .unwrap_or_default()
    });
    let gray = frame.gray();
    let cropped_gray = Array2::from_shape_fn((size, size), |(row, col)| {
        source(row, col).map(|(r, c)| gray[[r, c]]).unwrap_or_default()
    });

    debug!(cy, cx, size, "Cropped around centroid");
    Frame::new(cropped_color, cropped_gray)
}

/// Crop every frame; errors carry the offending frame's position.
pub fn crop_frames<S: Sample>(frames: Vec<Frame<S>>, config: &CropConfig) -> Result<Vec<Frame<S>>> {
    frames
        .into_par_iter()
        .enumerate()
        .map(|(i, frame)| crop_to_target(&frame, config).map_err(|e| e.at_frame(i)))
        .collect()
}
