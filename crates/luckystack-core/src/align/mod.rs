pub mod phase_correlation;
pub mod subpixel;
pub mod template;
pub mod warp;

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::{LuckyError, Result};
use crate::frame::{AlignedFrame, AlignmentOffset, Frame, FrameShape, ScoredFrame};
use crate::sample::Sample;

pub use phase_correlation::{compute_offset, PhaseCorrelator};
pub use template::select_template;
pub use warp::{bilinear_sample, shift_frame};

/// Pick the best-scoring frame as template and align every frame to it.
///
/// The result keeps input order and every frame shares the template's
/// geometry. An empty input yields an empty output.
pub fn align<S: Sample>(frames: Vec<ScoredFrame<S>>) -> Result<Vec<AlignedFrame<S>>> {
    align_with_progress(frames, |_| {}).map(|(aligned, _)| aligned)
}

/// [`align`] with per-frame progress reporting.
///
/// Calls `on_frame_done(items_done)` as each frame is aligned. Also returns
/// the source index of the chosen template, `None` for an empty input.
pub fn align_with_progress<S: Sample>(
    frames: Vec<ScoredFrame<S>>,
    on_frame_done: impl Fn(usize) + Send + Sync,
) -> Result<(Vec<AlignedFrame<S>>, Option<usize>)> {
    if frames.is_empty() {
        return Ok((Vec::new(), None));
    }

    let template_pos = select_template(&frames)?;
    let template = frames[template_pos].frame();
    let template_index = frames[template_pos].index();
    info!(
        template = template_index,
        quality = frames[template_pos].quality(),
        frames = frames.len(),
        "Selected alignment template"
    );

    let target = TemplateTarget::new(template).map_err(|e| e.at_frame(template_index))?;
    let candidates = frames
        .into_iter()
        .map(|f| {
            let index = f.index();
            (index, f.into_frame())
        })
        .collect();

    let aligned = target.align_all(candidates, Some(template_index), on_frame_done)?;
    Ok((aligned, Some(template_index)))
}

/// Align `frames` to an externally chosen template.
///
/// Source indices of the result are positions in `frames`.
pub fn align_to_template<S: Sample>(
    template: &Frame<S>,
    frames: Vec<Frame<S>>,
) -> Result<Vec<AlignedFrame<S>>> {
    if frames.is_empty() {
        return Ok(Vec::new());
    }
    let target = TemplateTarget::new(template)?;
    target.align_all(frames.into_iter().enumerate().collect(), None, |_| {})
}

/// Read-only state shared by every alignment worker.
struct TemplateTarget {
    correlator: PhaseCorrelator,
    shape: FrameShape,
}

impl TemplateTarget {
    fn new<S: Sample>(template: &Frame<S>) -> Result<Self> {
        if template.is_empty() {
            return Err(LuckyError::InvalidGeometry {
                index: None,
                width: template.width(),
                height: template.height(),
            });
        }
        Ok(Self {
            correlator: PhaseCorrelator::new(template.gray())?,
            shape: template.shape(),
        })
    }

    fn align_all<S: Sample>(
        &self,
        frames: Vec<(usize, Frame<S>)>,
        template_index: Option<usize>,
        on_frame_done: impl Fn(usize) + Send + Sync,
    ) -> Result<Vec<AlignedFrame<S>>> {
        let counter = AtomicUsize::new(0);
        let align_one = |(index, frame): (usize, Frame<S>)| -> Result<AlignedFrame<S>> {
            let aligned = if Some(index) == template_index {
                AlignedFrame::new(frame, AlignmentOffset::default(), index)
            } else {
                self.align_frame(frame, index)?
            };
            on_frame_done(counter.fetch_add(1, Ordering::Relaxed) + 1);
            Ok(aligned)
        };

        if frames.len() >= PARALLEL_FRAME_THRESHOLD {
            frames.into_par_iter().map(align_one).collect()
        } else {
            frames.into_iter().map(align_one).collect()
        }
    }

    fn align_frame<S: Sample>(&self, frame: Frame<S>, index: usize) -> Result<AlignedFrame<S>> {
        if frame.is_empty() {
            return Err(LuckyError::InvalidGeometry {
                index: Some(index),
                width: frame.width(),
                height: frame.height(),
            });
        }
        if frame.channels() != self.shape.channels {
            return Err(LuckyError::ShapeMismatch {
                index,
                expected: self.shape,
                found: frame.shape(),
            });
        }

        let offset = self
            .correlator
            .offset_to(frame.gray())
            .map_err(|e| e.at_frame(index))?;
        debug!(frame = index, dx = offset.dx, dy = offset.dy, "Computed offset");

        let shifted = shift_frame(&frame, &offset, (self.shape.height, self.shape.width))
            .map_err(|e| e.at_frame(index))?;
        Ok(AlignedFrame::new(shifted, offset, index))
    }
}
