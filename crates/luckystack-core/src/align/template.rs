use crate::error::{LuckyError, Result};
use crate::frame::ScoredFrame;
use crate::sample::Sample;

/// Position of the highest-scoring frame, used as the alignment template.
///
/// Equal scores resolve to the earliest frame.
pub fn select_template<S: Sample>(frames: &[ScoredFrame<S>]) -> Result<usize> {
    let mut best: Option<usize> = None;
    for (i, frame) in frames.iter().enumerate() {
        match best {
            Some(b) if frame <= &frames[b] => {}
            _ => best = Some(i),
        }
    }
    best.ok_or(LuckyError::EmptyInput)
}
