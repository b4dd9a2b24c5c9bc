use std::sync::Arc;

use tracing::info;

use crate::align::align_with_progress;
use crate::error::{LuckyError, Result};
use crate::frame::Frame;
use crate::io::crop::crop_frames;
use crate::io::image_io::{load_frames_from_dir, save_composite};
use crate::quality::{score_frames_with_progress, select_best};
use crate::sample::Sample;
use crate::stack::stack;

use super::config::PipelineConfig;
use super::types::{NoOpReporter, PipelineStage, ProgressReporter, StackOutput};

/// Score, select, align and stack an in-memory frame sequence.
///
/// Each stage finishes completely before the next one starts. `config.input`,
/// `config.output` and `config.crop` are not used here.
pub fn run_stack<S: Sample>(
    frames: Vec<Frame<S>>,
    config: &PipelineConfig,
    reporter: &dyn ProgressReporter,
) -> Result<StackOutput<S>> {
    let total = frames.len();

    reporter.begin_stage(PipelineStage::QualityAssessment, Some(total));
    let scored = score_frames_with_progress(frames, &config.quality, |done| {
        reporter.advance(done)
    })?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::FrameSelection, None);
    let selected = select_best(scored, config.frame_selection.select_percentage);
    info!(selected = selected.len(), total, "Selected best frames");
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Alignment, Some(selected.len()));
    let (aligned, template_index) = align_with_progress(selected, |done| reporter.advance(done))?;
    let template_index = template_index.ok_or(LuckyError::EmptyInput)?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Stacking, None);
    let composite = stack(&aligned, &config.stacking)?;
    reporter.finish_stage();

    let offsets = aligned
        .iter()
        .map(|f| (f.source_index(), f.offset()))
        .collect();

    Ok(StackOutput {
        composite,
        template_index,
        offsets,
    })
}

/// Run the full pipeline from an input directory to a written composite,
/// with a thread-safe progress reporter.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<StackOutput> {
    reporter.begin_stage(PipelineStage::Reading, None);
    let frames = load_frames_from_dir(&config.input)?;
    info!(
        frames = frames.len(),
        input = %config.input.display(),
        "Loaded frames"
    );
    reporter.finish_stage();

    let frames = match &config.crop {
        Some(crop) => {
            reporter.begin_stage(PipelineStage::Cropping, Some(frames.len()));
            let cropped = crop_frames(frames, crop)?;
            reporter.finish_stage();
            cropped
        }
        None => frames,
    };

    let output = run_stack(frames, config, reporter.as_ref())?;

    reporter.begin_stage(PipelineStage::Writing, None);
    save_composite(&output.composite, &config.output)?;
    info!(output = %config.output.display(), "Saved composite");
    reporter.finish_stage();

    Ok(output)
}

/// Run the full pipeline without progress reporting.
pub fn run_pipeline(config: &PipelineConfig) -> Result<StackOutput> {
    run_pipeline_reported(config, Arc::new(NoOpReporter))
}
