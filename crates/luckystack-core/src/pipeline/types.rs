use crate::frame::{AlignmentOffset, CompositeFrame};
use crate::sample::Sample;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Reading,
    Cropping,
    QualityAssessment,
    FrameSelection,
    Alignment,
    Stacking,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reading => write!(f, "Reading frames"),
            Self::Cropping => write!(f, "Cropping"),
            Self::QualityAssessment => write!(f, "Assessing quality"),
            Self::FrameSelection => write!(f, "Selecting best frames"),
            Self::Alignment => write!(f, "Aligning frames"),
            Self::Stacking => write!(f, "Stacking"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Result of a stacking run.
#[derive(Clone, Debug)]
pub struct StackOutput<S: Sample = u8> {
    pub composite: CompositeFrame<S>,
    /// Input position of the frame every other frame was aligned to.
    pub template_index: usize,
    /// (input position, offset) for every stacked frame, in input order.
    pub offsets: Vec<(usize, AlignmentOffset)>,
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., frame count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// Progress reporter that ignores every event.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
