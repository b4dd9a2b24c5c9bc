pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{run_pipeline, run_pipeline_reported, run_stack};
pub use types::{NoOpReporter, PipelineStage, ProgressReporter, StackOutput};
