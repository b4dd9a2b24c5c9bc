pub mod laplacian;
pub mod scoring;
pub mod stats;

pub use scoring::{
    rank_frames, score_frame, score_frames, score_frames_with_progress, select_best,
    QualityWeights,
};
