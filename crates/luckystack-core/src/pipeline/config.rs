use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CENTROID_THRESHOLD, DEFAULT_CROP_SIZE};
use crate::quality::QualityWeights;
use crate::stack::sigma_clip::SigmaClipParams;

/// Everything one stacking run needs. Passed explicitly to the pipeline
/// entry point; nothing is read from global state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding the input frames.
    pub input: PathBuf,
    pub output: PathBuf,
    /// Crop every frame around the target before scoring. `None` stacks the
    /// frames as loaded.
    #[serde(default)]
    pub crop: Option<CropConfig>,
    #[serde(default)]
    pub frame_selection: FrameSelectionConfig,
    #[serde(default)]
    pub quality: QualityWeights,
    #[serde(default)]
    pub stacking: StackConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("frames"),
            output: PathBuf::from("stacked.png"),
            crop: Some(CropConfig::default()),
            frame_selection: FrameSelectionConfig::default(),
            quality: QualityWeights::default(),
            stacking: StackConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSelectionConfig {
    /// Fraction of frames to keep (0.0..1.0).
    pub select_percentage: f32,
}

impl Default for FrameSelectionConfig {
    fn default() -> Self {
        Self {
            select_percentage: 1.0,
        }
    }
}

/// Square crop centered on the target's centroid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropConfig {
    /// Side length in pixels; clamped to the smaller image dimension.
    pub size: usize,
    /// Pixels brighter than `threshold * max` contribute to the centroid.
    pub threshold: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_CROP_SIZE,
            threshold: DEFAULT_CENTROID_THRESHOLD,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    pub method: StackMethod,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StackMethod {
    SigmaClip(SigmaClipParams),
    Mean,
    Median,
}

impl Default for StackMethod {
    fn default() -> Self {
        Self::SigmaClip(SigmaClipParams::default())
    }
}

impl fmt::Display for StackMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SigmaClip(p) => write!(f, "Sigma clip (k={})", p.sigma),
            Self::Mean => write!(f, "Mean"),
            Self::Median => write!(f, "Median"),
        }
    }
}
