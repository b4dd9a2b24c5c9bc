use std::cmp::Ordering;
use std::fmt;

use ndarray::{Array2, Array3, Axis};

use crate::consts::{COLOR_CHANNEL_COUNT, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{LuckyError, Result};
use crate::quality::{score_frame, QualityWeights};
use crate::sample::Sample;

/// Height, width and channel count of a raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl FrameShape {
    pub fn area(&self) -> usize {
        self.height * self.width
    }
}

impl fmt::Display for FrameShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

impl From<(usize, usize, usize)> for FrameShape {
    fn from((height, width, channels): (usize, usize, usize)) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }
}

/// One image sample: a color raster, shape = (height, width, channels),
/// plus the grayscale raster derived from it, shape = (height, width).
///
/// Frames are immutable once built and are moved from stage to stage.
#[derive(Clone, Debug)]
pub struct Frame<S: Sample = u8> {
    color: Array3<S>,
    gray: Array2<S>,
}

impl<S: Sample> Frame<S> {
    /// Pair a color raster with its grayscale view. Both must cover the
    /// same height and width.
    pub fn new(color: Array3<S>, gray: Array2<S>) -> Result<Self> {
        let (h, w, _) = color.dim();
        if gray.dim() != (h, w) {
            return Err(LuckyError::invalid_input(format!(
                "grayscale raster is {}x{}, color raster is {}x{}",
                gray.ncols(),
                gray.nrows(),
                w,
                h
            )));
        }
        Ok(Self { color, gray })
    }

    /// Build a frame from a color raster, deriving grayscale with BT.601
    /// luminance. Single-channel rasters are used as their own grayscale.
    pub fn from_color(color: Array3<S>) -> Result<Self> {
        let gray = match color.dim().2 {
            1 => color.index_axis(Axis(2), 0).to_owned(),
            COLOR_CHANNEL_COUNT => luminance(&color),
            c => {
                return Err(LuckyError::invalid_input(format!(
                    "cannot derive grayscale from {c} channels"
                )))
            }
        };
        Ok(Self { color, gray })
    }

    /// A single-channel frame whose color raster is the grayscale raster.
    pub fn mono(gray: Array2<S>) -> Self {
        let color = gray.clone().insert_axis(Axis(2));
        Self { color, gray }
    }

    pub fn color(&self) -> &Array3<S> {
        &self.color
    }

    pub fn gray(&self) -> &Array2<S> {
        &self.gray
    }

    pub fn into_parts(self) -> (Array3<S>, Array2<S>) {
        (self.color, self.gray)
    }

    pub fn width(&self) -> usize {
        self.gray.ncols()
    }

    pub fn height(&self) -> usize {
        self.gray.nrows()
    }

    pub fn channels(&self) -> usize {
        self.color.dim().2
    }

    pub fn shape(&self) -> FrameShape {
        self.color.dim().into()
    }

    pub fn is_empty(&self) -> bool {
        self.gray.is_empty()
    }
}

fn luminance<S: Sample>(color: &Array3<S>) -> Array2<S> {
    let (h, w, _) = color.dim();
    Array2::from_shape_fn((h, w), |(row, col)| {
        let r = color[[row, col, 0]].to_working();
        let g = color[[row, col, 1]].to_working();
        let b = color[[row, col, 2]].to_working();
        S::from_working(LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b)
    })
}

/// Quality assessment result for a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityScore {
    pub contrast: f64,
    pub sharpness: f64,
    pub snr: f64,
    pub composite: f64,
}

/// A frame together with the quality score computed when it was built.
///
/// Ordering and equality look at the composite score only.
#[derive(Clone, Debug)]
pub struct ScoredFrame<S: Sample = u8> {
    frame: Frame<S>,
    score: QualityScore,
    index: usize,
}

impl<S: Sample> ScoredFrame<S> {
    /// Score `frame`, which sits at position `index` of the input sequence.
    pub fn new(frame: Frame<S>, index: usize, weights: &QualityWeights) -> Result<Self> {
        let score = score_frame(frame.gray(), weights).map_err(|e| e.at_frame(index))?;
        Ok(Self {
            frame,
            score,
            index,
        })
    }

    pub fn frame(&self) -> &Frame<S> {
        &self.frame
    }

    pub fn into_frame(self) -> Frame<S> {
        self.frame
    }

    pub fn score(&self) -> &QualityScore {
        &self.score
    }

    pub fn quality(&self) -> f64 {
        self.score.composite
    }

    /// Position of the frame in the original input sequence.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<S: Sample> PartialEq for ScoredFrame<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S: Sample> Eq for ScoredFrame<S> {}

impl<S: Sample> PartialOrd for ScoredFrame<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: Sample> Ord for ScoredFrame<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.composite.total_cmp(&other.score.composite)
    }
}

/// Alignment offset for a frame relative to the template.
///
/// Translating the frame by (dx, dy) overlays it on the template.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AlignmentOffset {
    pub dx: f64,
    pub dy: f64,
}

impl AlignmentOffset {
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// A frame warped onto the template's geometry.
#[derive(Clone, Debug)]
pub struct AlignedFrame<S: Sample = u8> {
    frame: Frame<S>,
    offset: AlignmentOffset,
    source_index: usize,
}

impl<S: Sample> AlignedFrame<S> {
    pub(crate) fn new(frame: Frame<S>, offset: AlignmentOffset, source_index: usize) -> Self {
        Self {
            frame,
            offset,
            source_index,
        }
    }

    pub fn frame(&self) -> &Frame<S> {
        &self.frame
    }

    pub fn offset(&self) -> AlignmentOffset {
        self.offset
    }

    pub fn source_index(&self) -> usize {
        self.source_index
    }

    pub fn into_frame(self) -> Frame<S> {
        self.frame
    }
}

/// The stacked result, same geometry and sample type as the aligned set.
#[derive(Clone, Debug)]
pub struct CompositeFrame<S: Sample = u8> {
    data: Array3<S>,
    frame_count: usize,
}

impl<S: Sample> CompositeFrame<S> {
    pub(crate) fn new(data: Array3<S>, frame_count: usize) -> Self {
        Self { data, frame_count }
    }

    pub fn data(&self) -> &Array3<S> {
        &self.data
    }

    pub fn into_data(self) -> Array3<S> {
        self.data
    }

    /// Number of frames that went into the stack.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }
}
