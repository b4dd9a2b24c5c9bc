use thiserror::Error;

use crate::frame::FrameShape;

#[derive(Error, Debug)]
pub enum LuckyError {
    #[error("Invalid input{}: {reason}", at(.index))]
    InvalidInput {
        index: Option<usize>,
        reason: String,
    },

    #[error("Empty frame sequence")]
    EmptyInput,

    #[error("Frame {index} has shape {found}, expected {expected}")]
    ShapeMismatch {
        index: usize,
        expected: FrameShape,
        found: FrameShape,
    },

    #[error("Invalid image dimensions{}: {width}x{height}", at(.index))]
    InvalidGeometry {
        index: Option<usize>,
        width: usize,
        height: usize,
    },

    #[error("No target found{}", at(.index))]
    NoTarget { index: Option<usize> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

/// Coarse classification of a [`LuckyError`], for drivers that decide
/// between aborting and skipping a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    EmptyInput,
    ShapeMismatch,
    InvalidGeometry,
    NoTarget,
    Io,
}

impl LuckyError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            index: None,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::EmptyInput => ErrorKind::EmptyInput,
            Self::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            Self::InvalidGeometry { .. } => ErrorKind::InvalidGeometry,
            Self::NoTarget { .. } => ErrorKind::NoTarget,
            Self::Io(_) | Self::ImageError(_) => ErrorKind::Io,
        }
    }

    /// Position of the offending frame in the sequence being processed.
    pub fn frame_index(&self) -> Option<usize> {
        match self {
            Self::InvalidInput { index, .. }
            | Self::InvalidGeometry { index, .. }
            | Self::NoTarget { index } => *index,
            Self::ShapeMismatch { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Attach a frame index to errors raised by per-frame operations.
    /// An index that is already set is kept.
    pub fn at_frame(self, frame: usize) -> Self {
        match self {
            Self::InvalidInput {
                index: None,
                reason,
            } => Self::InvalidInput {
                index: Some(frame),
                reason,
            },
            Self::InvalidGeometry {
                index: None,
                width,
                height,
            } => Self::InvalidGeometry {
                index: Some(frame),
                width,
                height,
            },
            Self::NoTarget { index: None } => Self::NoTarget { index: Some(frame) },
            other => other,
        }
    }
}

fn at(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" in frame {i}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, LuckyError>;
