use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::error::Result;
use crate::frame::{AlignmentOffset, Frame};
use crate::sample::Sample;

/// Translate a frame by `offset` into a raster of `(height, width)`.
///
/// Output pixel (r, c) samples the source at (r - dy, c - dx) with bilinear
/// interpolation; positions outside the source read as zero. A zero offset
/// into the frame's own geometry returns an exact copy.
pub fn shift_frame<S: Sample>(
    frame: &Frame<S>,
    offset: &AlignmentOffset,
    (height, width): (usize, usize),
) -> Result<Frame<S>> {
    if offset.is_zero() && (frame.height(), frame.width()) == (height, width) {
        return Ok(frame.clone());
    }

    let color = frame.color();
    let channels = frame.channels();
    let shifted_color = Array3::from_shape_fn((height, width, channels), |(row, col, ch)| {
        let plane = color.index_axis(Axis(2), ch);
        S::from_working(bilinear_sample(
            &plane,
            row as f64 - offset.dy,
            col as f64 - offset.dx,
        ))
    });
    let gray = frame.gray().view();
    let shifted_gray = Array2::from_shape_fn((height, width), |(row, col)| {
        S::from_working(bilinear_sample(
            &gray,
            row as f64 - offset.dy,
            col as f64 - offset.dx,
        ))
    });

    Frame::new(shifted_color, shifted_gray)
}

/// Bilinear sample at fractional (y, x); out-of-bounds neighbours count as zero.
pub fn bilinear_sample<S: Sample>(data: &ArrayView2<'_, S>, y: f64, x: f64) -> f64 {
    let (h, w) = data.dim();

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let sample = |r: i64, c: i64| -> f64 {
        if r >= 0 && r < h as i64 && c >= 0 && c < w as i64 {
            data[[r as usize, c as usize]].to_working()
        } else {
            0.0
        }
    };

    let mut acc = 0.0;
    for (r, wy) in [(y0, 1.0 - fy), (y0 + 1, fy)] {
        for (c, wx) in [(x0, 1.0 - fx), (x0 + 1, fx)] {
            let weight = wy * wx;
            if weight != 0.0 {
                acc += sample(r, c) * weight;
            }
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_position_returns_exact_sample() {
        let data = Array2::from_shape_fn((4, 4), |(r, c)| (r * 4 + c) as u8);
        assert_eq!(bilinear_sample(&data.view(), 2.0, 1.0), 9.0);
    }

    #[test]
    fn halfway_between_two_samples() {
        let mut data = Array2::<f32>::zeros((4, 4));
        data[[1, 1]] = 1.0;
        assert!((bilinear_sample(&data.view(), 1.0, 1.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn outside_reads_zero() {
        let data = Array2::<u16>::from_elem((3, 3), 500);
        assert_eq!(bilinear_sample(&data.view(), -2.0, 0.0), 0.0);
        assert_eq!(bilinear_sample(&data.view(), 0.0, 3.0), 0.0);
    }
}
