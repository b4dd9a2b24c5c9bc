use std::f64::consts::TAU;
use std::sync::Arc;

use ndarray::Array2;
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::consts::CROSS_POWER_EPSILON;
use crate::error::{LuckyError, Result};
use crate::frame::AlignmentOffset;
use crate::sample::Sample;

use super::subpixel::refine_peak_parabola;

/// Phase correlator bound to one template.
///
/// The windowed template spectrum and the FFT plans are computed once and
/// then shared read-only, so a single correlator can serve every alignment
/// worker.
pub struct PhaseCorrelator {
    template: Array2<f64>,
    plan: FftPlan,
    spectrum: Array2<Complex<f64>>,
}

struct FftPlan {
    height: usize,
    width: usize,
    window: Array2<f64>,
    row_forward: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
}

impl PhaseCorrelator {
    /// Prepare a correlator for the given template grayscale raster.
    pub fn new<S: Sample>(template: &Array2<S>) -> Result<Self> {
        Self::from_raster(template.mapv(|v| v.to_working()))
    }

    fn from_raster(template: Array2<f64>) -> Result<Self> {
        let (h, w) = template.dim();
        if h == 0 || w == 0 {
            return Err(LuckyError::InvalidGeometry {
                index: None,
                width: w,
                height: h,
            });
        }
        let plan = FftPlan::new(h, w);
        let spectrum = plan.forward(&template);
        Ok(Self {
            template,
            plan,
            spectrum,
        })
    }

    /// Height and width of the template.
    pub fn dim(&self) -> (usize, usize) {
        self.template.dim()
    }

    /// Offset that moves `candidate` onto the template.
    ///
    /// A candidate of a different size is compared at the element-wise
    /// minimum common size and the result is scaled back to template pixels.
    pub fn offset_to<S: Sample>(&self, candidate: &Array2<S>) -> Result<AlignmentOffset> {
        let (h, w) = self.dim();
        let (ch, cw) = candidate.dim();
        if ch == 0 || cw == 0 {
            return Err(LuckyError::InvalidGeometry {
                index: None,
                width: cw,
                height: ch,
            });
        }

        let candidate = candidate.mapv(|v| v.to_working());
        if (ch, cw) == (h, w) {
            return Ok(self.correlate(&candidate));
        }

        let common = (h.min(ch), w.min(cw));
        let candidate = resample_bilinear(&candidate, common);
        let offset = if common == (h, w) {
            self.correlate(&candidate)
        } else {
            PhaseCorrelator::from_raster(resample_bilinear(&self.template, common))?
                .correlate(&candidate)
        };

        Ok(AlignmentOffset {
            dx: offset.dx * w as f64 / common.1 as f64,
            dy: offset.dy * h as f64 / common.0 as f64,
        })
    }

    fn correlate(&self, candidate: &Array2<f64>) -> AlignmentOffset {
        let (h, w) = self.dim();

        let candidate_spectrum = self.plan.forward(candidate);
        let cross_power = normalized_cross_power(&self.spectrum, &candidate_spectrum);
        let surface = self.plan.inverse(cross_power);

        let (peak_row, peak_col) = find_peak(&surface);

        // Convert to signed offset (handle wrap-around)
        let dy = if peak_row > h / 2 {
            peak_row as f64 - h as f64
        } else {
            peak_row as f64
        };
        let dx = if peak_col > w / 2 {
            peak_col as f64 - w as f64
        } else {
            peak_col as f64
        };

        let (sub_dy, sub_dx) = refine_peak_parabola(&surface, peak_row, peak_col);

        AlignmentOffset {
            dx: dx + sub_dx,
            dy: dy + sub_dy,
        }
    }
}

/// Translation offset between two grayscale rasters using FFT phase correlation.
///
/// Shifting `candidate` by the returned offset overlays it on `template`.
pub fn compute_offset<S: Sample>(
    template: &Array2<S>,
    candidate: &Array2<S>,
) -> Result<AlignmentOffset> {
    PhaseCorrelator::new(template)?.offset_to(candidate)
}

impl FftPlan {
    fn new(height: usize, width: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            height,
            width,
            window: hann_window(height, width),
            row_forward: planner.plan_fft_forward(width),
            col_forward: planner.plan_fft_forward(height),
            row_inverse: planner.plan_fft_inverse(width),
            col_inverse: planner.plan_fft_inverse(height),
        }
    }

    /// Window the raster and take its 2D FFT.
    fn forward(&self, data: &Array2<f64>) -> Array2<Complex<f64>> {
        let mut spectrum = Array2::from_shape_fn((self.height, self.width), |(r, c)| {
            Complex::new(data[[r, c]] * self.window[[r, c]], 0.0)
        });
        transform_2d(&mut spectrum, self.row_forward.as_ref(), self.col_forward.as_ref());
        spectrum
    }

    /// Inverse 2D FFT, keeping the normalized real part.
    fn inverse(&self, mut spectrum: Array2<Complex<f64>>) -> Array2<f64> {
        transform_2d(&mut spectrum, self.row_inverse.as_ref(), self.col_inverse.as_ref());
        let scale = 1.0 / (self.height * self.width) as f64;
        spectrum.mapv(|v| v.re * scale)
    }
}

/// Separable 2D transform: every row, then every column.
fn transform_2d(data: &mut Array2<Complex<f64>>, rows: &dyn Fft<f64>, cols: &dyn Fft<f64>) {
    let mut buffer = Vec::with_capacity(data.nrows().max(data.ncols()));
    for mut lane in data.rows_mut() {
        buffer.clear();
        buffer.extend(lane.iter().copied());
        rows.process(&mut buffer);
        lane.iter_mut().zip(&buffer).for_each(|(dst, src)| *dst = *src);
    }
    for mut lane in data.columns_mut() {
        buffer.clear();
        buffer.extend(lane.iter().copied());
        cols.process(&mut buffer);
        lane.iter_mut().zip(&buffer).for_each(|(dst, src)| *dst = *src);
    }
}

/// 2D Hann (raised-cosine) window that tapers the edges to zero.
fn hann_window(h: usize, w: usize) -> Array2<f64> {
    let taper = |i: usize, n: usize| 0.5 * (1.0 - (TAU * i as f64 / n as f64).cos());
    Array2::from_shape_fn((h, w), |(row, col)| taper(row, h) * taper(col, w))
}

fn normalized_cross_power(
    template: &Array2<Complex<f64>>,
    candidate: &Array2<Complex<f64>>,
) -> Array2<Complex<f64>> {
    let mut cross = template * &candidate.mapv(|v| v.conj());
    cross.mapv_inplace(|v| {
        let mag = v.norm();
        if mag > CROSS_POWER_EPSILON {
            v / mag
        } else {
            Complex::new(0.0, 0.0)
        }
    });
    cross
}

/// Location of the maximum; the first occurrence wins.
fn find_peak(data: &Array2<f64>) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_val = f64::NEG_INFINITY;
    for ((row, col), &v) in data.indexed_iter() {
        if v > best_val {
            best_val = v;
            best = (row, col);
        }
    }
    best
}

/// Bilinear resize that maps pixel centers onto pixel centers.
fn resample_bilinear(data: &Array2<f64>, (out_h, out_w): (usize, usize)) -> Array2<f64> {
    let (h, w) = data.dim();
    let sy = h as f64 / out_h as f64;
    let sx = w as f64 / out_w as f64;

    Array2::from_shape_fn((out_h, out_w), |(row, col)| {
        let y = ((row as f64 + 0.5) * sy - 0.5).clamp(0.0, (h - 1) as f64);
        let x = ((col as f64 + 0.5) * sx - 0.5).clamp(0.0, (w - 1) as f64);
        let y0 = y.floor() as usize;
        let x0 = x.floor() as usize;
        let y1 = (y0 + 1).min(h - 1);
        let x1 = (x0 + 1).min(w - 1);
        let fy = y - y0 as f64;
        let fx = x - x0 as f64;

        data[[y0, x0]] * (1.0 - fx) * (1.0 - fy)
            + data[[y0, x1]] * fx * (1.0 - fy)
            + data[[y1, x0]] * (1.0 - fx) * fy
            + data[[y1, x1]] * fx * fy
    })
}
