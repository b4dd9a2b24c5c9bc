use ndarray::Array2;

use crate::sample::Sample;

/// Sharpness: standard deviation of the Laplacian response. Higher is sharper.
///
/// Convolves the interior with the 3x3 Laplacian kernel:
///   0  1  0
///   1 -4  1
///   0  1  0
/// Rasters smaller than 3x3 have no interior and score 0.
pub fn sharpness<S: Sample>(data: &Array2<S>) -> f64 {
    laplacian_variance(data).sqrt()
}

/// Population variance of the Laplacian response over the interior pixels.
pub fn laplacian_variance<S: Sample>(data: &Array2<S>) -> f64 {
    let (h, w) = data.dim();
    if h < 3 || w < 3 {
        return 0.0;
    }

    let px = |row: usize, col: usize| data[[row, col]].to_working();
    let count = ((h - 2) * (w - 2)) as f64;

    let mut sum = 0.0f64;
    for row in 1..h - 1 {
        for col in 1..w - 1 {
            sum += laplacian_at(&px, row, col);
        }
    }
    let mean = sum / count;

    let mut var_sum = 0.0f64;
    for row in 1..h - 1 {
        for col in 1..w - 1 {
            let d = laplacian_at(&px, row, col) - mean;
            var_sum += d * d;
        }
    }

    (var_sum / count).max(0.0)
}

#[inline]
fn laplacian_at(px: &impl Fn(usize, usize) -> f64, row: usize, col: usize) -> f64 {
    -4.0 * px(row, col) + px(row - 1, col) + px(row + 1, col) + px(row, col - 1) + px(row, col + 1)
}
