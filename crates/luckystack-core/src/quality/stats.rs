use ndarray::Array2;

use crate::consts::SNR_EPSILON;
use crate::sample::Sample;

/// Mean and population standard deviation of all intensities.
///
/// Returns `(0.0, 0.0)` for an empty raster.
pub fn mean_stddev<S: Sample>(data: &Array2<S>) -> (f64, f64) {
    let n = data.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let count = n as f64;

    let mean = data.iter().map(|v| v.to_working()).sum::<f64>() / count;
    let var = data
        .iter()
        .map(|v| {
            let d = v.to_working() - mean;
            d * d
        })
        .sum::<f64>()
        / count;

    (mean, var.sqrt())
}

/// Contrast: population standard deviation of intensities.
pub fn contrast<S: Sample>(data: &Array2<S>) -> f64 {
    mean_stddev(data).1
}

/// Signal-to-noise ratio: mean / (stddev + epsilon).
pub fn snr<S: Sample>(data: &Array2<S>) -> f64 {
    let (mean, stddev) = mean_stddev(data);
    mean / (stddev + SNR_EPSILON)
}
