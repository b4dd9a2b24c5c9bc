use ndarray::Array2;

/// Refinements smaller than this are treated as no shift at all.
const SNAP_EPSILON: f64 = 1e-9;

/// Refine an integer correlation peak with a 3-point parabola along each axis.
///
/// The correlation surface is periodic, so neighbours of a peak on the border
/// wrap around to the opposite edge. Each axis is refined on its own and the
/// result is (delta_row, delta_col), each within +/- 0.5 px.
pub fn refine_peak_parabola(surface: &Array2<f64>, peak_row: usize, peak_col: usize) -> (f64, f64) {
    let (h, w) = surface.dim();
    if h == 0 || w == 0 {
        return (0.0, 0.0);
    }

    let center = surface[[peak_row, peak_col]];
    let delta_row = if h < 3 {
        0.0
    } else {
        parabola_vertex(
            surface[[(peak_row + h - 1) % h, peak_col]],
            center,
            surface[[(peak_row + 1) % h, peak_col]],
        )
    };
    let delta_col = if w < 3 {
        0.0
    } else {
        parabola_vertex(
            surface[[peak_row, (peak_col + w - 1) % w]],
            center,
            surface[[peak_row, (peak_col + 1) % w]],
        )
    };

    (delta_row, delta_col)
}

/// Vertex of the parabola through (-1, prev), (0, curr), (1, next).
fn parabola_vertex(prev: f64, curr: f64, next: f64) -> f64 {
    let curvature = prev - 2.0 * curr + next;
    if curvature.abs() <= 1e-12 {
        return 0.0;
    }
    let delta = ((prev - next) / (2.0 * curvature)).clamp(-0.5, 0.5);
    if delta.abs() < SNAP_EPSILON {
        0.0
    } else {
        delta
    }
}
