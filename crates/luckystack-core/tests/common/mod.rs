#![allow(dead_code)]

use ndarray::{Array2, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use luckystack_core::frame::Frame;

/// Three-channel u8 frame with every sample set to `value`.
pub fn constant_frame(h: usize, w: usize, value: u8) -> Frame<u8> {
    Frame::from_color(Array3::from_elem((h, w, 3), value)).unwrap()
}

/// Gaussian spot of peak `amplitude` centered at (`cy`, `cx`).
pub fn gaussian_spot(h: usize, w: usize, cy: f64, cx: f64, sigma: f64, amplitude: f64) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(r, c)| {
        let dy = r as f64 - cy;
        let dx = c as f64 - cx;
        amplitude * (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp()
    })
}

/// Single-channel f64 frame holding a Gaussian spot.
pub fn spot_frame(h: usize, w: usize, cy: f64, cx: f64) -> Frame<f64> {
    Frame::mono(gaussian_spot(h, w, cy, cx, 3.0, 200.0))
}

/// Three-channel u8 frame holding a uniformly lit disk on black.
pub fn disk_frame(h: usize, w: usize, cy: usize, cx: usize, radius: usize) -> Frame<u8> {
    let r2 = (radius * radius) as i64;
    let color = Array3::from_shape_fn((h, w, 3), |(r, c, ch)| {
        let dy = r as i64 - cy as i64;
        let dx = c as i64 - cx as i64;
        if dy * dy + dx * dx <= r2 {
            [220u8, 180, 140][ch]
        } else {
            0
        }
    });
    Frame::from_color(color).unwrap()
}

/// Add uniform zero-mean noise in `[-amplitude, amplitude)`.
pub fn add_noise(data: &Array2<f64>, amplitude: f64, rng: &mut StdRng) -> Array2<f64> {
    data.mapv(|v| v + rng.random_range(-amplitude..amplitude))
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Position of the largest value, first one wins.
pub fn argmax(data: &Array2<f64>) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_val = f64::NEG_INFINITY;
    for ((r, c), &v) in data.indexed_iter() {
        if v > best_val {
            best_val = v;
            best = (r, c);
        }
    }
    best
}
