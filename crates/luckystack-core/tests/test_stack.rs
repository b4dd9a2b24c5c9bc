mod common;

use ndarray::{Array2, Array3, ArrayView3, Axis};

use luckystack_core::align::align_to_template;
use luckystack_core::error::{ErrorKind, LuckyError};
use luckystack_core::frame::{AlignedFrame, Frame};
use luckystack_core::pipeline::config::{StackConfig, StackMethod};
use luckystack_core::stack::{mean_stack, median_stack, sigma_clip_stack, stack, SigmaClipParams};

use common::{add_noise, seeded_rng};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn filled(h: usize, w: usize, c: usize, value: u8) -> Array3<u8> {
    Array3::from_elem((h, w, c), value)
}

fn views<S: luckystack_core::sample::Sample>(layers: &[Array3<S>]) -> Vec<ArrayView3<'_, S>> {
    layers.iter().map(|l| l.view()).collect()
}

fn default_clip() -> SigmaClipParams {
    SigmaClipParams::default()
}

/// Wrap identical frames in AlignedFrames through the aligner.
fn aligned_copies(frame: &Frame<f64>, n: usize) -> Vec<AlignedFrame<f64>> {
    align_to_template(frame, vec![frame.clone(); n]).unwrap()
}

fn ramp(h: usize, w: usize) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(r, c)| 40.0 + 3.0 * r as f64 + 2.0 * c as f64)
}

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

#[test]
fn test_stack_empty_is_error() {
    let aligned: Vec<AlignedFrame<u8>> = Vec::new();
    let err = stack(&aligned, &StackConfig::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);

    let err = sigma_clip_stack::<u8>(&[], &default_clip()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);
    assert_eq!(mean_stack::<u8>(&[]).unwrap_err().kind(), ErrorKind::EmptyInput);
    assert_eq!(median_stack::<u8>(&[]).unwrap_err().kind(), ErrorKind::EmptyInput);
}

#[test]
fn test_shape_mismatch_names_first_offender() {
    let layers = vec![
        filled(4, 4, 3, 1),
        filled(4, 4, 3, 2),
        filled(4, 5, 3, 3),
        filled(3, 4, 3, 4),
    ];
    let err = sigma_clip_stack(&views(&layers), &default_clip()).unwrap_err();
    match err {
        LuckyError::ShapeMismatch {
            index,
            expected,
            found,
        } => {
            assert_eq!(index, 2);
            assert_eq!((expected.height, expected.width, expected.channels), (4, 4, 3));
            assert_eq!((found.height, found.width, found.channels), (4, 5, 3));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_channel_mismatch() {
    let layers = vec![filled(4, 4, 3, 1), filled(4, 4, 1, 1)];
    let err = mean_stack(&views(&layers)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert_eq!(err.frame_index(), Some(1));
}

#[test]
fn test_invalid_sigma() {
    let layers = vec![filled(2, 2, 1, 1)];
    let err = sigma_clip_stack(&views(&layers), &SigmaClipParams { sigma: -0.5 }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    let err =
        sigma_clip_stack(&views(&layers), &SigmaClipParams { sigma: f64::INFINITY }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

// ---------------------------------------------------------------------------
// Sigma clipping
// ---------------------------------------------------------------------------

#[test]
fn test_identical_frames_reproduce_original() {
    let mut rng = seeded_rng(11);
    let base = add_noise(&ramp(12, 9), 20.0, &mut rng).insert_axis(Axis(2));
    let layers = vec![base.clone(); 7];
    let result = sigma_clip_stack(&views(&layers), &default_clip()).unwrap();
    assert_eq!(result, base);
}

#[test]
fn test_noise_variance_reduced() {
    let truth = ramp(16, 16);
    let mut rng = seeded_rng(42);
    let layers: Vec<Array3<f64>> = (0..24)
        .map(|_| add_noise(&truth, 10.0, &mut rng).insert_axis(Axis(2)))
        .collect();

    let error_variance = |data: &Array3<f64>| {
        let plane = data.index_axis(Axis(2), 0);
        let n = plane.len() as f64;
        plane
            .iter()
            .zip(truth.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            / n
    };

    let result = sigma_clip_stack(&views(&layers), &default_clip()).unwrap();
    let stacked = error_variance(&result);
    let best_single = layers
        .iter()
        .map(|l| error_variance(l))
        .fold(f64::INFINITY, f64::min);
    assert!(
        stacked < best_single,
        "stacked {stacked} vs best single {best_single}"
    );
}

#[test]
fn test_outlier_rejected() {
    let mut layers = vec![filled(3, 3, 3, 10); 6];
    let mut hot = filled(3, 3, 3, 10);
    hot[[1, 1, 0]] = 250;
    layers.insert(3, hot);

    let result = sigma_clip_stack(&views(&layers), &default_clip()).unwrap();
    assert_eq!(result[[1, 1, 0]], 10);
    assert!(result.iter().all(|&v| v == 10));
}

#[test]
fn test_outlier_rejected_in_small_stack_with_tight_sigma() {
    // One outlier among N sits sqrt(N - 1) deviations from the mean, so three
    // frames need k below sqrt(2).
    let mut hot = Array3::from_elem((2, 2, 1), 10.0f64);
    hot[[0, 0, 0]] = 1e6;
    let layers = vec![Array3::from_elem((2, 2, 1), 10.0f64), hot, Array3::from_elem((2, 2, 1), 10.0)];
    let result = sigma_clip_stack(&views(&layers), &SigmaClipParams { sigma: 1.0 }).unwrap();
    assert_eq!(result[[0, 0, 0]], 10.0);
}

#[test]
fn test_two_frame_outlier_is_finite() {
    let layers = vec![filled(2, 2, 1, 10), filled(2, 2, 1, 250)];
    let result = sigma_clip_stack(&views(&layers), &default_clip()).unwrap();
    assert_eq!(result[[0, 0, 0]], 130);

    let float_layers = vec![
        Array3::from_elem((2, 2, 1), 10.0f64),
        Array3::from_elem((2, 2, 1), 1e9f64),
    ];
    let result = sigma_clip_stack(&views(&float_layers), &default_clip()).unwrap();
    assert!(result.iter().all(|v| v.is_finite() && *v != 1e9));
}

#[test]
fn test_empty_band_falls_back_to_median() {
    let layers: Vec<Array3<f64>> = [1.0, 2.0, 9.0, 5.0]
        .iter()
        .map(|&v| Array3::from_elem((1, 1, 1), v))
        .collect();
    let result = sigma_clip_stack(&views(&layers), &SigmaClipParams { sigma: 0.0 }).unwrap();
    // Even count: mean of the two central samples 2 and 5.
    assert_eq!(result[[0, 0, 0]], 3.5);
}

#[test]
fn test_integer_output_rounds_half_away_from_zero() {
    let layers = vec![filled(1, 1, 1, 1), filled(1, 1, 1, 2)];
    let result = sigma_clip_stack(&views(&layers), &default_clip()).unwrap();
    assert_eq!(result[[0, 0, 0]], 2);
}

#[test]
fn test_reordering_is_bit_identical() {
    let mut rng = seeded_rng(7);
    let layers: Vec<Array3<f64>> = (0..9)
        .map(|_| add_noise(&ramp(20, 20), 15.0, &mut rng).insert_axis(Axis(2)))
        .collect();
    let forward = sigma_clip_stack(&views(&layers), &default_clip()).unwrap();

    let mut reversed = layers.clone();
    reversed.reverse();
    let backward = sigma_clip_stack(&views(&reversed), &default_clip()).unwrap();

    let mut rotated = layers.clone();
    rotated.rotate_left(4);
    let shuffled = sigma_clip_stack(&views(&rotated), &default_clip()).unwrap();

    assert_eq!(forward, backward);
    assert_eq!(forward, shuffled);
}

#[test]
fn test_parallel_rows_match_sequential_arithmetic() {
    // 256x256 takes the row-parallel path; every pixel must still be exact.
    let layers: Vec<Array3<u16>> = (0..4u16)
        .map(|k| {
            Array3::from_shape_fn((256, 256, 1), |(r, c, _)| ((r * 256 + c) % 60_000) as u16 + k)
        })
        .collect();
    let result = median_stack(&views(&layers)).unwrap();
    for ((r, c, _), &v) in result.indexed_iter() {
        // median of base + {0,1,2,3} = base + 1.5, rounded away from zero
        assert_eq!(v as usize, (r * 256 + c) % 60_000 + 2);
    }
}

// ---------------------------------------------------------------------------
// Mean and median reducers
// ---------------------------------------------------------------------------

#[test]
fn test_mean_and_median() {
    let layers: Vec<Array3<f64>> = [0.1, 0.3, 0.7, 0.9, 5.0]
        .iter()
        .map(|&v| Array3::from_elem((2, 3, 3), v))
        .collect();
    let mean = mean_stack(&views(&layers)).unwrap();
    let median = median_stack(&views(&layers)).unwrap();
    assert!(mean.iter().all(|&v| (v - 1.4).abs() < 1e-12));
    assert!(median.iter().all(|&v| v == 0.7));
}

// ---------------------------------------------------------------------------
// Configured dispatch
// ---------------------------------------------------------------------------

#[test]
fn test_stack_dispatches_on_method() {
    let frame = Frame::mono(ramp(8, 8));
    let aligned = aligned_copies(&frame, 4);

    for method in [
        StackMethod::SigmaClip(default_clip()),
        StackMethod::Mean,
        StackMethod::Median,
    ] {
        let composite = stack(&aligned, &StackConfig { method }).unwrap();
        assert_eq!(composite.frame_count(), 4);
        assert_eq!((composite.height(), composite.width(), composite.channels()), (8, 8, 1));
        assert_eq!(composite.data(), frame.color());
    }
}
