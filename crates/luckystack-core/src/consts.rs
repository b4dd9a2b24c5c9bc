/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Guards the SNR division on a perfectly flat frame.
pub const SNR_EPSILON: f64 = 1e-8;

/// Cross-power bins with a magnitude at or below this are treated as empty.
pub const CROSS_POWER_EPSILON: f64 = 1e-12;

/// Default composite quality weight for contrast.
pub const DEFAULT_CONTRAST_WEIGHT: f64 = 0.2;

/// Default composite quality weight for Laplacian sharpness.
pub const DEFAULT_SHARPNESS_WEIGHT: f64 = 0.5;

/// Default composite quality weight for signal-to-noise.
pub const DEFAULT_SNR_WEIGHT: f64 = 0.3;

/// Default sigma-clipping coefficient k: samples outside mean +/- k*stddev are rejected.
pub const DEFAULT_CLIP_SIGMA: f64 = 2.0;

/// Default side length of the square crop around the target.
pub const DEFAULT_CROP_SIZE: usize = 480;

/// Default intensity threshold for centroid detection (fraction of max brightness).
pub const DEFAULT_CENTROID_THRESHOLD: f64 = 0.25;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f64 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f64 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f64 = 0.114;

/// Number of channels in a color frame (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;
