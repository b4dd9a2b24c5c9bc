use std::path::{Path, PathBuf};

use image::{GrayImage, RgbImage};
use ndarray::Array3;
use rayon::prelude::*;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{LuckyError, Result};
use crate::frame::{CompositeFrame, Frame};

/// File extensions picked up by [`load_frames_from_dir`].
pub const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp"];

/// Load an image file as an 8-bit RGB frame with BT.601 grayscale.
pub fn load_frame(path: &Path) -> Result<Frame<u8>> {
    let img = image::open(path)?.to_rgb8();
    let (w, h) = img.dimensions();
    let color = Array3::from_shape_vec((h as usize, w as usize, COLOR_CHANNEL_COUNT), img.into_raw())
        .map_err(|e| LuckyError::invalid_input(format!("{}: {e}", path.display())))?;
    Frame::from_color(color)
}

/// Image files in `dir`, sorted by file name.
pub fn list_frame_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if path.is_file() && supported {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every supported image in `dir`, in file-name order.
pub fn load_frames_from_dir(dir: &Path) -> Result<Vec<Frame<u8>>> {
    list_frame_files(dir)?
        .par_iter()
        .enumerate()
        .map(|(i, path)| load_frame(path).map_err(|e| e.at_frame(i)))
        .collect()
}

/// Save an 8-bit composite, choosing the format from the file extension.
///
/// Three-channel composites are written as RGB, single-channel ones as
/// grayscale.
pub fn save_composite(composite: &CompositeFrame<u8>, path: &Path) -> Result<()> {
    let w = composite.width() as u32;
    let h = composite.height() as u32;
    let raw: Vec<u8> = composite.data().iter().copied().collect();

    match composite.channels() {
        COLOR_CHANNEL_COUNT => {
            let img = RgbImage::from_raw(w, h, raw)
                .ok_or_else(|| LuckyError::invalid_input("composite buffer size mismatch"))?;
            img.save(path)?;
        }
        1 => {
            let img = GrayImage::from_raw(w, h, raw)
                .ok_or_else(|| LuckyError::invalid_input("composite buffer size mismatch"))?;
            img.save(path)?;
        }
        c => {
            return Err(LuckyError::invalid_input(format!(
                "cannot encode a {c}-channel composite"
            )))
        }
    }
    Ok(())
}
