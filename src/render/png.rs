//! Image input and PNG output.

use std::path::Path;

use image::RgbaImage;

use crate::error::{LabError, Result};

/// Image extensions accepted as render inputs.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// Check whether a path looks like a supported input image.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Load an image file as an RGBA8 frame.
pub fn load_png(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| LabError::Image {
        path: path.to_path_buf(),
        message: format!("Failed to read image: {}", e),
    })?;
    Ok(img.to_rgba8())
}

/// Write a frame to a PNG file.
pub fn write_png(frame: &RgbaImage, path: &Path) -> Result<()> {
    frame.save(path).map_err(|e| LabError::Image {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })?;

    Ok(())
}
