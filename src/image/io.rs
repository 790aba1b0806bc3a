//! I/O helpers for color frames, masks and JSON.
//!
//! - `load_color_image`: read a PNG/JPEG into an owned RGB frame.
//! - `save_color_image`: write an RGB frame to disk (format from extension).
//! - `save_gray_image`: write an 8-bit single-channel buffer (e.g. a mask).
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ColorImage, GrayImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_color_image(path: &Path) -> Result<ColorImage, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    Ok(ColorImage::from_rgb(&img))
}

/// Save an RGB frame.
pub fn save_color_image(frame: &ColorImage, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    frame
        .to_rgb()
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save an 8-bit grayscale buffer.
pub fn save_gray_image(buffer: &GrayImage, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    buffer
        .to_luma()
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
