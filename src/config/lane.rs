use crate::LaneParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Annotated frames are written here as `<stem>_lanes.png`.
    pub dir: PathBuf,
    /// Optional dump of bird's-eye views and binary masks.
    pub debug_dir: Option<PathBuf>,
    /// Optional JSON summary with one report per frame.
    pub json_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RuntimeConfig {
    /// Image files, or directories whose images are processed in name order.
    pub inputs: Vec<PathBuf>,
    pub output: OutputConfig,
    #[serde(default)]
    pub params: LaneParams,
    /// Stop after this many frames.
    #[serde(default)]
    pub max_frames: Option<usize>,
}

impl RuntimeConfig {
    /// Expand `inputs` into an ordered frame list.
    pub fn frame_paths(&self) -> Result<Vec<PathBuf>, String> {
        let mut frames = Vec::new();
        for input in &self.inputs {
            if input.is_dir() {
                frames.extend(list_images(input)?);
            } else {
                frames.push(input.clone());
            }
        }
        if let Some(max) = self.max_frames {
            frames.truncate(max);
        }
        Ok(frames)
    }
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory {}: {e}", dir.display()))?;
    let mut images = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| format!("Failed to read entry in {}: {e}", dir.display()))?
            .path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if path.is_file() && is_image {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}
