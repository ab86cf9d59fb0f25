//! Video operations: probing, splitting into parts, and compression.

pub mod compress;
pub mod planner;
pub mod presets;
pub mod probe;
pub mod split;

use std::path::Path;

use crate::error::{MediaError, Result};

/// File stem plus dotted extension, for deriving output names.
pub(crate) fn stem_and_ext(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    (stem, ext)
}

/// Validate that a local path points at an existing video file with a
/// recognized extension.
pub fn validate_video_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(MediaError::FileNotFound(path.display().to_string()));
    }
    if !path.is_file() {
        return Err(MediaError::NotAFile(path.display().to_string()));
    }
    if !presets::is_video_path(path) {
        return Err(MediaError::InvalidFileType {
            allowed: presets::video_extension_list(),
        });
    }
    Ok(())
}
