//! Static configuration tables for video operations.
//!
//! The size-estimation ratios are hand-tuned advisory constants, kept as
//! lookup tables so they can be recalibrated without touching control flow.

use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Encoder settings behind a named quality level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityPreset {
    /// Constant rate factor; lower means higher quality and larger output.
    pub crf: u8,
    /// x264 speed preset.
    pub preset: &'static str,
    /// Audio bitrate passed to `-b:a`.
    pub audio_bitrate: &'static str,
}

/// Quality levels in the order they are presented to callers.
pub static QUALITY_LEVELS: [&str; 3] = ["high", "medium", "low"];

const MEDIUM_PRESET: QualityPreset = QualityPreset {
    crf: 23,
    preset: "medium",
    audio_bitrate: "128k",
};

/// Resolution ladder, highest first. Heights only; widths follow the source
/// aspect ratio.
pub static RESOLUTION_LADDER: [(&str, u32); 6] = [
    ("2160p", 2160),
    ("1440p", 1440),
    ("1080p", 1080),
    ("720p", 720),
    ("480p", 480),
    ("360p", 360),
];

/// Flat size ratio applied when an estimate request is unrecognized.
pub const DEFAULT_SIZE_RATIO: f64 = 0.4;

/// Quality factor applied in resolution estimates when the quality name is
/// unrecognized (matches `medium`).
pub const DEFAULT_QUALITY_FACTOR: f64 = 0.6;

lazy_static! {
    /// CRF/speed/audio settings per quality level.
    pub static ref QUALITY_PRESETS: HashMap<&'static str, QualityPreset> = HashMap::from([
        ("high", QualityPreset { crf: 18, preset: "slow", audio_bitrate: "192k" }),
        ("medium", MEDIUM_PRESET),
        ("low", QualityPreset { crf: 28, preset: "fast", audio_bitrate: "96k" }),
    ]);

    /// Expected output-to-input size ratio per quality level.
    pub static ref QUALITY_SIZE_RATIOS: HashMap<&'static str, f64> =
        HashMap::from([("high", 0.7), ("medium", 0.4), ("low", 0.2)]);

    /// Additional shrink factor from re-encoding at a lower resolution.
    pub static ref RESOLUTION_QUALITY_FACTORS: HashMap<&'static str, f64> =
        HashMap::from([("high", 0.8), ("medium", 0.6), ("low", 0.4)]);

    /// File extensions accepted as video input.
    pub static ref VIDEO_EXTENSIONS: HashSet<&'static str> = HashSet::from([
        "mp4", "mkv", "avi", "mov", "webm", "flv", "wmv", "m4v", "mpeg", "mpg", "3gp",
    ]);
}

/// Look up a quality preset; unknown names fall back to `medium`.
pub fn quality_preset_or_medium(quality: &str) -> &'static QualityPreset {
    QUALITY_PRESETS.get(quality).unwrap_or(&MEDIUM_PRESET)
}

/// Canonical quality name; anything unrecognized maps to `medium`.
pub fn effective_quality(quality: &str) -> &'static str {
    QUALITY_LEVELS
        .iter()
        .copied()
        .find(|q| *q == quality)
        .unwrap_or("medium")
}

/// The height behind a resolution name, if it is on the ladder.
pub fn resolution_height(name: &str) -> Option<u32> {
    RESOLUTION_LADDER
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, h)| *h)
}

/// Resolution names joined for error messages, highest first.
pub fn resolution_options() -> String {
    RESOLUTION_LADDER
        .iter()
        .map(|(n, _)| *n)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Video extensions joined for error messages.
pub fn video_extension_list() -> String {
    let mut extensions: Vec<_> = VIDEO_EXTENSIONS.iter().map(|e| format!(".{e}")).collect();
    extensions.sort();
    extensions.join(", ")
}

/// Whether the path carries a recognized video extension.
pub fn is_video_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_presets_cover_all_levels() {
        for level in QUALITY_LEVELS {
            assert!(QUALITY_PRESETS.contains_key(level));
            assert!(QUALITY_SIZE_RATIOS.contains_key(level));
            assert!(RESOLUTION_QUALITY_FACTORS.contains_key(level));
        }
    }

    #[test]
    fn test_quality_fallback_is_medium() {
        assert_eq!(quality_preset_or_medium("medium").crf, 23);
        assert_eq!(quality_preset_or_medium("ultra").crf, 23);
        assert_eq!(quality_preset_or_medium("high").crf, 18);
        assert_eq!(quality_preset_or_medium("low").crf, 28);
        assert_eq!(effective_quality("high"), "high");
        assert_eq!(effective_quality("ultra"), "medium");
    }

    #[test]
    fn test_resolution_lookup() {
        assert_eq!(resolution_height("720p"), Some(720));
        assert_eq!(resolution_height("999p"), None);
    }

    #[test]
    fn test_video_path_detection() {
        assert!(is_video_path(Path::new("/tmp/clip.mp4")));
        assert!(is_video_path(Path::new("/tmp/CLIP.MKV")));
        assert!(!is_video_path(Path::new("/tmp/track.mp3")));
        assert!(!is_video_path(Path::new("/tmp/no_extension")));
    }
}
