//! Video compression.
//!
//! Three strategies, all encoding to x264/AAC:
//! - target size: two-pass encode at a bitrate computed from the size budget
//! - quality: single-pass CRF encode from a named preset
//! - resolution: downscale plus CRF encode

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::error::{MediaError, Result};
use crate::ffmpeg::{FfmpegCommand, FfmpegRunner};
use crate::video::planner::target_bitrate_kbps;
use crate::video::presets::{
    effective_quality, quality_preset_or_medium, resolution_height, resolution_options,
};
use crate::video::probe::probe_duration;
use crate::video::stem_and_ext;

const COMPRESS_TIMEOUT: Duration = Duration::from_secs(3600);

/// Audio bitrate used by target-size encodes, in kbps.
const TARGET_SIZE_AUDIO_KBPS: u32 = 128;

/// `{stem}_{label}{ext}` next to the input.
fn default_output(input: &Path, label: &str) -> PathBuf {
    let (stem, ext) = stem_and_ext(input);
    let parent = input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    parent.join(format!("{stem}_{label}{ext}"))
}

/// Compress to approximately `target_size_mb` using a two-pass encode.
///
/// The video bitrate is budgeted from the target size minus a fixed
/// 128 kbps AAC audio track. Pass log files live in a temp directory that
/// is removed when the encode finishes.
pub async fn compress_to_target_size(
    input: &Path,
    target_size_mb: f64,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let duration = probe_duration(input).await?;
    if duration <= 0.0 {
        return Err(MediaError::UnknownDuration);
    }

    let video_bitrate = target_bitrate_kbps(target_size_mb, duration, TARGET_SIZE_AUDIO_KBPS);
    let output = output.unwrap_or_else(|| default_output(input, "compressed"));

    let log_dir = tempfile::tempdir()?;
    let log_prefix = log_dir.path().join("ffmpeg2pass");

    let runner = FfmpegRunner::new("Video compression", COMPRESS_TIMEOUT);

    let pass1 = FfmpegCommand::null_output(input)
        .video_codec("libx264")
        .video_bitrate_kbps(video_bitrate)
        .two_pass(1, &log_prefix)
        .no_audio();
    runner.run(&pass1, "FFmpeg pass 1 failed").await?;

    let pass2 = FfmpegCommand::new(input, &output)
        .video_codec("libx264")
        .video_bitrate_kbps(video_bitrate)
        .two_pass(2, &log_prefix)
        .audio_codec("aac")
        .audio_bitrate(format!("{TARGET_SIZE_AUDIO_KBPS}k"));
    runner.run(&pass2, "FFmpeg pass 2 failed").await?;

    info!(
        "compressed {} toward {}MB at {}kbps video",
        input.display(),
        target_size_mb,
        video_bitrate
    );
    Ok(output)
}

/// Compress with a named quality preset (CRF encode). Unrecognized names
/// fall back to `medium`, which also shows in the default output name.
pub async fn compress_with_quality(
    input: &Path,
    quality: &str,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let quality = effective_quality(quality);
    let preset = quality_preset_or_medium(quality);
    let output = output.unwrap_or_else(|| default_output(input, quality));

    let cmd = FfmpegCommand::new(input, &output)
        .video_codec("libx264")
        .crf(preset.crf)
        .preset(preset.preset)
        .audio_codec("aac")
        .audio_bitrate(preset.audio_bitrate);

    let runner = FfmpegRunner::new("Video compression", COMPRESS_TIMEOUT);
    runner.run(&cmd, "FFmpeg compression failed").await?;

    info!(
        "compressed {} with quality {} (crf {})",
        input.display(),
        quality,
        preset.crf
    );
    Ok(output)
}

/// Downscale to a named resolution and CRF-encode. The resolution must be
/// on the ladder; the quality preset falls back to `medium`. Width scales
/// to keep the aspect ratio, rounded to an even number for h264.
pub async fn compress_to_resolution(
    input: &Path,
    resolution: &str,
    quality: &str,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let target_height = resolution_height(resolution).ok_or_else(|| {
        MediaError::UnsupportedResolution {
            options: resolution_options(),
        }
    })?;
    let preset = quality_preset_or_medium(quality);
    let output = output.unwrap_or_else(|| default_output(input, resolution));

    let cmd = FfmpegCommand::new(input, &output)
        .video_filter(format!("scale=-2:{target_height}"))
        .video_codec("libx264")
        .crf(preset.crf)
        .preset(preset.preset)
        .audio_codec("aac")
        .audio_bitrate(preset.audio_bitrate);

    let runner = FfmpegRunner::new("Video compression", COMPRESS_TIMEOUT);
    runner.run(&cmd, "FFmpeg compression failed").await?;

    info!(
        "downscaled {} to {} (crf {})",
        input.display(),
        resolution,
        preset.crf
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_names() {
        let out = default_output(Path::new("/videos/trip.mp4"), "compressed");
        assert_eq!(out, PathBuf::from("/videos/trip_compressed.mp4"));

        let out = default_output(Path::new("/videos/trip.mp4"), "720p");
        assert_eq!(out, PathBuf::from("/videos/trip_720p.mp4"));

        let out = default_output(Path::new("/videos/trip.mp4"), "low");
        assert_eq!(out, PathBuf::from("/videos/trip_low.mp4"));
    }
}
