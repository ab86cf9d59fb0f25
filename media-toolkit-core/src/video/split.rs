//! Splitting videos into equal-length parts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::error::{MediaError, Result};
use crate::ffmpeg::{FfmpegCommand, FfmpegRunner};
use crate::video::planner::clamp_parts;
use crate::video::probe::probe_duration;
use crate::video::stem_and_ext;

/// Per-part encoding timeout.
const PART_TIMEOUT: Duration = Duration::from_secs(600);

/// Split `input` into equal parts, written next to it or into `output_dir`.
///
/// Parts are stream-copied when possible; when a cut falls on an awkward
/// keyframe boundary and the copy fails, that part is re-encoded with
/// x264/AAC. Returns the written part paths in order. The part count is
/// clamped to 2..=20.
pub async fn split_video(
    input: &Path,
    num_parts: i64,
    output_dir: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let num_parts = clamp_parts(num_parts);

    let out_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&out_dir)?;

    let duration = probe_duration(input).await?;
    if duration <= 0.0 {
        return Err(MediaError::UnknownDuration);
    }

    let part_duration = duration / num_parts as f64;
    let (stem, ext) = stem_and_ext(input);

    let runner = FfmpegRunner::new("Video splitting", PART_TIMEOUT);
    let mut output_files = Vec::with_capacity(num_parts);

    for i in 0..num_parts {
        let start = i as f64 * part_duration;
        let output_path = out_dir.join(format!("{stem}_part{}{ext}", i + 1));
        let context = format!("FFmpeg failed for part {}", i + 1);

        let copy_cmd = FfmpegCommand::new(input, &output_path)
            .seek(start)
            .duration(part_duration)
            .copy_streams()
            .avoid_negative_ts();

        match runner.run(&copy_cmd, &context).await {
            Ok(()) => {}
            Err(MediaError::ToolFailed { .. }) => {
                let encode_cmd = FfmpegCommand::new(input, &output_path)
                    .seek(start)
                    .duration(part_duration)
                    .video_codec("libx264")
                    .audio_codec("aac");
                runner.run(&encode_cmd, &context).await?;
            }
            Err(e) => return Err(e),
        }

        output_files.push(output_path);
    }

    info!("split {} into {} parts", input.display(), num_parts);
    Ok(output_files)
}
