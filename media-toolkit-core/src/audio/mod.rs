//! Audio extraction from video files.

pub mod format;

use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::error::{MediaError, Result};
use crate::ffmpeg::{FfmpegCommand, FfmpegRunner};
use format::{lookup_format, normalize_bitrate, AudioFormat};

const EXTRACT_TIMEOUT: Duration = Duration::from_secs(300);

fn extraction_command(
    input: &Path,
    output: &Path,
    format: &AudioFormat,
    bitrate: &str,
) -> FfmpegCommand {
    let cmd = FfmpegCommand::new(input, output)
        .no_video()
        .acodec(format.codec);
    if format.lossless {
        cmd
    } else {
        cmd.audio_bitrate(format!("{bitrate}k"))
    }
}

/// Extract the audio track of `input` into `output`, encoded as `format`.
/// Lossy formats honor `bitrate` (kbps, falling back to the default for
/// unknown values); lossless formats ignore it.
pub async fn extract_audio_to(
    input: &Path,
    output: &Path,
    format: &AudioFormat,
    bitrate: &str,
) -> Result<()> {
    let bitrate = normalize_bitrate(bitrate);
    let cmd = extraction_command(input, output, format, bitrate);

    let runner = FfmpegRunner::new("Audio extraction", EXTRACT_TIMEOUT);
    runner.run(&cmd, "FFmpeg failed").await?;

    info!("extracted {} audio from {}", format.name, input.display());
    Ok(())
}

/// Extract audio into memory. Returns the encoded bytes plus the format
/// descriptor, for naming and content-type decisions.
pub async fn extract_audio(
    input: &Path,
    output_format: &str,
    bitrate: &str,
) -> Result<(Vec<u8>, &'static AudioFormat)> {
    let format = lookup_format(output_format)
        .ok_or_else(|| MediaError::UnsupportedAudioFormat(output_format.to_lowercase()))?;

    let tmp = tempfile::Builder::new()
        .suffix(&format!(".{}", format.extension))
        .tempfile()?;
    extract_audio_to(input, tmp.path(), format, bitrate).await?;

    let bytes = std::fs::read(tmp.path())?;
    Ok((bytes, format))
}
