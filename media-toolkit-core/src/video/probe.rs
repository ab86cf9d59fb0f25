//! Media analysis via ffprobe.
//!
//! ffprobe is invoked with JSON output and the fields we care about are
//! deserialized into [`ProbeOutput`]. Numeric values inside `format` and
//! the per-stream bitrate/sample-rate arrive as strings and are kept or
//! parsed accordingly.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{MediaError, Result};
use crate::ffmpeg::check_ffprobe;
use crate::video::planner::format_duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// The slice of ffprobe's JSON output we read.
#[derive(Debug, Default, Deserialize)]
pub struct ProbeOutput {
    #[serde(default)]
    pub format: ProbeFormat,
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProbeFormat {
    pub duration: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProbeStream {
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bit_rate: Option<String>,
    pub sample_rate: Option<String>,
}

impl ProbeOutput {
    /// Container duration in seconds; unparseable or missing reads as 0.
    pub fn duration_seconds(&self) -> f64 {
        self.format
            .duration
            .as_deref()
            .and_then(|d| d.parse().ok())
            .unwrap_or(0.0)
    }

    /// Container size in bytes; unparseable or missing reads as 0.
    pub fn size_bytes(&self) -> u64 {
        self.format
            .size
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    fn first_stream(&self, kind: &str) -> Option<&ProbeStream> {
        self.streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some(kind))
    }
}

async fn run_ffprobe(path: &Path, show_streams: bool) -> Result<ProbeOutput> {
    let ffprobe = check_ffprobe()?;

    let mut cmd = Command::new(ffprobe);
    cmd.args(["-v", "quiet", "-print_format", "json", "-show_format"]);
    if show_streams {
        cmd.arg("-show_streams");
    }
    cmd.arg(path);
    debug!("probing {}", path.display());

    let child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let output = match timeout(PROBE_TIMEOUT, child.wait_with_output()).await {
        Ok(output) => output?,
        Err(_) => {
            return Err(MediaError::Timeout {
                operation: "Video analysis".to_string(),
            })
        }
    };

    if !output.status.success() {
        return Err(MediaError::Probe(format!(
            "ffprobe failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    serde_json::from_slice(&output.stdout).map_err(|e| MediaError::Probe(e.to_string()))
}

/// Duration of a media file in seconds. Files ffprobe can open but cannot
/// time report 0; callers decide whether that is an error.
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let probe = run_ffprobe(path, false).await?;
    Ok(probe.duration_seconds())
}

/// Video-oriented summary of a media file.
#[derive(Debug, Clone, Serialize)]
pub struct VideoSummary {
    pub duration: f64,
    pub duration_formatted: String,
    pub file_size: u64,
    pub width: u32,
    pub height: u32,
    pub codec: String,
    pub resolution: String,
}

impl VideoSummary {
    pub fn from_probe(probe: &ProbeOutput) -> Self {
        let duration = probe.duration_seconds();
        let video = probe.first_stream("video");
        let width = video.and_then(|s| s.width).unwrap_or(0);
        let height = video.and_then(|s| s.height).unwrap_or(0);
        let codec = video
            .and_then(|s| s.codec_name.clone())
            .unwrap_or_else(|| "unknown".to_string());
        let resolution = if width > 0 && height > 0 {
            format!("{width}x{height}")
        } else {
            "unknown".to_string()
        };

        Self {
            duration,
            duration_formatted: format_duration(duration),
            file_size: probe.size_bytes(),
            width,
            height,
            codec,
            resolution,
        }
    }
}

pub async fn video_summary(path: &Path) -> Result<VideoSummary> {
    let probe = run_ffprobe(path, true).await?;
    Ok(VideoSummary::from_probe(&probe))
}

/// Audio-oriented summary of a media file. Bitrate and sample rate are
/// reported verbatim as ffprobe prints them.
#[derive(Debug, Clone, Serialize)]
pub struct AudioSummary {
    pub duration: f64,
    pub duration_formatted: String,
    pub has_audio: bool,
    pub audio_codec: Option<String>,
    pub audio_bitrate: Option<String>,
    pub sample_rate: Option<String>,
}

impl AudioSummary {
    pub fn from_probe(probe: &ProbeOutput) -> Self {
        let duration = probe.duration_seconds();
        let audio = probe.first_stream("audio");

        Self {
            duration,
            duration_formatted: format_duration(duration),
            has_audio: audio.is_some(),
            audio_codec: audio.and_then(|s| s.codec_name.clone()),
            audio_bitrate: audio.and_then(|s| s.bit_rate.clone()),
            sample_rate: audio.and_then(|s| s.sample_rate.clone()),
        }
    }
}

pub async fn audio_summary(path: &Path) -> Result<AudioSummary> {
    let probe = run_ffprobe(path, true).await?;
    Ok(AudioSummary::from_probe(&probe))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_probe() -> ProbeOutput {
        serde_json::from_str(
            r#"{
                "streams": [
                    {
                        "codec_type": "video",
                        "codec_name": "h264",
                        "width": 1920,
                        "height": 1080
                    },
                    {
                        "codec_type": "audio",
                        "codec_name": "aac",
                        "bit_rate": "128000",
                        "sample_rate": "44100"
                    }
                ],
                "format": {
                    "duration": "125.500000",
                    "size": "10485760"
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_video_summary_fields() {
        let summary = VideoSummary::from_probe(&sample_probe());
        assert_eq!(summary.duration, 125.5);
        assert_eq!(summary.duration_formatted, "2:05");
        assert_eq!(summary.file_size, 10_485_760);
        assert_eq!(summary.width, 1920);
        assert_eq!(summary.height, 1080);
        assert_eq!(summary.codec, "h264");
        assert_eq!(summary.resolution, "1920x1080");
    }

    #[test]
    fn test_audio_summary_fields() {
        let summary = AudioSummary::from_probe(&sample_probe());
        assert!(summary.has_audio);
        assert_eq!(summary.audio_codec.as_deref(), Some("aac"));
        assert_eq!(summary.audio_bitrate.as_deref(), Some("128000"));
        assert_eq!(summary.sample_rate.as_deref(), Some("44100"));
    }

    #[test]
    fn test_missing_streams_fall_back() {
        let probe: ProbeOutput =
            serde_json::from_str(r#"{"format": {"duration": "10.0"}}"#).unwrap();

        let video = VideoSummary::from_probe(&probe);
        assert_eq!(video.codec, "unknown");
        assert_eq!(video.resolution, "unknown");
        assert_eq!(video.file_size, 0);

        let audio = AudioSummary::from_probe(&probe);
        assert!(!audio.has_audio);
        assert_eq!(audio.audio_codec, None);
    }

    #[test]
    fn test_unparseable_duration_reads_as_zero() {
        let probe: ProbeOutput =
            serde_json::from_str(r#"{"format": {"duration": "N/A"}}"#).unwrap();
        assert_eq!(probe.duration_seconds(), 0.0);
    }
}
