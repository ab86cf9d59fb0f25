//! FFmpeg command builder and runner.
//!
//! Every audio/video operation funnels through here: arguments are
//! assembled with [`FfmpegCommand`] and executed by [`FfmpegRunner`], which
//! enforces a timeout (killing the process on expiry) and captures stderr
//! for error reporting.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{MediaError, Result};

/// Builder for FFmpeg invocations.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path, or `-` for discarded output
    output: PathBuf,
    /// Arguments placed before `-i` (seeking, mostly)
    input_args: Vec<String>,
    /// Arguments placed after `-i`
    output_args: Vec<String>,
}

impl FfmpegCommand {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
        }
    }

    /// Discard the encoded output; used for analysis passes.
    pub fn null_output(input: impl AsRef<Path>) -> Self {
        Self::new(input, "-").format("null")
    }

    /// Add an argument before `-i`.
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    /// Add an argument after `-i`.
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Seek before the input is opened; much faster than output seeking.
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format!("{seconds:.3}"))
    }

    /// Limit the output duration.
    pub fn duration(self, seconds: f64) -> Self {
        self.output_arg("-t").output_arg(format!("{seconds:.3}"))
    }

    /// Copy streams without re-encoding.
    pub fn copy_streams(self) -> Self {
        self.output_arg("-c").output_arg("copy")
    }

    /// Shift timestamps so stream-copied segments start at zero.
    pub fn avoid_negative_ts(self) -> Self {
        self.output_arg("-avoid_negative_ts").output_arg("make_zero")
    }

    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Raw codec selector (`-acodec`), for extraction paths.
    pub fn acodec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-acodec").output_arg(codec)
    }

    /// Drop the video stream.
    pub fn no_video(self) -> Self {
        self.output_arg("-vn")
    }

    /// Drop the audio stream.
    pub fn no_audio(self) -> Self {
        self.output_arg("-an")
    }

    pub fn crf(self, crf: u8) -> Self {
        self.output_arg("-crf").output_arg(crf.to_string())
    }

    /// x264 speed preset.
    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.output_arg("-preset").output_arg(preset)
    }

    pub fn video_bitrate_kbps(self, kbps: u32) -> Self {
        self.output_arg("-b:v").output_arg(format!("{kbps}k"))
    }

    /// Audio bitrate, e.g. `"128k"`.
    pub fn audio_bitrate(self, bitrate: impl Into<String>) -> Self {
        self.output_arg("-b:a").output_arg(bitrate)
    }

    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Two-pass encoding pass number plus the shared log file prefix.
    pub fn two_pass(self, pass: u8, log_prefix: impl AsRef<Path>) -> Self {
        self.output_arg("-pass")
            .output_arg(pass.to_string())
            .output_arg("-passlogfile")
            .output_arg(log_prefix.as_ref().to_string_lossy())
    }

    /// Force a container format.
    pub fn format(self, format: impl Into<String>) -> Self {
        self.output_arg("-f").output_arg(format)
    }

    /// Build the full argument list.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec!["-y".to_string()];
        args.extend(self.input_args.clone());
        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());
        args.extend(self.output_args.clone());
        args.push(self.output.to_string_lossy().to_string());
        args
    }
}

/// Runs FFmpeg commands for one operation, with a hard timeout.
pub struct FfmpegRunner {
    /// Operation label used in timeout errors ("Video splitting", ...)
    operation: &'static str,
    timeout: Duration,
}

impl FfmpegRunner {
    pub fn new(operation: &'static str, timeout: Duration) -> Self {
        Self { operation, timeout }
    }

    /// Run to completion. A non-zero exit reports `context` plus the
    /// captured stderr; exceeding the timeout kills the process.
    pub async fn run(&self, cmd: &FfmpegCommand, context: &str) -> Result<()> {
        let ffmpeg = check_ffmpeg()?;
        let args = cmd.build_args();
        debug!("running ffmpeg {}", args.join(" "));

        let child = Command::new(ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                warn!(
                    "{} exceeded {}s, killing ffmpeg",
                    self.operation,
                    self.timeout.as_secs()
                );
                return Err(MediaError::Timeout {
                    operation: self.operation.to_string(),
                });
            }
        };

        if !output.status.success() {
            return Err(MediaError::ToolFailed {
                context: context.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Locate ffmpeg on the PATH.
pub fn check_ffmpeg() -> Result<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::ToolNotFound("ffmpeg"))
}

/// Locate ffprobe on the PATH.
pub fn check_ffprobe() -> Result<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::ToolNotFound("ffprobe"))
}

/// Availability of the external tools, for diagnostics.
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
}

impl ToolStatus {
    pub fn detect() -> Self {
        Self {
            ffmpeg: check_ffmpeg().ok(),
            ffprobe: check_ffprobe().ok(),
        }
    }

    pub fn all_present(&self) -> bool {
        self.ffmpeg.is_some() && self.ffprobe.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_lands_before_input() {
        let cmd = FfmpegCommand::new("in.mp4", "out.mp4").seek(12.5).duration(30.0);
        let args = cmd.build_args();

        let ss = args.iter().position(|a| a == "-ss").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        let t = args.iter().position(|a| a == "-t").unwrap();
        assert!(ss < input);
        assert!(input < t);
        assert_eq!(args[ss + 1], "12.500");
    }

    #[test]
    fn test_output_is_last_and_overwrite_first() {
        let cmd = FfmpegCommand::new("in.mp4", "out.mp4")
            .copy_streams()
            .avoid_negative_ts();
        let args = cmd.build_args();
        assert_eq!(args[0], "-y");
        assert_eq!(args.last().unwrap(), "out.mp4");
        assert!(args.contains(&"copy".to_string()));
        assert!(args.contains(&"make_zero".to_string()));
    }

    #[test]
    fn test_null_output_discards_to_stdout() {
        let args = FfmpegCommand::null_output("in.mp4").no_audio().build_args();
        assert_eq!(args.last().unwrap(), "-");
        let f = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[f + 1], "null");
        assert!(args.contains(&"-an".to_string()));
    }

    #[test]
    fn test_two_pass_args() {
        let args = FfmpegCommand::new("in.mp4", "out.mp4")
            .video_codec("libx264")
            .video_bitrate_kbps(2500)
            .two_pass(1, "/tmp/ffmpeg2pass")
            .build_args();
        assert!(args.contains(&"-pass".to_string()));
        assert!(args.contains(&"1".to_string()));
        assert!(args.contains(&"-passlogfile".to_string()));
        assert!(args.contains(&"2500k".to_string()));
    }
}
