use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No valid pages specified")]
    NoPagesSelected,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Invalid file type. Allowed: {allowed}")]
    InvalidFileType { allowed: String },

    #[error("Unsupported format: {0}")]
    UnsupportedImageFormat(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedAudioFormat(String),

    #[error("Invalid resolution. Options: {options}")]
    UnsupportedResolution { options: String },

    #[error("Could not determine video duration")]
    UnknownDuration,

    #[error("{0} not found in PATH")]
    ToolNotFound(&'static str),

    #[error("{context}: {stderr}")]
    ToolFailed { context: String, stderr: String },

    #[error("{operation} timed out")]
    Timeout { operation: String },

    #[error("Failed to analyze video: {0}")]
    Probe(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, MediaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_pages_display() {
        assert_eq!(
            MediaError::NoPagesSelected.to_string(),
            "No valid pages specified"
        );
    }

    #[test]
    fn test_file_not_found_display() {
        let error = MediaError::FileNotFound("/tmp/missing.mp4".to_string());
        assert_eq!(error.to_string(), "File not found: /tmp/missing.mp4");
    }

    #[test]
    fn test_tool_not_found_display() {
        assert_eq!(
            MediaError::ToolNotFound("ffprobe").to_string(),
            "ffprobe not found in PATH"
        );
    }

    #[test]
    fn test_tool_failed_display() {
        let error = MediaError::ToolFailed {
            context: "FFmpeg failed for part 3".to_string(),
            stderr: "unknown encoder".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "FFmpeg failed for part 3: unknown encoder"
        );
    }

    #[test]
    fn test_timeout_display() {
        let error = MediaError::Timeout {
            operation: "Video compression".to_string(),
        };
        assert_eq!(error.to_string(), "Video compression timed out");
    }

    #[test]
    fn test_unknown_duration_display() {
        assert_eq!(
            MediaError::UnknownDuration.to_string(),
            "Could not determine video duration"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: MediaError = io_error.into();
        assert!(matches!(error, MediaError::Io(_)));
        assert!(error.to_string().starts_with("IO error:"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MediaError>();
    }
}
