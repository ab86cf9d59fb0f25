//! Output audio formats and bitrate options.

use serde::Serialize;

/// An audio format tracks can be extracted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub name: &'static str,
    /// FFmpeg encoder name.
    pub codec: &'static str,
    pub extension: &'static str,
    pub mime: &'static str,
    /// Lossless formats ignore the bitrate option.
    pub lossless: bool,
}

/// Supported output formats, in presentation order.
pub static AUDIO_FORMATS: [AudioFormat; 5] = [
    AudioFormat {
        name: "mp3",
        codec: "libmp3lame",
        extension: "mp3",
        mime: "audio/mpeg",
        lossless: false,
    },
    AudioFormat {
        name: "aac",
        codec: "aac",
        extension: "aac",
        mime: "audio/aac",
        lossless: false,
    },
    AudioFormat {
        name: "wav",
        codec: "pcm_s16le",
        extension: "wav",
        mime: "audio/wav",
        lossless: true,
    },
    AudioFormat {
        name: "flac",
        codec: "flac",
        extension: "flac",
        mime: "audio/flac",
        lossless: true,
    },
    AudioFormat {
        name: "ogg",
        codec: "libvorbis",
        extension: "ogg",
        mime: "audio/ogg",
        lossless: false,
    },
];

/// Bitrate choices in kbps.
pub static BITRATE_OPTIONS: [&str; 5] = ["64", "128", "192", "256", "320"];

pub const DEFAULT_BITRATE: &str = "192";

/// Look up a format by name, case-insensitively.
pub fn lookup_format(name: &str) -> Option<&'static AudioFormat> {
    let name = name.to_ascii_lowercase();
    AUDIO_FORMATS.iter().find(|f| f.name == name)
}

/// Valid bitrates pass through; anything else becomes the default.
pub fn normalize_bitrate(bitrate: &str) -> &'static str {
    BITRATE_OPTIONS
        .iter()
        .copied()
        .find(|b| *b == bitrate)
        .unwrap_or(DEFAULT_BITRATE)
}

/// Format descriptor for listings.
#[derive(Debug, Serialize)]
pub struct FormatChoice {
    pub value: &'static str,
    pub label: String,
    pub mime: &'static str,
}

pub fn format_choices() -> Vec<FormatChoice> {
    AUDIO_FORMATS
        .iter()
        .map(|f| FormatChoice {
            value: f.name,
            label: f.name.to_uppercase(),
            mime: f.mime,
        })
        .collect()
}

/// Bitrate descriptor for listings.
#[derive(Debug, Serialize)]
pub struct BitrateChoice {
    pub value: &'static str,
    pub label: String,
}

pub fn bitrate_choices() -> Vec<BitrateChoice> {
    BITRATE_OPTIONS
        .iter()
        .map(|b| BitrateChoice {
            value: b,
            label: format!("{b} kbps"),
        })
        .collect()
}
