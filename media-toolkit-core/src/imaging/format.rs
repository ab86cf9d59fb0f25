//! Output image formats and input validation.

use std::path::Path;

use image::ImageFormat;

/// A writable image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormat {
    pub name: &'static str,
    pub format: ImageFormat,
    pub mime: &'static str,
    /// Honors the quality setting when encoding.
    pub quality: bool,
    /// Carries an alpha channel; sources are flattened onto white for
    /// formats that do not.
    pub alpha: bool,
}

/// Writable formats, in presentation order. `jpg` and `jpeg` are aliases.
pub static OUTPUT_FORMATS: [OutputFormat; 7] = [
    OutputFormat {
        name: "png",
        format: ImageFormat::Png,
        mime: "image/png",
        quality: false,
        alpha: true,
    },
    OutputFormat {
        name: "jpg",
        format: ImageFormat::Jpeg,
        mime: "image/jpeg",
        quality: true,
        alpha: false,
    },
    OutputFormat {
        name: "jpeg",
        format: ImageFormat::Jpeg,
        mime: "image/jpeg",
        quality: true,
        alpha: false,
    },
    OutputFormat {
        name: "webp",
        format: ImageFormat::WebP,
        mime: "image/webp",
        quality: true,
        alpha: true,
    },
    OutputFormat {
        name: "gif",
        format: ImageFormat::Gif,
        mime: "image/gif",
        quality: false,
        alpha: true,
    },
    OutputFormat {
        name: "bmp",
        format: ImageFormat::Bmp,
        mime: "image/bmp",
        quality: false,
        alpha: false,
    },
    OutputFormat {
        name: "tiff",
        format: ImageFormat::Tiff,
        mime: "image/tiff",
        quality: false,
        alpha: true,
    },
];

/// Extensions accepted as input. Readable beyond the writable set: `tif`
/// alias plus phone formats.
pub static ALLOWED_INPUT_EXTENSIONS: [&str; 10] = [
    "png", "jpg", "jpeg", "webp", "gif", "bmp", "tiff", "tif", "heic", "heif",
];

pub const DEFAULT_QUALITY: u8 = 85;

/// Look up a writable format by name, case-insensitively.
pub fn lookup_output_format(name: &str) -> Option<&'static OutputFormat> {
    let name = name.to_ascii_lowercase();
    OUTPUT_FORMATS.iter().find(|f| f.name == name)
}

/// Writable format names, in presentation order.
pub fn output_format_names() -> Vec<&'static str> {
    OUTPUT_FORMATS.iter().map(|f| f.name).collect()
}

/// Names of formats that honor the quality setting.
pub fn quality_format_names() -> Vec<&'static str> {
    OUTPUT_FORMATS
        .iter()
        .filter(|f| f.quality)
        .map(|f| f.name)
        .collect()
}

/// Comma-joined list of writable format names, for error messages.
pub fn output_format_list() -> String {
    output_format_names().join(", ")
}

/// Sorted, dotted list of accepted input extensions, for error messages.
pub fn allowed_extension_list() -> String {
    let mut extensions: Vec<_> = ALLOWED_INPUT_EXTENSIONS
        .iter()
        .map(|e| format!(".{e}"))
        .collect();
    extensions.sort();
    extensions.join(", ")
}

/// Whether a filename carries an accepted image extension.
pub fn is_image_filename(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_INPUT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Clamp a requested quality into the valid 1..=100 range.
pub fn clamp_quality(quality: i64) -> u8 {
    quality.clamp(1, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_aliases_share_format() {
        let jpg = lookup_output_format("jpg").unwrap();
        let jpeg = lookup_output_format("JPEG").unwrap();
        assert_eq!(jpg.format, jpeg.format);
        assert_eq!(jpg.mime, "image/jpeg");
        assert!(lookup_output_format("svg").is_none());
    }

    #[test]
    fn test_quality_formats() {
        assert_eq!(quality_format_names(), vec!["jpg", "jpeg", "webp"]);
    }

    #[test]
    fn test_input_extension_check() {
        assert!(is_image_filename("photo.HEIC"));
        assert!(is_image_filename("scan.tif"));
        assert!(!is_image_filename("doc.pdf"));
        assert!(!is_image_filename("noext"));
    }

    #[test]
    fn test_clamp_quality() {
        assert_eq!(clamp_quality(85), 85);
        assert_eq!(clamp_quality(0), 1);
        assert_eq!(clamp_quality(-5), 1);
        assert_eq!(clamp_quality(250), 100);
    }
}
