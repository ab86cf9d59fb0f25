//! # media-toolkit
//!
//! Local media processing: image conversion, PDF page manipulation, audio
//! extraction and video splitting/compression.
//!
//! ## Features
//!
//! - **Image conversion**: PNG/JPEG/WebP/GIF/BMP/TIFF output with alpha
//!   flattening and quality control
//! - **PDF operations**: merge documents, extract page ranges, split into
//!   single pages (plain or zipped)
//! - **Audio extraction**: pull MP3/AAC/WAV/FLAC/OGG tracks out of videos
//! - **Video tools**: probe metadata, split into equal parts, compress by
//!   target size, quality preset or resolution
//!
//! Image and PDF work happens in-process; audio and video operations
//! shell out to `ffmpeg`/`ffprobe`, which must be on the PATH.
//!
//! ## Quick Start
//!
//! ### Merging PDFs
//!
//! ```rust,no_run
//! use media_toolkit::pdf::merge::merge_files;
//!
//! # fn main() -> media_toolkit::Result<()> {
//! let merged = merge_files(&["a.pdf", "b.pdf"])?;
//! std::fs::write("merged.pdf", merged)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Splitting a video
//!
//! ```rust,no_run
//! use media_toolkit::video::split::split_video;
//! use std::path::Path;
//!
//! # async fn demo() -> media_toolkit::Result<()> {
//! let parts = split_video(Path::new("clip.mp4"), 4, None).await?;
//! println!("wrote {} parts", parts.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`imaging`] - image decoding, conversion and info
//! - [`pdf`] - merge, page extraction and per-page splitting
//! - [`audio`] - audio track extraction
//! - [`video`] - probing, splitting, compression planning and encoding
//! - [`pages`] - page-range specification parsing (`"1,3,5-7"`)
//! - [`ffmpeg`] - command construction and process control
//! - [`archive`] - ZIP assembly for multi-file results

pub mod archive;
pub mod audio;
pub mod error;
pub mod ffmpeg;
pub mod imaging;
pub mod pages;
pub mod pdf;
pub mod video;

pub use error::{MediaError, Result};
pub use pages::{parse_page_spec, select_pages};

/// Crate version, from Cargo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_page_spec_reexport() {
        assert_eq!(parse_page_spec("1-3", 10), vec![0, 1, 2]);
    }
}
