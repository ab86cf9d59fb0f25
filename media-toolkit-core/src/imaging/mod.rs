//! Image format conversion backed by the image crate.
//!
//! Alpha handling mirrors what users expect from photo tools: converting
//! to a format without transparency flattens the image onto a white
//! background instead of dropping the channel.

pub mod format;

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{imageops, ColorType, DynamicImage, ImageFormat, ImageReader, RgbImage, Rgba, RgbaImage};
use serde::Serialize;

use crate::error::{MediaError, Result};
use format::lookup_output_format;

/// Basic facts about an image file.
#[derive(Debug, Clone, Serialize)]
pub struct ImageInfo {
    pub filename: String,
    pub format: String,
    pub mode: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

fn color_mode(color: ColorType) -> String {
    match color {
        ColorType::L8 => "L".to_string(),
        ColorType::La8 => "LA".to_string(),
        ColorType::Rgb8 => "RGB".to_string(),
        ColorType::Rgba8 => "RGBA".to_string(),
        ColorType::L16 => "I;16".to_string(),
        ColorType::La16 => "LA;16".to_string(),
        ColorType::Rgb16 => "RGB;16".to_string(),
        ColorType::Rgba16 => "RGBA;16".to_string(),
        other => format!("{other:?}"),
    }
}

/// Decode the image header and report dimensions, format and color mode.
/// The reported filename is passed in so callers can substitute a
/// user-facing name for temp paths.
pub fn image_info(path: &Path, filename: &str) -> Result<ImageInfo> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let detected = reader.format();
    let img = reader.decode()?;

    let format = detected
        .map(|f| format!("{f:?}").to_uppercase())
        .unwrap_or_else(|| "unknown".to_string());

    Ok(ImageInfo {
        filename: filename.to_string(),
        format,
        mode: color_mode(img.color()),
        width: img.width(),
        height: img.height(),
        size_bytes: std::fs::metadata(path)?.len(),
    })
}

/// Composite the image onto a white background, discarding alpha.
fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut background = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut background, &rgba, 0, 0);
    DynamicImage::ImageRgba8(background).to_rgb8()
}

fn to_opaque_rgb(img: &DynamicImage) -> RgbImage {
    if img.color().has_alpha() {
        flatten_onto_white(img)
    } else {
        img.to_rgb8()
    }
}

/// Convert the image at `input` to `format_name`, returning the encoded
/// bytes and the output MIME type. Quality applies to JPEG; WebP output
/// is always lossless.
pub fn convert_image(
    input: &Path,
    format_name: &str,
    quality: u8,
) -> Result<(Vec<u8>, &'static str)> {
    let format = lookup_output_format(format_name)
        .ok_or_else(|| MediaError::UnsupportedImageFormat(format_name.to_lowercase()))?;
    let quality = quality.clamp(1, 100);

    let img = ImageReader::open(input)?.with_guessed_format()?.decode()?;
    let mut cursor = Cursor::new(Vec::new());

    match format.format {
        ImageFormat::Jpeg => {
            let rgb = to_opaque_rgb(&img);
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut cursor, quality))?;
        }
        ImageFormat::Bmp => {
            let rgb = to_opaque_rgb(&img);
            DynamicImage::ImageRgb8(rgb).write_to(&mut cursor, ImageFormat::Bmp)?;
        }
        ImageFormat::Png => {
            img.write_with_encoder(PngEncoder::new_with_quality(
                &mut cursor,
                CompressionType::Best,
                PngFilterType::Adaptive,
            ))?;
        }
        ImageFormat::WebP => {
            let img = match img.color() {
                ColorType::Rgb8 | ColorType::Rgba8 => img,
                _ => DynamicImage::ImageRgba8(img.to_rgba8()),
            };
            img.write_with_encoder(WebPEncoder::new_lossless(&mut cursor))?;
        }
        other => {
            // The GIF encoder only takes 8-bit RGB(A) buffers.
            let img = match (other, img.color()) {
                (ImageFormat::Gif, ColorType::Rgb8 | ColorType::Rgba8) => img,
                (ImageFormat::Gif, _) => DynamicImage::ImageRgba8(img.to_rgba8()),
                _ => img,
            };
            img.write_to(&mut cursor, other)?;
        }
    }

    Ok((cursor.into_inner(), format.mime))
}
