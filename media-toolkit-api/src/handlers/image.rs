//! Image conversion handlers.

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{info, warn};

use media_toolkit::archive::zip_entries;
use media_toolkit::imaging::format::{
    allowed_extension_list, clamp_quality, is_image_filename, lookup_output_format,
    output_format_list, output_format_names, quality_format_names, DEFAULT_QUALITY,
};
use media_toolkit::imaging::{convert_image, image_info, ImageInfo};

use crate::error::{ApiError, ApiResult};
use crate::upload::{read_form, MultipartForm, UploadedFile};

/// Supported output formats and which of them honor a quality setting.
pub async fn list_formats() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "formats": output_format_names(),
        "quality_formats": quality_format_names(),
    }))
}

fn validate_image_upload(file: &UploadedFile) -> ApiResult<()> {
    if !is_image_filename(&file.filename) {
        return Err(ApiError::UnsupportedMedia(format!(
            "Invalid file type. Allowed: {}",
            allowed_extension_list()
        )));
    }
    Ok(())
}

/// Read `output_format` / `quality` fields, validating the format name and
/// clamping quality into 1..=100.
fn conversion_params(form: &MultipartForm) -> ApiResult<(String, u8)> {
    let output_format = form
        .text("output_format")
        .ok_or_else(|| ApiError::bad_request("Missing output_format field"))?
        .to_lowercase();
    if lookup_output_format(&output_format).is_none() {
        return Err(ApiError::UnsupportedMedia(format!(
            "Invalid output format. Allowed: {}",
            output_format_list()
        )));
    }

    let quality = form
        .text("quality")
        .and_then(|q| q.parse::<i64>().ok())
        .map(clamp_quality)
        .unwrap_or(DEFAULT_QUALITY);

    Ok((output_format, quality))
}

/// Metadata for an uploaded image.
pub async fn info(mut multipart: Multipart) -> ApiResult<Json<ImageInfo>> {
    let form = read_form(&mut multipart).await?;
    let file = form.single_file()?;
    validate_image_upload(file)?;

    let info = image_info(file.path(), &file.filename)
        .map_err(|e| ApiError::bad_request(format!("Could not read image: {e}")))?;
    Ok(Json(info))
}

/// Convert one uploaded image, returning the converted bytes as an
/// attachment named `{stem}.{format}`.
pub async fn convert(mut multipart: Multipart) -> ApiResult<Response> {
    let form = read_form(&mut multipart).await?;
    let file = form.single_file()?;
    validate_image_upload(file)?;
    let (output_format, quality) = conversion_params(&form)?;

    let (bytes, mime) = convert_image(file.path(), &output_format, quality)?;
    let output_filename = format!("{}.{}", file.stem(), output_format);
    info!(
        "converted {} to {} ({} -> {} bytes)",
        file.filename,
        output_format,
        file.size,
        bytes.len()
    );

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", mime.to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename=\"{output_filename}\""),
            ),
            ("X-Original-Size", file.size.to_string()),
            ("X-Converted-Size", bytes.len().to_string()),
        ],
        bytes,
    )
        .into_response())
}

/// Convert a batch of uploaded images and return the results as a ZIP.
/// Files that fail are skipped and counted; 400 only if nothing converts.
pub async fn convert_bulk(mut multipart: Multipart) -> ApiResult<Response> {
    let form = read_form(&mut multipart).await?;
    let (output_format, quality) = conversion_params(&form)?;

    let mut entries = Vec::new();
    let mut errors = Vec::new();

    for file in &form.files {
        if !is_image_filename(&file.filename) {
            errors.push(format!("{}: Invalid file type", file.filename));
            continue;
        }
        match convert_image(file.path(), &output_format, quality) {
            Ok((bytes, _)) => {
                entries.push((format!("{}.{}", file.stem(), output_format), bytes));
            }
            Err(e) => {
                warn!("bulk convert skipped {}: {e}", file.filename);
                errors.push(format!("{}: {e}", file.filename));
            }
        }
    }

    if entries.is_empty() {
        return Err(ApiError::bad_request(format!(
            "No images could be converted. Errors: {}",
            errors.join("; ")
        )));
    }

    let converted_count = entries.len();
    let zip_bytes = zip_entries(entries)?;
    info!(
        "bulk converted {converted_count} images to {output_format} ({} failed)",
        errors.len()
    );

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", "application/zip".to_string()),
            (
                "Content-Disposition",
                "attachment; filename=\"converted_images.zip\"".to_string(),
            ),
            ("X-Converted-Count", converted_count.to_string()),
            ("X-Error-Count", errors.len().to_string()),
        ],
        zip_bytes,
    )
        .into_response())
}
