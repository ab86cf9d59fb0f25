//! Audio extraction handlers.

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::info;

use media_toolkit::audio::extract_audio;
use media_toolkit::audio::format::{
    bitrate_choices, format_choices, lookup_format, DEFAULT_BITRATE,
};
use media_toolkit::video::presets::{is_video_path, video_extension_list};
use media_toolkit::video::probe::{audio_summary, AudioSummary};

use crate::error::{ApiError, ApiResult};
use crate::upload::{read_form, UploadedFile};

/// Audio formats and bitrate options for extraction.
pub async fn list_formats() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "formats": format_choices(),
        "bitrates": bitrate_choices(),
    }))
}

fn validate_video_upload(file: &UploadedFile) -> ApiResult<()> {
    if !is_video_path(std::path::Path::new(&file.filename)) {
        return Err(ApiError::UnsupportedMedia(format!(
            "Invalid file type. Allowed video formats: {}",
            video_extension_list()
        )));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct AudioInfoResponse {
    #[serde(flatten)]
    pub summary: AudioSummary,
    pub filename: String,
    pub file_size: usize,
}

/// Audio stream summary of an uploaded video.
pub async fn info(mut multipart: Multipart) -> ApiResult<Json<AudioInfoResponse>> {
    let form = read_form(&mut multipart).await?;
    let file = form.single_file()?;
    validate_video_upload(file)?;

    let summary = audio_summary(file.path())
        .await
        .map_err(|e| ApiError::bad_request(format!("Could not analyze video: {e}")))?;

    Ok(Json(AudioInfoResponse {
        summary,
        filename: file.filename.clone(),
        file_size: file.size,
    }))
}

/// Extract the audio track of an uploaded video, returning the encoded
/// bytes as an attachment named `{stem}.{extension}`.
pub async fn extract(mut multipart: Multipart) -> ApiResult<Response> {
    let form = read_form(&mut multipart).await?;
    let file = form.single_file()?;
    validate_video_upload(file)?;

    let output_format = form.text("output_format").unwrap_or("mp3").to_lowercase();
    if lookup_format(&output_format).is_none() {
        let names: Vec<_> = format_choices().into_iter().map(|f| f.value).collect();
        return Err(ApiError::UnsupportedMedia(format!(
            "Invalid output format. Allowed: {}",
            names.join(", ")
        )));
    }
    let bitrate = form.text("bitrate").unwrap_or(DEFAULT_BITRATE);

    let (bytes, format) = extract_audio(file.path(), &output_format, bitrate).await?;
    let output_filename = format!("{}.{}", file.stem(), format.extension);
    info!(
        "extracted {} from {} ({} bytes)",
        format.name,
        file.filename,
        bytes.len()
    );

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", format.mime.to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename=\"{output_filename}\""),
            ),
            ("X-Original-Size", file.size.to_string()),
            ("X-Audio-Size", bytes.len().to_string()),
        ],
        bytes,
    )
        .into_response())
}
