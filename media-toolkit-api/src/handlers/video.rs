//! Video splitting and compression handlers.
//!
//! Upload endpoints spool the file through a temp directory; the
//! `-local` family operates on paths the service can already reach,
//! writing results next to the input (or into a requested folder)
//! instead of streaming them back.

use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use media_toolkit::archive::zip_files;
use media_toolkit::video::compress::{
    compress_to_resolution, compress_to_target_size, compress_with_quality,
};
use media_toolkit::video::planner::{
    clamp_parts, estimate_size, plan_parts, CompressionEstimate, EstimateParams, PartPlan,
};
use media_toolkit::video::presets::{
    is_video_path, video_extension_list, QUALITY_LEVELS, RESOLUTION_LADDER,
};
use media_toolkit::video::probe::{probe_duration, video_summary, VideoSummary};
use media_toolkit::video::split::split_video;
use media_toolkit::video::validate_video_path;

use crate::error::{ApiError, ApiResult};
use crate::upload::{read_form, MultipartForm, UploadedFile};

fn validate_video_upload(file: &UploadedFile) -> ApiResult<()> {
    if !is_video_path(Path::new(&file.filename)) {
        return Err(ApiError::UnsupportedMedia(format!(
            "Invalid file type. Allowed: {}",
            video_extension_list()
        )));
    }
    Ok(())
}

/// Validate a client-supplied local path: must exist, be a regular file
/// and carry a video extension.
fn checked_video_path(file_path: &str) -> ApiResult<PathBuf> {
    let path = PathBuf::from(file_path);
    validate_video_path(&path)?;
    Ok(path)
}

fn requested_parts(form: &MultipartForm) -> i64 {
    form.text("num_parts")
        .and_then(|s| s.parse().ok())
        .unwrap_or(2)
}

// ---------------------------------------------------------------
// Upload endpoints
// ---------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct VideoInfoResponse {
    #[serde(flatten)]
    pub summary: VideoSummary,
    pub filename: String,
}

/// Summary of an uploaded video file.
pub async fn info(mut multipart: Multipart) -> ApiResult<Json<VideoInfoResponse>> {
    let form = read_form(&mut multipart).await?;
    let file = form.single_file()?;
    validate_video_upload(file)?;

    let mut summary = video_summary(file.path())
        .await
        .map_err(|e| ApiError::bad_request(format!("Could not analyze video: {e}")))?;
    summary.file_size = file.size as u64;

    Ok(Json(VideoInfoResponse {
        summary,
        filename: file.filename.clone(),
    }))
}

/// Split an uploaded video into equal parts, returned as a ZIP named
/// `{stem}_split_{n}parts.zip`.
pub async fn split(mut multipart: Multipart) -> ApiResult<Response> {
    let form = read_form(&mut multipart).await?;
    let file = form.single_file()?;
    validate_video_upload(file)?;
    let num_parts = clamp_parts(requested_parts(&form));

    // Re-home the upload under its client name so the parts inherit the
    // real stem instead of the temp file's.
    let stem = file.stem();
    let ext = Path::new(&file.filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let work_dir = tempfile::tempdir().map_err(|e| ApiError::Media(e.into()))?;
    let input_path = work_dir.path().join(format!("{stem}{ext}"));
    std::fs::copy(file.path(), &input_path).map_err(|e| ApiError::Media(e.into()))?;
    let output_dir = work_dir.path().join("output");

    let parts = split_video(&input_path, num_parts as i64, Some(&output_dir)).await?;

    let entries = parts
        .iter()
        .map(|p| {
            let name = p
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("part")
                .to_string();
            (name, p.clone())
        })
        .collect();
    let zip_bytes = zip_files(entries)?;
    info!("split upload {} into {num_parts} parts", file.filename);

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", "application/zip".to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename=\"{stem}_split_{num_parts}parts.zip\""),
            ),
            ("X-Num-Parts", num_parts.to_string()),
        ],
        zip_bytes,
    )
        .into_response())
}

// ---------------------------------------------------------------
// Local-path endpoints
// ---------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VideoInfoRequest {
    pub file_path: String,
}

#[derive(Debug, Deserialize)]
pub struct LocalFileRequest {
    pub file_path: String,
    #[serde(default = "default_num_parts")]
    pub num_parts: i64,
}

#[derive(Debug, Deserialize)]
pub struct SplitToFolderRequest {
    pub file_path: String,
    #[serde(default = "default_num_parts")]
    pub num_parts: i64,
    pub output_folder: Option<String>,
}

fn default_num_parts() -> i64 {
    2
}

#[derive(Debug, Serialize)]
pub struct LocalVideoInfoResponse {
    #[serde(flatten)]
    pub summary: VideoSummary,
    pub filename: String,
    pub file_path: String,
}

/// Summary of a local video file, no upload needed.
pub async fn info_local(
    Json(request): Json<VideoInfoRequest>,
) -> ApiResult<Json<LocalVideoInfoResponse>> {
    let path = checked_video_path(&request.file_path)?;

    let mut summary = video_summary(&path)
        .await
        .map_err(|e| ApiError::bad_request(format!("Could not analyze video: {e}")))?;
    summary.file_size = std::fs::metadata(&path)
        .map_err(|e| ApiError::Media(e.into()))?
        .len();

    Ok(Json(LocalVideoInfoResponse {
        summary,
        filename: display_file_name(&path),
        file_path: path.display().to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct SplitResponse {
    pub success: bool,
    pub message: String,
    pub files: Vec<String>,
}

/// Split a local video in place, writing parts next to the input.
pub async fn split_local(Json(request): Json<LocalFileRequest>) -> ApiResult<Json<SplitResponse>> {
    let path = checked_video_path(&request.file_path)?;
    let num_parts = clamp_parts(request.num_parts);

    let files = split_video(&path, num_parts as i64, None).await?;
    Ok(Json(split_response(num_parts, files)))
}

/// Split a local video into a chosen folder (created if absent).
pub async fn split_local_to_folder(
    Json(request): Json<SplitToFolderRequest>,
) -> ApiResult<Json<SplitResponse>> {
    let path = checked_video_path(&request.file_path)?;
    let num_parts = clamp_parts(request.num_parts);
    let output_dir = request.output_folder.map(PathBuf::from);

    let files = split_video(&path, num_parts as i64, output_dir.as_deref()).await?;
    Ok(Json(split_response(num_parts, files)))
}

fn split_response(num_parts: usize, files: Vec<PathBuf>) -> SplitResponse {
    SplitResponse {
        success: true,
        message: format!("Split into {num_parts} parts"),
        files: files.iter().map(|p| p.display().to_string()).collect(),
    }
}

#[derive(Debug, Serialize)]
pub struct SplitPreviewResponse {
    pub filename: String,
    pub file_path: String,
    pub total_duration: f64,
    pub num_parts: usize,
    pub parts: Vec<PartPlan>,
}

/// Preview how a local video would be split, without splitting it.
pub async fn preview_local(
    Json(request): Json<LocalFileRequest>,
) -> ApiResult<Json<SplitPreviewResponse>> {
    let path = checked_video_path(&request.file_path)?;
    let num_parts = clamp_parts(request.num_parts);

    let duration = probe_duration(&path)
        .await
        .map_err(|e| ApiError::bad_request(format!("Could not analyze video: {e}")))?;
    let parts = plan_parts(duration, num_parts);

    Ok(Json(SplitPreviewResponse {
        filename: display_file_name(&path),
        file_path: path.display().to_string(),
        total_duration: duration,
        num_parts,
        parts,
    }))
}

fn display_file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

// ---------------------------------------------------------------
// Compression endpoints
// ---------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CompressTargetSizeRequest {
    pub file_path: String,
    pub target_size_mb: f64,
    pub output_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompressQualityRequest {
    pub file_path: String,
    #[serde(default = "default_quality")]
    pub quality: String,
    pub output_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompressResolutionRequest {
    pub file_path: String,
    pub resolution: String,
    #[serde(default = "default_quality")]
    pub quality: String,
    pub output_path: Option<String>,
}

fn default_quality() -> String {
    "medium".to_string()
}

#[derive(Debug, Serialize)]
pub struct CompressionResponse {
    pub success: bool,
    pub message: String,
    pub output_file: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub reduction_percent: f64,
}

fn compression_response(input: &Path, output: &Path) -> ApiResult<CompressionResponse> {
    let original_size = std::fs::metadata(input)
        .map_err(|e| ApiError::Media(e.into()))?
        .len();
    let compressed_size = std::fs::metadata(output)
        .map_err(|e| ApiError::Media(e.into()))?
        .len();

    let reduction = (1.0 - compressed_size as f64 / original_size as f64) * 100.0;
    Ok(CompressionResponse {
        success: true,
        message: format!(
            "Compressed to {:.1} MB",
            compressed_size as f64 / 1024.0 / 1024.0
        ),
        output_file: output.display().to_string(),
        original_size,
        compressed_size,
        reduction_percent: (reduction * 10.0).round() / 10.0,
    })
}

/// Two-pass compression toward a target size in MB.
pub async fn compress_target_size(
    Json(request): Json<CompressTargetSizeRequest>,
) -> ApiResult<Json<CompressionResponse>> {
    let path = checked_video_path(&request.file_path)?;

    let output = compress_to_target_size(
        &path,
        request.target_size_mb,
        request.output_path.map(PathBuf::from),
    )
    .await?;
    Ok(Json(compression_response(&path, &output)?))
}

/// CRF compression with a named quality preset.
pub async fn compress_quality(
    Json(request): Json<CompressQualityRequest>,
) -> ApiResult<Json<CompressionResponse>> {
    let path = checked_video_path(&request.file_path)?;

    let output = compress_with_quality(
        &path,
        &request.quality,
        request.output_path.map(PathBuf::from),
    )
    .await?;
    Ok(Json(compression_response(&path, &output)?))
}

/// Downscale to a resolution on the ladder plus CRF compression.
pub async fn compress_resolution(
    Json(request): Json<CompressResolutionRequest>,
) -> ApiResult<Json<CompressionResponse>> {
    let path = checked_video_path(&request.file_path)?;

    let output = compress_to_resolution(
        &path,
        &request.resolution,
        &request.quality,
        request.output_path.map(PathBuf::from),
    )
    .await?;
    Ok(Json(compression_response(&path, &output)?))
}

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub file_path: String,
    #[serde(flatten)]
    pub params: EstimateParams,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    #[serde(flatten)]
    pub estimate: CompressionEstimate,
    pub width: u32,
    pub height: u32,
}

/// Estimate the compressed size before committing to an encode.
pub async fn compress_estimate(
    Json(request): Json<EstimateRequest>,
) -> ApiResult<Json<EstimateResponse>> {
    let path = checked_video_path(&request.file_path)?;

    let summary = video_summary(&path)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    let original_size_mb = summary.file_size as f64 / 1024.0 / 1024.0;
    let estimate = estimate_size(&request.params, original_size_mb, summary.width, summary.height);

    Ok(Json(EstimateResponse {
        estimate,
        width: summary.width,
        height: summary.height,
    }))
}

/// Quality presets and the resolution ladder, for populating pickers.
pub async fn compress_options() -> Json<serde_json::Value> {
    let resolutions: Vec<_> = RESOLUTION_LADDER.iter().map(|(name, _)| *name).collect();
    Json(serde_json::json!({
        "quality_presets": QUALITY_LEVELS,
        "resolutions": resolutions,
    }))
}
