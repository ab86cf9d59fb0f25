//! PDF merge and split handlers.

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use media_toolkit::pdf::merge::merge_files;
use media_toolkit::pdf::split::{extract_pages, split_to_zip};
use media_toolkit::pdf::{is_pdf_filename, pdf_info, PdfInfo};

use crate::error::{ApiError, ApiResult};
use crate::upload::{read_form, UploadedFile};

fn validate_pdf_upload(file: &UploadedFile) -> ApiResult<()> {
    if !is_pdf_filename(&file.filename) {
        return Err(ApiError::UnsupportedMedia("File must be a PDF".to_string()));
    }
    Ok(())
}

/// Page count and size of an uploaded PDF.
pub async fn info(mut multipart: Multipart) -> ApiResult<Json<PdfInfo>> {
    let form = read_form(&mut multipart).await?;
    let file = form.single_file()?;
    validate_pdf_upload(file)?;

    let info = pdf_info(file.path(), &file.filename)
        .map_err(|e| ApiError::bad_request(format!("Could not read PDF: {e}")))?;
    Ok(Json(info))
}

/// Merge the uploaded PDFs, in upload order, into `merged.pdf`.
pub async fn merge(mut multipart: Multipart) -> ApiResult<Response> {
    let form = read_form(&mut multipart).await?;

    if form.files.len() < 2 {
        return Err(ApiError::bad_request("Need at least 2 PDFs to merge"));
    }
    for file in &form.files {
        if !is_pdf_filename(&file.filename) {
            return Err(ApiError::UnsupportedMedia(format!(
                "File '{}' is not a PDF",
                file.filename
            )));
        }
    }

    let paths: Vec<_> = form.files.iter().map(|f| f.path()).collect();
    let merged = merge_files(&paths).map_err(|e| ApiError::internal(format!("Merge failed: {e}")))?;
    info!("merged {} PDFs ({} bytes)", form.files.len(), merged.len());

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", "application/pdf".to_string()),
            (
                "Content-Disposition",
                "attachment; filename=\"merged.pdf\"".to_string(),
            ),
        ],
        merged,
    )
        .into_response())
}

/// Split an uploaded PDF. Mode `all` returns a ZIP of single-page files;
/// mode `range` extracts the pages named by the `pages` field into one PDF.
pub async fn split(mut multipart: Multipart) -> ApiResult<Response> {
    let form = read_form(&mut multipart).await?;
    let file = form.single_file()?;
    validate_pdf_upload(file)?;

    let mode = form.text("mode").unwrap_or("all");
    let stem = file.stem();

    if mode == "all" {
        let zip_bytes = split_to_zip(file.path(), &stem)?;
        info!("split {} into per-page ZIP", file.filename);

        return Ok((
            StatusCode::OK,
            [
                ("Content-Type", "application/zip".to_string()),
                (
                    "Content-Disposition",
                    format!("attachment; filename=\"{stem}_pages.zip\""),
                ),
            ],
            zip_bytes,
        )
            .into_response());
    }

    let pages = form.text("pages").unwrap_or("");
    if pages.is_empty() {
        return Err(ApiError::bad_request(
            "Please specify pages to extract (e.g., '1,3,5-7')",
        ));
    }

    let extracted = extract_pages(file.path(), pages)?;
    info!("extracted pages {pages} from {}", file.filename);

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", "application/pdf".to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename=\"{stem}_extracted.pdf\""),
            ),
        ],
        extracted,
    )
        .into_response())
}
