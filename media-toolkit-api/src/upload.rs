//! Multipart upload handling.
//!
//! Uploaded files are buffered to disk through [`NamedTempFile`] so the
//! media backends (ffmpeg in particular) can work on real paths. The temp
//! file keeps the client's extension, which format sniffing and ffmpeg
//! both care about. Files are deleted when the [`UploadedFile`] drops.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// An uploaded file, spooled to a temp path.
pub struct UploadedFile {
    /// Filename as sent by the client.
    pub filename: String,
    /// Upload size in bytes.
    pub size: usize,
    temp: NamedTempFile,
}

impl UploadedFile {
    /// Path of the spooled temp file.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Stem of the client filename, for naming derived outputs.
    pub fn stem(&self) -> String {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("upload")
            .to_string()
    }
}

/// A parsed multipart form: uploaded files plus plain text fields.
#[derive(Default)]
pub struct MultipartForm {
    pub files: Vec<UploadedFile>,
    fields: HashMap<String, String>,
}

impl MultipartForm {
    /// A text field by name.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The single uploaded file, or 400 when none was sent.
    pub fn single_file(&self) -> ApiResult<&UploadedFile> {
        self.files
            .first()
            .ok_or_else(|| ApiError::bad_request("No file provided in upload"))
    }
}

/// Drain a multipart request into temp files and text fields. File parts
/// are recognized under the conventional `file` / `files` names or by
/// carrying a client filename.
pub async fn read_form(multipart: &mut Multipart) -> ApiResult<MultipartForm> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Multipart(format!("Failed to read multipart field: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        let is_file_field =
            matches!(name.as_str(), "file" | "files" | "files[]") || field.file_name().is_some();

        if is_file_field {
            let filename = field.file_name().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::Multipart(format!("Failed to read file data: {e}")))?;

            let suffix = Path::new(&filename)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{e}"))
                .unwrap_or_default();
            let temp = tempfile::Builder::new()
                .suffix(&suffix)
                .tempfile()
                .map_err(|e| ApiError::Media(e.into()))?;
            std::fs::write(temp.path(), &data).map_err(|e| ApiError::Media(e.into()))?;

            debug!("spooled upload {filename} ({} bytes)", data.len());
            form.files.push(UploadedFile {
                filename,
                size: data.len(),
                temp,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::Multipart(format!("Failed to read form field: {e}")))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
