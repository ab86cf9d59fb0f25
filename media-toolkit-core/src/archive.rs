//! In-memory ZIP assembly for multi-file downloads.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

/// Deflate-compress named entries into a ZIP held in memory.
pub fn zip_entries(entries: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut writer = ZipWriter::new(&mut cursor);
    for (name, bytes) in entries {
        writer.start_file(name, options)?;
        writer.write_all(&bytes)?;
    }
    writer.finish()?;

    Ok(cursor.into_inner())
}

/// Like [`zip_entries`], reading each entry's contents from disk.
pub fn zip_files(files: Vec<(String, std::path::PathBuf)>) -> Result<Vec<u8>> {
    let mut entries = Vec::with_capacity(files.len());
    for (name, path) in files {
        entries.push((name, std::fs::read(path)?));
    }
    zip_entries(entries)
}
