//! Extracting and splitting PDF pages.
//!
//! Extraction works by whitelist: clone the document, delete every page
//! outside the selection in reverse order, then prune orphaned objects.

use std::collections::HashSet;
use std::path::Path;

use lopdf::Document;

use crate::archive::zip_entries;
use crate::error::Result;
use crate::pages::select_pages;

/// New document bytes containing only the 0-indexed `pages`, in document
/// order.
fn extract_page_set(doc: &Document, pages: &[usize]) -> Result<Vec<u8>> {
    let total = doc.get_pages().len() as u32;
    let keep: HashSet<u32> = pages.iter().map(|p| (*p + 1) as u32).collect();

    let mut pruned = doc.clone();
    let mut to_delete: Vec<u32> = (1..=total).filter(|p| !keep.contains(p)).collect();
    to_delete.reverse();
    for page_num in to_delete {
        pruned.delete_pages(&[page_num]);
    }

    pruned.prune_objects();
    pruned.compress();

    let mut buffer = Vec::new();
    pruned.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Extract the pages matched by `spec` (1-indexed, e.g. `"1,3,5-7"`) into
/// a new document. An empty selection is an error.
pub fn extract_pages(path: &Path, spec: &str) -> Result<Vec<u8>> {
    let doc = Document::load(path)?;
    let total_pages = doc.get_pages().len();
    let selected = select_pages(spec, total_pages)?;
    extract_page_set(&doc, &selected)
}

/// Split into one document per page. Filenames are
/// `{stem}_page_{n:03}.pdf`, 1-indexed.
pub fn split_into_pages(path: &Path, stem: &str) -> Result<Vec<(String, Vec<u8>)>> {
    let doc = Document::load(path)?;
    let total = doc.get_pages().len();

    let mut parts = Vec::with_capacity(total);
    for i in 0..total {
        let bytes = extract_page_set(&doc, &[i])?;
        parts.push((format!("{stem}_page_{:03}.pdf", i + 1), bytes));
    }
    Ok(parts)
}

/// ZIP of [`split_into_pages`] output.
pub fn split_to_zip(path: &Path, stem: &str) -> Result<Vec<u8>> {
    let parts = split_into_pages(path, stem)?;
    zip_entries(parts)
}
