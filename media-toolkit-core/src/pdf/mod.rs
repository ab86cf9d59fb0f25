//! PDF page operations backed by lopdf.

pub mod merge;
pub mod split;

use std::path::Path;

use lopdf::Document;
use serde::Serialize;

use crate::error::Result;

/// Basic facts about a PDF file.
#[derive(Debug, Clone, Serialize)]
pub struct PdfInfo {
    pub filename: String,
    pub num_pages: usize,
    pub size_bytes: u64,
}

/// Page count and size of the PDF at `path`. The reported filename is
/// passed in so callers can substitute a user-facing name for temp paths.
pub fn pdf_info(path: &Path, filename: &str) -> Result<PdfInfo> {
    let doc = Document::load(path)?;
    let size_bytes = std::fs::metadata(path)?.len();

    Ok(PdfInfo {
        filename: filename.to_string(),
        num_pages: doc.get_pages().len(),
        size_bytes,
    })
}

/// Whether a filename carries a `.pdf` extension.
pub fn is_pdf_filename(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{Dictionary, Document, Object, Stream};

    /// Minimal n-page PDF with one line of text per page.
    pub fn sample_pdf(num_pages: u32) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut page_ids = Vec::new();
        for i in 0..num_pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new(
                        "Tf",
                        vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                    ),
                    Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            format!("Page {}", i + 1).into_bytes(),
                            lopdf::StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

            let page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(612),
                        Object::Integer(792),
                    ]),
                ),
                ("Contents", Object::Reference(content_id)),
            ]);
            page_ids.push(doc.add_object(page));
        }

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(num_pages as i64)),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_pdf_filename() {
        assert!(is_pdf_filename("report.pdf"));
        assert!(is_pdf_filename("REPORT.PDF"));
        assert!(!is_pdf_filename("report.docx"));
        assert!(!is_pdf_filename("report"));
    }

    #[test]
    fn test_pdf_info_reads_page_count() {
        let bytes = test_fixtures::sample_pdf(4);
        let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        tmp.write_all(&bytes).unwrap();

        let info = pdf_info(tmp.path(), "report.pdf").unwrap();
        assert_eq!(info.filename, "report.pdf");
        assert_eq!(info.num_pages, 4);
        assert_eq!(info.size_bytes, bytes.len() as u64);
    }

    #[test]
    fn test_pdf_info_rejects_garbage() {
        let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        tmp.write_all(b"not a pdf at all").unwrap();
        assert!(pdf_info(tmp.path(), "bad.pdf").is_err());
    }
}
