//! Merging PDF documents.
//!
//! Source documents are renumbered into one id space, their page objects
//! are collected in order, and a single Pages tree plus Catalog is rebuilt
//! on top. Outline trees are dropped rather than stitched together.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{MediaError, Result};

fn dict_type(object: &Object) -> Option<&[u8]> {
    object.as_dict().ok()?.get(b"Type").ok()?.as_name().ok()
}

/// Merge documents into one; pages keep the order of `documents` and the
/// page order within each.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    let mut max_id = 1;
    let mut page_order: Vec<ObjectId> = Vec::new();
    let mut page_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut all_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        for (_, object_id) in doc.get_pages() {
            page_order.push(object_id);
            if let Ok(object) = doc.get_object(object_id) {
                page_objects.insert(object_id, object.to_owned());
            }
        }
        all_objects.append(&mut doc.objects);
    }

    let mut merged = Document::with_version("1.5");
    let mut catalog: Option<(ObjectId, Dictionary)> = None;
    let mut pages_root: Option<(ObjectId, Dictionary)> = None;

    for (object_id, object) in all_objects {
        match dict_type(&object) {
            Some(b"Catalog") => {
                let id = catalog.as_ref().map(|(id, _)| *id).unwrap_or(object_id);
                if let Ok(dict) = object.as_dict() {
                    catalog = Some((id, dict.clone()));
                }
            }
            Some(b"Pages") => {
                if let Ok(dict) = object.as_dict() {
                    let mut dict = dict.clone();
                    if let Some((_, old)) = &pages_root {
                        dict.extend(old);
                    }
                    let id = pages_root.as_ref().map(|(id, _)| *id).unwrap_or(object_id);
                    pages_root = Some((id, dict));
                }
            }
            // Pages are re-inserted below; outlines are not merged.
            Some(b"Page") | Some(b"Outlines") | Some(b"Outline") => {}
            _ => {
                merged.objects.insert(object_id, object);
            }
        }
    }

    let (pages_id, mut pages_dict) = pages_root
        .ok_or_else(|| MediaError::InvalidInput("Pages root not found".to_string()))?;
    let (catalog_id, mut catalog_dict) = catalog
        .ok_or_else(|| MediaError::InvalidInput("Catalog root not found".to_string()))?;

    for object_id in &page_order {
        if let Some(object) = page_objects.get(object_id) {
            if let Ok(dict) = object.as_dict() {
                let mut dict = dict.clone();
                dict.set("Parent", Object::Reference(pages_id));
                merged.objects.insert(*object_id, Object::Dictionary(dict));
            }
        }
    }

    pages_dict.set("Count", page_order.len() as u32);
    pages_dict.set(
        "Kids",
        page_order
            .iter()
            .map(|id| Object::Reference(*id))
            .collect::<Vec<_>>(),
    );
    merged.objects.insert(pages_id, Object::Dictionary(pages_dict));

    catalog_dict.set("Pages", Object::Reference(pages_id));
    catalog_dict.remove(b"Outlines");
    merged.objects.insert(catalog_id, Object::Dictionary(catalog_dict));

    merged.trailer.set("Root", Object::Reference(catalog_id));
    merged.max_id = merged.objects.len() as u32;
    merged.renumber_objects();
    merged.compress();

    Ok(merged)
}

/// Merge the PDF files at `paths`, in order, into one document's bytes.
pub fn merge_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<u8>> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        documents.push(Document::load(path)?);
    }

    let mut merged = merge_documents(documents)?;
    let mut buffer = Vec::new();
    merged.save_to(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_fixtures::sample_pdf;

    fn load(bytes: &[u8]) -> Document {
        Document::load_mem(bytes).unwrap()
    }

    #[test]
    fn test_merge_concatenates_page_counts() {
        let merged =
            merge_documents(vec![load(&sample_pdf(3)), load(&sample_pdf(2))]).unwrap();
        assert_eq!(merged.get_pages().len(), 5);
    }

    #[test]
    fn test_merge_survives_save_and_reload() {
        let mut merged =
            merge_documents(vec![load(&sample_pdf(1)), load(&sample_pdf(4))]).unwrap();

        let mut buffer = Vec::new();
        merged.save_to(&mut buffer).unwrap();

        let reloaded = Document::load_mem(&buffer).unwrap();
        assert_eq!(reloaded.get_pages().len(), 5);
    }

    fn page_content(doc: &Document, page_no: u32) -> Vec<u8> {
        let page_id = doc.get_pages()[&page_no];
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let contents_id = page.get(b"Contents").unwrap().as_reference().unwrap();
        let stream = doc.get_object(contents_id).unwrap().as_stream().unwrap();
        stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone())
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_merge_preserves_document_order() {
        // Page text is "Page N" per source; after merging a 2-pager with a
        // 1-pager the third page must come from the second document.
        let merged =
            merge_documents(vec![load(&sample_pdf(2)), load(&sample_pdf(1))]).unwrap();
        assert_eq!(merged.get_pages().len(), 3);

        assert!(contains(&page_content(&merged, 2), b"Page 2"));
        assert!(contains(&page_content(&merged, 3), b"Page 1"));
    }

    #[test]
    fn test_merge_empty_input_is_an_error() {
        assert!(merge_documents(Vec::new()).is_err());
    }
}
