//! PDF page geometry and document metadata

use std::path::Path;
use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::error::{Error, Result};
use crate::layout::PageSize;

/// Page attributes that a page may inherit from its ancestors in the page tree
pub(crate) const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Page trees deeper than this are treated as cyclic
const MAX_TREE_DEPTH: usize = 64;

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Size of the first page (if the document has pages)
    pub first_page_size: Option<PageSize>,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
}

/// Load a PDF, attaching the path to any parse error
pub fn load_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    Document::load(path).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Page object ids in document order
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Look up a page attribute, walking up through `Parent` links if needed
pub fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
    }

    None
}

/// Physical size of a page from its (possibly inherited) MediaBox
pub fn page_size(doc: &Document, page_id: ObjectId) -> Result<PageSize> {
    let media_box = inherited_attribute(doc, page_id, b"MediaBox")
        .ok_or_else(|| Error::InvalidGeometry(format!("page {:?} has no MediaBox", page_id)))?;

    let rect = parse_rect(doc, &media_box)
        .ok_or_else(|| Error::InvalidGeometry(format!("page {:?} has a malformed MediaBox", page_id)))?;

    Ok(PageSize::from_rect(rect))
}

/// Size of the first page, or `None` for a document without pages
pub fn first_page_size(doc: &Document) -> Result<Option<PageSize>> {
    match doc.get_pages().into_values().next() {
        Some(page_id) => page_size(doc, page_id).map(Some),
        None => Ok(None),
    }
}

/// Read a `[x0 y0 x1 y1]` rectangle, resolving indirect values
fn parse_rect(doc: &Document, object: &Object) -> Option<[f32; 4]> {
    let values = match resolve(doc, object)? {
        Object::Array(values) => values,
        _ => return None,
    };
    if values.len() != 4 {
        return None;
    }

    let mut rect = [0.0; 4];
    for (slot, value) in rect.iter_mut().zip(values) {
        *slot = match resolve(doc, value)? {
            Object::Integer(n) => *n as f32,
            Object::Real(r) => *r as f32,
            _ => return None,
        };
    }
    Some(rect)
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Read a text entry from the Info dictionary
fn info_string(info: &Dictionary, key: &[u8]) -> Option<String> {
    let bytes = info.get(key).ok()?.as_str().ok()?;
    String::from_utf8(bytes.to_vec()).ok()
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    let doc = load_document(path)?;

    let page_count = doc.get_pages().len();
    let first_page_size = first_page_size(&doc)?;

    let info = doc
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .ok();

    Ok(PdfMetadata {
        page_count,
        first_page_size,
        title: info.and_then(|info| info_string(info, b"Title")),
        author: info.and_then(|info| info_string(info, b"Author")),
    })
}

/// Count the number of pages in a PDF file
pub fn count_pages(path: &Path) -> Result<usize> {
    let doc = load_document(path)?;
    Ok(doc.get_pages().len())
}
