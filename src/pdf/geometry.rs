//! Page geometry and document metadata

use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::error::{Error, Result};

/// Parent chains deeper than this are treated as malformed.
const MAX_TREE_DEPTH: usize = 32;

/// Page box in PDF user space (points)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub llx: f32,
    pub lly: f32,
    pub urx: f32,
    pub ury: f32,
}

impl MediaBox {
    pub fn width(&self) -> f32 {
        (self.urx - self.llx).abs()
    }

    pub fn height(&self) -> f32 {
        (self.ury - self.lly).abs()
    }

    /// Lower-left corner after normalizing inverted boxes
    pub fn origin(&self) -> (f32, f32) {
        (self.llx.min(self.urx), self.lly.min(self.ury))
    }
}

/// Summary of a PDF, as shown by the `info` command
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Media box of the first page
    pub first_page: MediaBox,
}

/// Parse PDF bytes, requiring at least one page.
pub fn load_document(source: &[u8]) -> Result<Document> {
    if source.is_empty() {
        return Err(Error::DocumentParse("input is empty".to_string()));
    }

    let doc = Document::load_mem(source).map_err(|e| Error::DocumentParse(e.to_string()))?;

    if doc.get_pages().is_empty() {
        return Err(Error::DocumentParse("PDF has no pages".to_string()));
    }

    Ok(doc)
}

/// Extract page count and first page geometry from PDF bytes
pub fn document_info(source: &[u8]) -> Result<DocumentInfo> {
    let doc = load_document(source)?;
    let pages = doc.get_pages();

    let first_page_id = *pages
        .values()
        .next()
        .ok_or_else(|| Error::DocumentParse("PDF has no pages".to_string()))?;

    Ok(DocumentInfo {
        page_count: pages.len(),
        first_page: page_media_box(&doc, first_page_id)?,
    })
}

/// Media box of a page, following `/Parent` inheritance.
pub fn page_media_box(doc: &Document, page_id: ObjectId) -> Result<MediaBox> {
    let value = inherited_attribute(doc, page_id, b"MediaBox")?
        .ok_or_else(|| Error::Processing(format!("Page {:?} has no MediaBox", page_id)))?;

    let array = match resolve(doc, value)? {
        Object::Array(array) => array,
        _ => return Err(Error::Processing("MediaBox is not an array".to_string())),
    };

    if array.len() != 4 {
        return Err(Error::Processing(format!(
            "MediaBox has {} entries, expected 4",
            array.len()
        )));
    }

    let mut coords = [0.0f32; 4];
    for (slot, entry) in coords.iter_mut().zip(array) {
        *slot = number(resolve(doc, entry)?)
            .ok_or_else(|| Error::Processing("MediaBox entry is not a number".to_string()))?;
    }

    Ok(MediaBox {
        llx: coords[0],
        lly: coords[1],
        urx: coords[2],
        ury: coords[3],
    })
}

/// Look up a page attribute on the page itself or its ancestors in the page tree.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut current = Some(page_id);
    let mut depth = 0;

    while let Some(id) = current {
        if depth > MAX_TREE_DEPTH {
            return Err(Error::Processing("Page tree is too deep or cyclic".to_string()));
        }

        let dict = node_dictionary(doc, id)?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        current = match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => Some(*parent),
            _ => None,
        };
        depth += 1;
    }

    Ok(None)
}

fn node_dictionary(doc: &Document, id: ObjectId) -> Result<&Dictionary> {
    match doc.get_object(id).map_err(Error::processing)? {
        Object::Dictionary(dict) => Ok(dict),
        Object::Stream(stream) => Ok(&stream.dict),
        _ => Err(Error::Processing(format!("Page tree node {:?} is not a dictionary", id))),
    }
}

/// Follow a chain of indirect references to the underlying object.
pub(crate) fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object> {
    let mut current = object;
    for _ in 0..MAX_TREE_DEPTH {
        match current {
            Object::Reference(id) => current = doc.get_object(*id).map_err(Error::processing)?,
            _ => return Ok(current),
        }
    }
    Err(Error::Processing("Reference chain is too long".to_string()))
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}
