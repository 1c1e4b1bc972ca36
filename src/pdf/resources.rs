//! Page resource and content stream editing using lopdf
//!
//! Overlays are added by giving the page its own copy of the resource
//! dictionary (pages often share or inherit one) and appending a content
//! stream after the original content, which is isolated in `q`/`Q`.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use crate::error::{Error, Result};
use crate::pdf::geometry::{inherited_attribute, resolve};

/// Register an XObject on a page under an unused name derived from `base_name`
///
/// Returns the name actually used. Existing entries are never overwritten, so
/// stamping a page twice leaves both overlays in place.
pub fn add_xobject_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    base_name: &str,
    xobject_id: ObjectId,
) -> Result<String> {
    // Copy the effective resources, dereferencing shared or inherited ones
    let mut resources = match inherited_attribute(doc, page_id, b"Resources")? {
        Some(res) => match resolve(doc, res)? {
            Object::Dictionary(dict) => dict.clone(),
            _ => Dictionary::new(),
        },
        None => Dictionary::new(),
    };

    let mut xobjects = match resources.get(b"XObject") {
        Ok(xo) => match resolve(doc, xo)? {
            Object::Dictionary(dict) => dict.clone(),
            _ => Dictionary::new(),
        },
        Err(_) => Dictionary::new(),
    };

    let name = unused_name(&xobjects, base_name);
    xobjects.set(name.as_bytes().to_vec(), Object::Reference(xobject_id));
    resources.set("XObject", Object::Dictionary(xobjects));

    // Set the Resources directly on the page so the overlay stays page-local
    page_dictionary_mut(doc, page_id)?.set("Resources", Object::Dictionary(resources));

    Ok(name)
}

fn unused_name(xobjects: &Dictionary, base_name: &str) -> String {
    if !xobjects.has(base_name.as_bytes()) {
        return base_name.to_string();
    }
    (1..)
        .map(|n| format!("{}{}", base_name, n))
        .find(|candidate| !xobjects.has(candidate.as_bytes()))
        .unwrap_or_else(|| base_name.to_string())
}

/// Wrap the page's existing content in a `q`/`Q` pair and append `overlay`
/// after it, so the overlay draws on top with a clean graphics state.
pub fn append_overlay_content(doc: &mut Document, page_id: ObjectId, overlay: Vec<u8>) -> Result<()> {
    let existing = page_contents(doc, page_id)?;

    let mut contents = Vec::with_capacity(existing.len() + 2);
    if !existing.is_empty() {
        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        contents.push(Object::Reference(save_id));
        contents.extend(existing);

        let restore_id = doc.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
        contents.push(Object::Reference(restore_id));
    }

    let overlay_id = doc.add_object(Stream::new(Dictionary::new(), overlay));
    contents.push(Object::Reference(overlay_id));

    page_dictionary_mut(doc, page_id)?.set("Contents", Object::Array(contents));

    Ok(())
}

/// Current content stream references of a page, in drawing order
fn page_contents(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = match doc.get_object(page_id).map_err(Error::processing)? {
        Object::Dictionary(dict) => dict,
        _ => return Err(Error::Processing(format!("Page {:?} is not a dictionary", page_id))),
    };

    let contents = match page.get(b"Contents") {
        Ok(contents) => contents,
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id).map_err(Error::processing)? {
            // An indirect array of streams is flattened into the page
            Object::Array(array) => Ok(array.clone()),
            _ => Ok(vec![Object::Reference(*id)]),
        },
        Object::Array(array) => Ok(array.clone()),
        _ => Err(Error::Processing(format!("Page {:?} has malformed Contents", page_id))),
    }
}

fn page_dictionary_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary> {
    match doc.get_object_mut(page_id).map_err(Error::processing)? {
        Object::Dictionary(dict) => Ok(dict),
        _ => Err(Error::Processing(format!("Page {:?} is not a dictionary", page_id))),
    }
}
