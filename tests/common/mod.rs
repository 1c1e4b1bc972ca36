//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use pdf_watermark::tile::GlyphSource;
use pdf_watermark::{Rgb, WatermarkSpec};

// Keep in sync with CANDIDATES in src/tile/font.rs (test_support).
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Path of an installed system font, if any
pub fn system_font_path() -> Option<&'static Path> {
    let found = FONT_CANDIDATES.iter().map(Path::new).find(|p| p.is_file());
    if found.is_none() {
        eprintln!("Skipping test: no system font found");
    }
    found
}

/// The example watermark: gray CONFIDENTIAL at 30 degrees
pub fn confidential_spec() -> Option<WatermarkSpec> {
    let data = std::fs::read(system_font_path()?).ok()?;
    let font = Arc::new(GlyphSource::from_bytes(data).ok()?);
    Some(WatermarkSpec {
        text: "CONFIDENTIAL".to_string(),
        font,
        font_size: 25,
        color: Rgb::new(128, 128, 128),
        opacity: 0.3,
        rotation: 30,
        spacing: 100,
    })
}

/// Build a PDF with one page per size; page N shows the text "Page N".
///
/// The first size goes on the page tree root and is inherited; pages with a
/// different size carry their own MediaBox. Fonts are inherited too.
pub fn build_pdf(sizes: &[(i64, i64)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for (i, &(width, height)) in sizes.iter().enumerate() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 72.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {}", i + 1))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if (width, height) != sizes[0] {
            page.set("MediaBox", vec![Object::Integer(0), Object::Integer(0), Object::Integer(width), Object::Integer(height)]);
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let (first_width, first_height) = sizes.first().copied().unwrap_or((612, 792));
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => sizes.len() as i64,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(first_width), Object::Integer(first_height)],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Page object ids in page order
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Decoded text of every content stream on a page, in drawing order
pub fn page_content_text(doc: &Document, page_id: ObjectId) -> Vec<String> {
    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
    let refs = match page.get(b"Contents").unwrap() {
        Object::Array(array) => array.clone(),
        other => vec![other.clone()],
    };
    refs.iter()
        .map(|r| {
            let stream = doc.get_object(r.as_reference().unwrap()).unwrap().as_stream().unwrap();
            let bytes = stream.decompressed_content().unwrap_or_else(|_| stream.content.clone());
            String::from_utf8_lossy(&bytes).into_owned()
        })
        .collect()
}

/// Names of the image XObjects registered on a page
pub fn page_xobject_names(doc: &Document, page_id: ObjectId) -> Vec<String> {
    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    match resources.get(b"XObject") {
        Ok(Object::Dictionary(xobjects)) => xobjects
            .iter()
            .map(|(name, _)| String::from_utf8_lossy(name).into_owned())
            .collect(),
        _ => Vec::new(),
    }
}
