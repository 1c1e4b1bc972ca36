//! Watermark stamping using lopdf
//!
//! The tile is rendered once, sized to the first page, embedded once as an
//! image XObject with a soft mask, and drawn over every page's media box.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info, warn};

use crate::canvas::CanvasSize;
use crate::error::{Error, Result};
use crate::pdf::geometry::{load_document, page_media_box, MediaBox};
use crate::pdf::resources::{add_xobject_to_page, append_overlay_content};
use crate::tile::{generate_tile, render_tile};
use crate::watermark::WatermarkSpec;

/// Resource name the tile image is registered under on each page
const TILE_XOBJECT_NAME: &str = "WmTile";

/// Overlay the watermark onto every page of a PDF
///
/// Every page receives the same tile, sized to the first page's media box and
/// stretched to fill each page's own box. Either the whole stamped document is
/// returned or an error; nothing partial escapes.
///
/// # Example
///
/// ```no_run
/// use pdf_watermark::config::FontConfig;
/// use pdf_watermark::pdf::stamp_document;
/// use pdf_watermark::watermark::{Rgb, WatermarkSpec};
///
/// let spec = WatermarkSpec {
///     text: "CONFIDENTIAL".to_string(),
///     font: FontConfig::default().load()?,
///     font_size: 25,
///     color: Rgb::new(128, 128, 128),
///     opacity: 0.3,
///     rotation: 30,
///     spacing: 100,
/// };
///
/// let source = std::fs::read("report.pdf")?;
/// let stamped = stamp_document(&source, &spec)?;
/// std::fs::write("watermarked_report.pdf", stamped)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn stamp_document(source: &[u8], spec: &WatermarkSpec) -> Result<Vec<u8>> {
    spec.validate()?;

    let mut doc = load_document(source)?;
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();

    let first_box = page_media_box(&doc, pages[0])?;
    let canvas = CanvasSize::from_points(first_box.width(), first_box.height())?;
    debug!(width = canvas.width, height = canvas.height, pages = pages.len(), "Rendering watermark tile");

    let tile = render_tile(spec, canvas.width, canvas.height)?;
    let image_id = embed_tile_image(&mut doc, &tile);

    for (index, &page_id) in pages.iter().enumerate() {
        let media = page_media_box(&doc, page_id)?;
        if media.width() != first_box.width() || media.height() != first_box.height() {
            warn!(
                page = index + 1,
                width = media.width(),
                height = media.height(),
                "Page size differs from first page, watermark will be stretched"
            );
        }

        let name = add_xobject_to_page(&mut doc, page_id, TILE_XOBJECT_NAME, image_id)?;
        append_overlay_content(&mut doc, page_id, draw_image_content(&name, &media)?)?;
    }

    doc.compress();

    let mut output = Vec::new();
    doc.save_to(&mut output).map_err(Error::processing)?;

    info!(pages = pages.len(), bytes = output.len(), "Stamped watermark onto document");

    Ok(output)
}

/// Render the tile for the first page of a PDF and encode it as PNG
///
/// The document is only read for its geometry; nothing is modified.
pub fn preview_tile(source: &[u8], spec: &WatermarkSpec) -> Result<Vec<u8>> {
    spec.validate()?;

    let canvas = {
        let doc = load_document(source)?;
        let first_page = doc
            .get_pages()
            .into_values()
            .next()
            .ok_or_else(|| Error::DocumentParse("PDF has no pages".to_string()))?;
        let media = page_media_box(&doc, first_page)?;
        CanvasSize::from_points(media.width(), media.height())?
    };

    generate_tile(spec, canvas.width, canvas.height)
}

/// Output path for a stamped file: `watermarked_<name>` next to the input
pub fn watermarked_file_name(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    input.with_file_name(format!("watermarked_{}", name))
}

/// Add the tile as an RGB image XObject with its alpha as a soft mask.
fn embed_tile_image(doc: &mut Document, tile: &RgbaImage) -> ObjectId {
    let (width, height) = tile.dimensions();
    let pixel_count = (width as usize) * (height as usize);

    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for pixel in tile.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel[3]);
    }

    let smask_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        alpha,
    ));

    doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "SMask" => smask_id,
        },
        rgb,
    ))
}

/// Content stream that paints the named image over a page's media box
fn draw_image_content(name: &str, media: &MediaBox) -> Result<Vec<u8>> {
    let (x, y) = media.origin();
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(media.width()),
                    0.into(),
                    0.into(),
                    Object::Real(media.height()),
                    Object::Real(x),
                    Object::Real(y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    content.encode().map_err(Error::processing)
}
