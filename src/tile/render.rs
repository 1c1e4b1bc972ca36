//! Tile generation
//!
//! A tile is one full-page RGBA raster holding the watermark text repeated on
//! a grid, optionally rotated. It is rendered once per document and reused on
//! every page.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use tracing::{debug, warn};

use crate::canvas::{centered_crop, rotated_bounds, CanvasSize};
use crate::error::{Error, Result};
use crate::watermark::WatermarkSpec;

/// Render the watermark tile as a raster of exactly `width` x `height`.
///
/// Text cells start at the top-left corner and advance by the measured ink
/// box plus `spec.spacing`; cells running past the right or bottom edge are
/// clipped. A non-zero rotation turns the grid counter-clockwise about its
/// centre and crops the middle back to the requested size.
pub fn render_tile(spec: &WatermarkSpec, width: u32, height: u32) -> Result<RgbaImage> {
    spec.validate()?;
    if width == 0 || height == 0 {
        return Err(Error::InvalidParameter(format!(
            "Tile size must be positive, got {}x{}",
            width, height
        )));
    }

    let target = CanvasSize::checked(width, height)?;
    let tiled = tile_canvas(spec, target)?;

    if spec.rotation == 0 {
        return Ok(tiled);
    }

    Ok(rotate_and_crop(&tiled, spec.rotation as f32, target))
}

/// Render the tile and encode it as PNG.
pub fn generate_tile(spec: &WatermarkSpec, width: u32, height: u32) -> Result<Vec<u8>> {
    let tile = render_tile(spec, width, height)?;
    encode_png(&tile)
}

/// Encode a raster as PNG, keeping the alpha channel.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(Error::processing)?;
    Ok(buffer.into_inner())
}

/// Unrotated grid of text cells.
fn tile_canvas(spec: &WatermarkSpec, target: CanvasSize) -> Result<RgbaImage> {
    let color = spec.color;
    let alpha = spec.alpha();

    // Transparent pixels keep the text colour so resampling never darkens edges.
    let mut canvas = RgbaImage::from_pixel(target.width, target.height, Rgba([color.r, color.g, color.b, 0]));

    let shaped = spec.font.shape(&spec.text, spec.font_size as f32)?;
    let Some(bounds) = shaped.ink_bounds() else {
        debug!("Watermark text has no visible glyphs");
        return Ok(canvas);
    };
    let (cell_width, cell_height) = bounds.pixel_size();

    let step_x = cell_width.saturating_add(spec.spacing) as usize;
    let step_y = cell_height.saturating_add(spec.spacing) as usize;

    debug!(cell_width, cell_height, step_x, step_y, "Tiling watermark text");

    let (w, h) = (target.width as i64, target.height as i64);

    for y in (0..target.height).step_by(step_y) {
        for x in (0..target.width).step_by(step_x) {
            shaped.draw(x as f32, y as f32, |px, py, coverage| {
                if px < 0 || py < 0 || px >= w || py >= h {
                    return;
                }
                let value = (coverage.clamp(0.0, 1.0) * alpha as f32).round() as u8;
                let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                if value > pixel[3] {
                    pixel[3] = value;
                }
            });
        }
    }

    Ok(canvas)
}

/// Rotate counter-clockwise into an expanded canvas, then crop the centre.
fn rotate_and_crop(tiled: &RgbaImage, degrees: f32, target: CanvasSize) -> RgbaImage {
    let (src_w, src_h) = tiled.dimensions();
    let (rot_w, rot_h) = rotated_bounds(src_w, src_h, degrees);

    let background = {
        let p = tiled.get_pixel(0, 0);
        Rgba([p[0], p[1], p[2], 0])
    };

    // Projection::rotate turns clockwise in image space; negate for counter-clockwise.
    let projection = Projection::translate(rot_w as f32 / 2.0, rot_h as f32 / 2.0)
        * Projection::rotate(-degrees.to_radians())
        * Projection::translate(-(src_w as f32) / 2.0, -(src_h as f32) / 2.0);

    let mut rotated = RgbaImage::from_pixel(rot_w, rot_h, background);
    warp_into(tiled, &projection, Interpolation::Nearest, background, &mut rotated);

    let (left, top, right, bottom) = centered_crop(rot_w, rot_h, target);
    let cropped = image::imageops::crop_imm(&rotated, left, top, right - left, bottom - top).to_image();

    debug!(rot_w, rot_h, left, top, right, bottom, "Cropped rotated tile");

    if cropped.dimensions() == (target.width, target.height) {
        return cropped;
    }

    warn!(
        crop_width = cropped.width(),
        crop_height = cropped.height(),
        width = target.width,
        height = target.height,
        "Rotated tile smaller than page, resampling to fit"
    );
    image::imageops::resize(&cropped, target.width, target.height, FilterType::Lanczos3)
}
