//! Canvas geometry for watermark tiles
//!
//! Pure arithmetic shared by the tile generator and the page compositor:
//! converting page boxes to pixel canvases, sizing a rotated canvas, and
//! picking the centred crop window that brings it back to page size.

use crate::error::{Error, Result};

/// Largest page side PDF allows, in default user space units.
pub const MAX_SIDE: u32 = 14_400;

/// Upper bound on tile pixels; the rotated working canvas can be about twice this.
pub const MAX_PIXELS: u64 = 64 * 1024 * 1024;

/// Pixel dimensions of a watermark tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Canvas of `width` x `height`, refused when it exceeds the page or pixel limits.
    pub fn checked(width: u32, height: u32) -> Result<Self> {
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(Error::Processing(format!(
                "Page size {}x{} exceeds the PDF limit of {} units per side",
                width, height, MAX_SIDE
            )));
        }
        let within_budget = u64::from(width)
            .checked_mul(u64::from(height))
            .is_some_and(|pixels| pixels <= MAX_PIXELS);
        if !within_budget {
            return Err(Error::Processing(format!(
                "Page size {}x{} needs more than {} tile pixels",
                width, height, MAX_PIXELS
            )));
        }
        Ok(Self::new(width, height))
    }

    /// Canvas for a page box measured in points; fractional points are truncated.
    pub fn from_points(width: f32, height: f32) -> Result<Self> {
        if !width.is_finite() || !height.is_finite() || width < 1.0 || height < 1.0 {
            return Err(Error::Processing(format!(
                "Page box {}x{} is too small for a watermark",
                width, height
            )));
        }
        // Checked before the cast, which would otherwise saturate.
        if width >= (MAX_SIDE + 1) as f32 || height >= (MAX_SIDE + 1) as f32 {
            return Err(Error::Processing(format!(
                "Page box {}x{} exceeds the PDF limit of {} units per side",
                width, height, MAX_SIDE
            )));
        }
        Self::checked(width as u32, height as u32)
    }
}

/// Size of the canvas needed to hold a `width` x `height` image rotated by
/// `degrees` without clipping any corner.
pub fn rotated_bounds(width: u32, height: u32, degrees: f32) -> (u32, u32) {
    let radians = degrees.to_radians();
    let cos = radians.cos().abs();
    let sin = radians.sin().abs();

    let w = width as f32;
    let h = height as f32;

    // Trim float noise so 90 degrees on 612x792 yields exactly 792x612.
    let expand = |v: f32| ((v - 1e-3).ceil().max(1.0)) as u32;

    (expand(w * cos + h * sin), expand(w * sin + h * cos))
}

/// Crop window `(left, top, right, bottom)` of size `target` centred in a
/// `source_width` x `source_height` image, clamped to the image bounds.
pub fn centered_crop(source_width: u32, source_height: u32, target: CanvasSize) -> (u32, u32, u32, u32) {
    let sw = source_width as i64;
    let sh = source_height as i64;
    let tw = target.width as i64;
    let th = target.height as i64;

    let left = (sw - tw).div_euclid(2);
    let top = (sh - th).div_euclid(2);
    let right = left + tw;
    let bottom = top + th;

    let clamp_x = |v: i64| v.clamp(0, sw) as u32;
    let clamp_y = |v: i64| v.clamp(0, sh) as u32;

    (clamp_x(left), clamp_y(top), clamp_x(right), clamp_y(bottom))
}
