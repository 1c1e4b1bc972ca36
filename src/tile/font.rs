//! Glyph source: shaping, measuring and drawing watermark text
//!
//! Text is shaped with rustybuzz so kerning, ligatures and CJK clusters come
//! out the same way a layout engine would place them, and each shaped glyph is
//! rasterized with ab_glyph. Both parse the same font bytes.

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont};

use crate::error::{Error, Result};

/// One shaped glyph, positioned relative to the pen origin in pixels
#[derive(Debug, Clone, Copy)]
struct PlacedGlyph {
    id: GlyphId,
    x: f32,
    y: f32,
}

/// Shaped line of text at a fixed size, ready to be measured or drawn
pub struct ShapedText<'a> {
    font: &'a FontVec,
    scale: PxScale,
    ascent: f32,
    glyphs: Vec<PlacedGlyph>,
}

/// Ink bounding box of a shaped line, relative to the ascender line at the
/// pen origin. `min_x` is usually a small side bearing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InkBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl InkBounds {
    /// Whole-pixel width and height of the ink box.
    pub fn pixel_size(&self) -> (u32, u32) {
        let w = (self.max_x.ceil() - self.min_x.floor()).max(0.0);
        let h = (self.max_y.ceil() - self.min_y.floor()).max(0.0);
        (w as u32, h as u32)
    }
}

/// A loaded font file
pub struct GlyphSource {
    data: Vec<u8>,
    font: FontVec,
}

impl GlyphSource {
    /// Parse TrueType/OpenType bytes (face index 0).
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if rustybuzz::Face::from_slice(&data, 0).is_none() {
            return Err(Error::InvalidParameter("Font file is not a usable TrueType/OpenType font".to_string()));
        }
        let font = FontVec::try_from_vec(data.clone())
            .map_err(|e| Error::InvalidParameter(format!("Font file could not be parsed: {}", e)))?;
        Ok(Self { data, font })
    }

    /// Scale that gives `font_size` pixels per em.
    fn scale(&self, font_size: f32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(font_size * self.font.height_unscaled() / units_per_em)
    }

    /// Shape `text` at `font_size` pixels per em.
    pub fn shape(&self, text: &str, font_size: f32) -> Result<ShapedText<'_>> {
        let face = rustybuzz::Face::from_slice(&self.data, 0)
            .ok_or_else(|| Error::processing("font face could not be reopened for shaping"))?;

        let scale = self.scale(font_size);
        let ascent = self.font.as_scaled(scale).ascent();
        let units_to_px = font_size / face.units_per_em() as f32;

        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();
        let shaped = rustybuzz::shape(&face, &[], buffer);

        let mut pen_x = 0.0f32;
        let mut pen_y = 0.0f32;
        let mut glyphs = Vec::with_capacity(shaped.len());

        for (info, pos) in shaped.glyph_infos().iter().zip(shaped.glyph_positions()) {
            glyphs.push(PlacedGlyph {
                id: GlyphId(info.glyph_id as u16),
                x: pen_x + pos.x_offset as f32 * units_to_px,
                y: pen_y - pos.y_offset as f32 * units_to_px,
            });
            pen_x += pos.x_advance as f32 * units_to_px;
            pen_y -= pos.y_advance as f32 * units_to_px;
        }

        Ok(ShapedText { font: &self.font, scale, ascent, glyphs })
    }
}

impl<'a> ShapedText<'a> {
    /// Union of the glyph ink boxes, or `None` when nothing would be drawn.
    pub fn ink_bounds(&self) -> Option<InkBounds> {
        let mut bounds: Option<InkBounds> = None;

        for glyph in &self.glyphs {
            let outlined = match self.font.outline_glyph(self.positioned(glyph, 0.0, 0.0)) {
                Some(outlined) => outlined,
                None => continue,
            };
            let rect = outlined.px_bounds();
            bounds = Some(match bounds {
                None => InkBounds { min_x: rect.min.x, min_y: rect.min.y, max_x: rect.max.x, max_y: rect.max.y },
                Some(b) => InkBounds {
                    min_x: b.min_x.min(rect.min.x),
                    min_y: b.min_y.min(rect.min.y),
                    max_x: b.max_x.max(rect.max.x),
                    max_y: b.max_y.max(rect.max.y),
                },
            });
        }

        bounds
    }

    /// Rasterize the text with its ascender line at `(x, y)`.
    ///
    /// `plot` receives integer pixel coordinates and a coverage in `0..=1`;
    /// coordinates may fall outside the caller's canvas.
    pub fn draw<F>(&self, x: f32, y: f32, mut plot: F)
    where
        F: FnMut(i64, i64, f32),
    {
        for glyph in &self.glyphs {
            if let Some(outlined) = self.font.outline_glyph(self.positioned(glyph, x, y)) {
                let rect = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    plot(rect.min.x as i64 + px as i64, rect.min.y as i64 + py as i64, coverage);
                });
            }
        }
    }

    fn positioned(&self, glyph: &PlacedGlyph, x: f32, y: f32) -> ab_glyph::Glyph {
        glyph
            .id
            .with_scale_and_position(self.scale, ab_glyph::point(x + glyph.x, y + self.ascent + glyph.y))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::system_font;
    use super::*;

    #[test]
    fn test_rejects_non_font_bytes() {
        let result = GlyphSource::from_bytes(b"definitely not a font".to_vec());
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_empty_text_has_no_ink() {
        let Some(font) = system_font() else { return };
        let shaped = font.shape("", 25.0).unwrap();
        assert!(shaped.ink_bounds().is_none());
    }

    #[test]
    fn test_longer_text_measures_wider() {
        let Some(font) = system_font() else { return };
        let short = font.shape("CONF", 25.0).unwrap().ink_bounds().unwrap();
        let long = font.shape("CONFIDENTIAL", 25.0).unwrap().ink_bounds().unwrap();
        assert!(long.pixel_size().0 > short.pixel_size().0);
    }

    #[test]
    fn test_ink_height_tracks_font_size() {
        let Some(font) = system_font() else { return };
        let (_, small) = font.shape("H", 10.0).unwrap().ink_bounds().unwrap().pixel_size();
        let (_, large) = font.shape("H", 50.0).unwrap().ink_bounds().unwrap().pixel_size();
        assert!(large > small * 3);
        // Capital H sits below the ascender line
        let bounds = font.shape("H", 50.0).unwrap().ink_bounds().unwrap();
        assert!(bounds.min_y >= 0.0);
    }

    #[test]
    fn test_draw_stays_inside_ink_bounds() {
        let Some(font) = system_font() else { return };
        let shaped = font.shape("Wm", 30.0).unwrap();
        let bounds = shaped.ink_bounds().unwrap();
        let mut hits = 0;
        shaped.draw(0.0, 0.0, |x, y, coverage| {
            if coverage > 0.0 {
                hits += 1;
                assert!(x as f32 >= bounds.min_x.floor() && (x as f32) < bounds.max_x.ceil());
                assert!(y as f32 >= bounds.min_y.floor() && (y as f32) < bounds.max_y.ceil());
            }
        });
        assert!(hits > 0);
    }
}
