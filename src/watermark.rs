//! Watermark parameters

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::tile::GlyphSource;

/// RGB text colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    /// Accepts `r,g,b` (decimal channels) or `#rgb` / `#rrggbb`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(Error::InvalidParameter(format!("Invalid hex colour: #{}", hex)));
            }
            let digit = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16)
                    .map_err(|_| Error::InvalidParameter(format!("Invalid hex colour: #{}", hex)))
            };
            return match hex.len() {
                3 => Ok(Rgb::new(digit(0..1)? * 17, digit(1..2)? * 17, digit(2..3)? * 17)),
                6 => Ok(Rgb::new(digit(0..2)?, digit(2..4)?, digit(4..6)?)),
                _ => Err(Error::InvalidParameter(format!(
                    "Colour must be #rgb or #rrggbb, got {} hex digits",
                    hex.len()
                ))),
            };
        }

        let channels: Vec<&str> = s.split(',').map(str::trim).collect();
        if channels.len() != 3 {
            return Err(Error::InvalidParameter(format!(
                "Colour must have three channels (r,g,b), got '{}'",
                s
            )));
        }

        let mut rgb = [0u8; 3];
        for (slot, channel) in rgb.iter_mut().zip(&channels) {
            *slot = channel.parse().map_err(|_| {
                Error::InvalidParameter(format!("Colour channel '{}' is not in 0-255", channel))
            })?;
        }

        Ok(Rgb::new(rgb[0], rgb[1], rgb[2]))
    }
}

/// Everything needed to render one watermark tile
///
/// All fields are required; the library never fills in defaults.
#[derive(Clone)]
pub struct WatermarkSpec {
    /// Text repeated across the page (may be empty or non-ASCII)
    pub text: String,
    /// Glyph source used to shape and draw the text
    pub font: Arc<GlyphSource>,
    /// Font size in pixels per em
    pub font_size: u32,
    /// Text colour
    pub color: Rgb,
    /// Opacity between 0.0 and 1.0
    pub opacity: f32,
    /// Counter-clockwise rotation in degrees, 0 to 90
    pub rotation: u32,
    /// Gap between tiles in pixels, on both axes
    pub spacing: u32,
}

impl fmt::Debug for WatermarkSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatermarkSpec")
            .field("text", &self.text)
            .field("font_size", &self.font_size)
            .field("color", &self.color)
            .field("opacity", &self.opacity)
            .field("rotation", &self.rotation)
            .field("spacing", &self.spacing)
            .finish_non_exhaustive()
    }
}

impl WatermarkSpec {
    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        if self.font_size == 0 {
            return Err(Error::InvalidParameter("Font size must be positive".to_string()));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(Error::InvalidParameter(format!(
                "Opacity must be between 0 and 1, got {}",
                self.opacity
            )));
        }
        if self.rotation > 90 {
            return Err(Error::InvalidParameter(format!(
                "Rotation must be between 0 and 90 degrees, got {}",
                self.rotation
            )));
        }
        if self.spacing == 0 {
            return Err(Error::InvalidParameter("Tile spacing must be positive".to_string()));
        }
        Ok(())
    }

    /// Alpha written for fully covered pixels.
    pub fn alpha(&self) -> u8 {
        (255.0 * self.opacity).round() as u8
    }
}
