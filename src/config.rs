//! Runtime configuration and parameter defaults
//!
//! The font path is resolved once when the process starts and checked for
//! existence only when an action actually needs glyphs.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::tile::GlyphSource;

/// Font used when no `--font` override is given, relative to the working directory.
pub const DEFAULT_FONT_PATH: &str = "NotoSansTC-VariableFont_wght.ttf";

pub const DEFAULT_TEXT: &str = "Confidential - internal use only";
pub const DEFAULT_FONT_SIZE: u32 = 25;
pub const DEFAULT_OPACITY: f32 = 0.3;
pub const DEFAULT_ANGLE: u32 = 30;
pub const DEFAULT_SPACING: u32 = 100;
pub const DEFAULT_COLOR: &str = "128,128,128";

/// Ranges offered by the command-line front end.
pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 10..=50;
pub const OPACITY_RANGE: RangeInclusive<f32> = 0.1..=1.0;
pub const ANGLE_RANGE: RangeInclusive<u32> = 0..=90;
pub const SPACING_RANGE: RangeInclusive<u32> = 50..=200;

/// Location of the glyph source used for watermark text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontConfig {
    path: PathBuf,
}

impl FontConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configured font.
    ///
    /// Returns [`Error::MissingResource`] when the file does not exist.
    pub fn load(&self) -> Result<Arc<GlyphSource>> {
        if !self.path.is_file() {
            return Err(Error::MissingResource(self.path.clone()));
        }
        let data = std::fs::read(&self.path)?;
        GlyphSource::from_bytes(data).map(Arc::new)
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_PATH)
    }
}
