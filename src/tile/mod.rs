//! Watermark tile rasterization

pub mod font;
pub mod render;

pub use font::{GlyphSource, InkBounds, ShapedText};
pub use render::{encode_png, generate_tile, render_tile};
