//! PDF Watermark Library
//!
//! A cross-platform library for stamping a tiled text watermark onto PDFs.
//! This library provides functionality to:
//! - Render a transparent tile with watermark text repeated on a grid
//! - Rotate the grid and crop it back to page size
//! - Overlay the tile onto every page of a PDF
//! - Inspect page geometry (page counts, media boxes)
//!
//! # Example
//!
//! ```no_run
//! use pdf_watermark::config::FontConfig;
//! use pdf_watermark::pdf::stamp_document;
//! use pdf_watermark::watermark::{Rgb, WatermarkSpec};
//!
//! let spec = WatermarkSpec {
//!     text: "CONFIDENTIAL".to_string(),
//!     font: FontConfig::default().load().expect("font"),
//!     font_size: 25,
//!     color: Rgb::new(128, 128, 128),
//!     opacity: 0.3,
//!     rotation: 30,
//!     spacing: 100,
//! };
//!
//! let source = std::fs::read("input.pdf").expect("read input");
//! let stamped = stamp_document(&source, &spec).expect("Failed to stamp PDF");
//! std::fs::write("watermarked_input.pdf", stamped).expect("write output");
//! ```

pub mod canvas;
pub mod config;
pub mod error;
pub mod pdf;
pub mod tile;
pub mod watermark;

// Re-export commonly used items
pub use error::{Error, Result};
pub use watermark::{Rgb, WatermarkSpec};
