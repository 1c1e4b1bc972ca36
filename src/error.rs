//! Error types for the PDF watermark library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF watermark library
#[derive(Error, Debug)]
pub enum Error {
    /// A watermark parameter is out of range or malformed
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The font file could not be found
    #[error("Font file not found: {}", .0.display())]
    MissingResource(PathBuf),

    /// Input bytes are not a valid PDF with at least one page
    #[error("Could not read PDF: {0}")]
    DocumentParse(String),

    /// Failure while tiling, compositing or serializing
    #[error("Processing failed: {0}")]
    Processing(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn processing(cause: impl std::fmt::Display) -> Self {
        Error::Processing(cause.to_string())
    }

    /// Guidance shown to the user next to the error message, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            Error::MissingResource(path) => Some(format!(
                "Place the font file at {} or pass --font <PATH>",
                path.display()
            )),
            Error::DocumentParse(_) => Some("Make sure the input is a PDF with at least one page".to_string()),
            _ => None,
        }
    }
}
