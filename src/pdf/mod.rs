//! PDF manipulation module

pub mod geometry;
pub mod resources;
pub mod stamp;

// Re-export commonly used items
pub use geometry::{document_info, load_document, page_media_box, DocumentInfo, MediaBox};
pub use stamp::{preview_tile, stamp_document, watermarked_file_name};
