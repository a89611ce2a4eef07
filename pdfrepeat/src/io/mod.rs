//! I/O operations for pdfrepeat.
//!
//! This module handles all file I/O:
//! - Decoding the source image
//! - Writing partial and final PDFs to disk
//! - Loading partial PDFs back for merging

pub mod image;
pub mod reader;
pub mod writer;

pub use image::SourceImage;
pub use reader::{LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};
