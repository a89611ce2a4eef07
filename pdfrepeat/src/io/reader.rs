//! Loading partial documents back from disk.
//!
//! Partials are read in worker order right before they are merged. A
//! zero-page partial is valid (a worker may own an empty range), so unlike
//! a general-purpose reader this one does not insist on pages.

use lopdf::Document;
use std::path::{Path, PathBuf};

use crate::error::{RepeatError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// File size in bytes.
    pub file_size: u64,
}

/// Reader for partial PDF documents.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document on the current thread.
    ///
    /// # Errors
    ///
    /// Returns [`RepeatError::PartialLoadFailed`] if the file is missing or
    /// is not a readable PDF.
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        if !path.is_file() {
            return Err(RepeatError::partial_load_failed(
                path.to_path_buf(),
                "file does not exist",
            ));
        }

        let document = Document::load(path)
            .map_err(|e| RepeatError::partial_load_failed(path.to_path_buf(), e.to_string()))?;

        let page_count = document.get_pages().len();
        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(LoadedPdf {
            document,
            path: path.to_path_buf(),
            page_count,
            file_size,
        })
    }

    /// Load every path in order, stopping at the first failure.
    pub fn load_all(&self, paths: &[PathBuf]) -> Result<Vec<LoadedPdf>> {
        paths.iter().map(|path| self.load(path)).collect()
    }
}
