//! PDF writing and saving operations.
//!
//! This module provides PDF serialization with:
//! - Atomic writes (write to temp file, then rename)
//! - Optional compression and object pruning
//! - Write statistics
//!
//! Serialization is blocking. Workers and the merger call
//! [`PdfWriter::write_blocking`] from their own blocking task; only the
//! pre-flight checks are async.
//!
//! # Examples
//!
//! ```no_run
//! use pdfrepeat::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # fn example(mut doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let stats = PdfWriter::new().write_blocking(&mut doc, Path::new("output.pdf"))?;
//! println!("wrote {}", stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::CompressionLevel;
use crate::error::{RepeatError, Result};

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Compress streams before writing.
    pub compress: bool,

    /// Drop unreferenced objects before writing.
    pub prune: bool,

    /// Renumber objects before writing.
    pub renumber: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            prune: false,
            renumber: true,
            buffer_size: 8192,
        }
    }
}

impl From<CompressionLevel> for WriteOptions {
    fn from(level: CompressionLevel) -> Self {
        Self {
            compress: level != CompressionLevel::None,
            prune: level == CompressionLevel::Maximum,
            ..Default::default()
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Whether compression was applied.
    pub compressed: bool,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        crate::utils::format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Serialize `doc` to `path` on the current thread.
    ///
    /// # Errors
    ///
    /// Returns [`RepeatError::FailedToCreateOutput`] if the file cannot be
    /// created and [`RepeatError::FailedToWrite`] if serialization, flushing
    /// or the final rename fails.
    pub fn write_blocking(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();
        let options = &self.options;

        if options.prune {
            doc.prune_objects();
        }

        if options.compress {
            doc.compress();
        }

        if options.renumber {
            doc.renumber_objects();
        }

        let write_path = if options.atomic {
            path.with_extension("tmp")
        } else {
            path.to_path_buf()
        };

        let file =
            std::fs::File::create(&write_path).map_err(|e| RepeatError::FailedToCreateOutput {
                path: write_path.clone(),
                source: e,
            })?;

        let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, file);

        doc.save_to(&mut writer)
            .map_err(|e| RepeatError::FailedToWrite {
                path: write_path.clone(),
                source: std::io::Error::other(e),
            })?;

        writer.flush().map_err(|e| RepeatError::FailedToWrite {
            path: write_path.clone(),
            source: e,
        })?;

        drop(writer);

        if options.atomic {
            std::fs::rename(&write_path, path).map_err(|e| RepeatError::FailedToWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path: path.to_path_buf(),
            compressed: options.compress,
        })
    }

    /// Check if a file can be written to the given path.
    ///
    /// Performs pre-flight checks without actually writing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory doesn't exist
    /// - Parent directory is not writable
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => return Ok(()),
        };

        let metadata = tokio::fs::metadata(parent).await.map_err(|_| {
            RepeatError::invalid_config(format!(
                "Output directory does not exist: {}",
                parent.display()
            ))
        })?;

        if !metadata.is_dir() {
            return Err(RepeatError::invalid_config(format!(
                "Not a directory: {}",
                parent.display()
            )));
        }

        if metadata.permissions().readonly() {
            return Err(RepeatError::invalid_config(format!(
                "Output directory is not writable: {}",
                parent.display()
            )));
        }

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    /// Safely remove a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub async fn remove_if_exists(&self, path: &Path) -> Result<()> {
        if self.exists(path).await {
            tokio::fs::remove_file(path)
                .await
                .map_err(|e| RepeatError::FailedToWrite {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }
}
