//! The per-worker partial document build.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::page::PageCanvas;
use super::xobject::ImageEmbedder;
use crate::config::PageSize;
use crate::error::{RepeatError, Result};
use crate::io::PdfWriter;
use crate::layout::{PageRange, Placement};

/// What one worker has to produce.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Worker index, also the position of the partial in the final document.
    pub worker: usize,
    /// Global page indices this worker renders.
    pub range: PageRange,
    /// Where the image goes on every page.
    pub placement: Placement,
    /// Size of every page.
    pub page_size: PageSize,
    /// Artifact path owned by this worker.
    pub path: PathBuf,
}

/// A partial document written by one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialDocument {
    /// Worker index that produced it.
    pub id: usize,
    /// Where it was written.
    pub path: PathBuf,
    /// Pages it contains.
    pub page_count: usize,
}

/// Builds partial documents from a shared image.
///
/// Cloning is cheap; every worker gets its own clone.
#[derive(Clone)]
pub struct PartialBuilder {
    embedder: Arc<dyn ImageEmbedder>,
    writer: PdfWriter,
}

impl std::fmt::Debug for PartialBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartialBuilder")
            .field("writer", &self.writer)
            .finish_non_exhaustive()
    }
}

impl PartialBuilder {
    /// Create a builder that embeds through `embedder` and saves with `writer`.
    pub fn new(embedder: Arc<dyn ImageEmbedder>, writer: PdfWriter) -> Self {
        Self { embedder, writer }
    }

    /// Render `request.range` into a new document and write it to
    /// `request.path`. Runs on the calling thread.
    ///
    /// # Errors
    ///
    /// - [`RepeatError::EmbedFailed`] if the image cannot be placed on a
    ///   page. Remaining pages are skipped and nothing is written.
    /// - [`RepeatError::PartialWriteFailed`] if the document cannot be
    ///   saved. The artifact may be missing or incomplete.
    pub fn build(&self, request: &BuildRequest) -> Result<PartialDocument> {
        let BuildRequest {
            worker,
            range,
            placement,
            page_size,
            path,
        } = request;

        info!(worker, range = %range, path = %path.display(), "building partial");

        let mut canvas = PageCanvas::new(*page_size);
        let mut xobject = None;

        for page in range.indices() {
            let embedded = self
                .embedder
                .embed(canvas.document_mut(), page, xobject)
                .map_err(|e| {
                    let err = RepeatError::embed_failed(path.clone(), page, e.to_string());
                    error!(worker, page, "{err}");
                    err
                })?;
            xobject = Some(embedded);

            let page_id = canvas.add_page();
            canvas
                .draw_image(page_id, embedded, placement)
                .map_err(|e| RepeatError::embed_failed(path.clone(), page, e.to_string()))?;
        }

        let page_count = canvas.page_count();
        let mut doc = canvas.finish();

        let stats = self.writer.write_blocking(&mut doc, path).map_err(|e| {
            let err = match e {
                RepeatError::FailedToCreateOutput { source, .. }
                | RepeatError::FailedToWrite { source, .. } => RepeatError::PartialWriteFailed {
                    path: path.clone(),
                    source,
                },
                other => other,
            };
            error!(worker, "{err}");
            err
        })?;

        debug!(
            worker,
            pages = page_count,
            size = %stats.format_file_size(),
            elapsed_ms = stats.write_time.as_millis() as u64,
            "partial written"
        );

        Ok(PartialDocument {
            id: *worker,
            path: path.clone(),
            page_count,
        })
    }
}
