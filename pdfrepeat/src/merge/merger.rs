//! Concatenating partial documents into the final document.
//!
//! Partials are appended in the order given, which the coordinator makes
//! worker order. Each partial's objects are renumbered past the highest id
//! already in the merged document, its pages are re-parented under the
//! merged page tree and its own Catalog and Pages root are discarded.

use lopdf::{Document, Object, ObjectId};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::Metadata;
use crate::error::{RepeatError, Result};
use crate::io::{LoadedPdf, PdfReader, PdfWriter};
use crate::merge::metadata::MetadataManager;

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of partial documents merged.
    pub partials_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Total time taken for the merge, loading included.
    pub merge_time: Duration,

    /// Time taken to load all partials.
    pub load_time: Duration,

    /// Total size of the partial files.
    pub input_size: u64,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        crate::utils::format_file_size(self.input_size)
    }
}

/// Result of a merge operation.
pub struct MergeResult {
    /// The merged document, not yet written.
    pub document: Document,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// The final document as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalDocument {
    /// Where it was written.
    pub path: PathBuf,
    /// Pages it contains.
    pub page_count: usize,
}

/// Concatenates partial documents.
#[derive(Debug, Default)]
pub struct Merger {
    reader: PdfReader,
    metadata_manager: MetadataManager,
    metadata: Metadata,
}

impl Merger {
    /// Create a merger that adds no title or author.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a merger that stamps `metadata` on the merged document.
    pub fn with_metadata(metadata: Metadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    /// Load `paths` in order and concatenate their pages. Runs on the
    /// calling thread.
    ///
    /// # Errors
    ///
    /// - [`RepeatError::NoPartialsToMerge`] if `paths` is empty.
    /// - [`RepeatError::PartialLoadFailed`] if a partial is missing or
    ///   unreadable.
    /// - [`RepeatError::MergeFailed`] if a partial's page tree is broken.
    pub fn merge(&self, paths: &[PathBuf]) -> Result<MergeResult> {
        if paths.is_empty() {
            return Err(RepeatError::NoPartialsToMerge);
        }

        let merge_start = Instant::now();

        let load_start = Instant::now();
        let loaded = self.reader.load_all(paths)?;
        let load_time = load_start.elapsed();

        let input_size = loaded.iter().map(|p| p.file_size).sum();
        let document = self.merge_documents(loaded)?;

        let statistics = MergeStatistics {
            partials_merged: paths.len(),
            total_pages: document.get_pages().len(),
            merge_time: merge_start.elapsed(),
            load_time,
            input_size,
        };

        info!(
            partials = statistics.partials_merged,
            pages = statistics.total_pages,
            input = %statistics.format_input_size(),
            load_ms = statistics.load_time.as_millis() as u64,
            merge_ms = statistics.merge_time.as_millis() as u64,
            "partials merged"
        );

        Ok(MergeResult {
            document,
            statistics,
        })
    }

    /// Merge `paths` and write the result to `output` with `writer`.
    ///
    /// A failure to write the final document is reported as
    /// [`RepeatError::MergeFailed`]: there is no partial success state for
    /// the final artifact.
    pub fn merge_to_file(
        &self,
        paths: &[PathBuf],
        output: &Path,
        writer: &PdfWriter,
    ) -> Result<(FinalDocument, MergeStatistics)> {
        let MergeResult {
            mut document,
            statistics,
        } = self.merge(paths)?;

        let stats = writer.write_blocking(&mut document, output).map_err(|e| {
            RepeatError::merge_failed(format!(
                "could not write {}: {e}",
                output.display()
            ))
        })?;

        debug!(
            path = %output.display(),
            size = %stats.format_file_size(),
            "final document written"
        );

        Ok((
            FinalDocument {
                path: output.to_path_buf(),
                page_count: statistics.total_pages,
            },
            statistics,
        ))
    }

    fn merge_documents(&self, loaded: Vec<LoadedPdf>) -> Result<Document> {
        let (mut merged, pages_id) = crate::utils::empty_document();
        let mut kids = Vec::new();

        for partial in loaded {
            let LoadedPdf {
                mut document, path, ..
            } = partial;

            document.renumber_objects_with(merged.max_id + 1);

            let (catalog_id, root_pages_id) = page_tree_roots(&document).map_err(|e| {
                RepeatError::merge_failed(format!("{}: {e}", path.display()))
            })?;

            let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
            for &page_id in &page_ids {
                if let Ok(page) = document
                    .get_object_mut(page_id)
                    .and_then(Object::as_dict_mut)
                {
                    page.set("Parent", pages_id);
                }
            }

            document.objects.remove(&catalog_id);
            document.objects.remove(&root_pages_id);

            debug!(path = %path.display(), pages = page_ids.len(), "appending partial");

            merged.max_id = merged.max_id.max(document.max_id);
            merged.objects.extend(document.objects);
            kids.extend(page_ids.into_iter().map(Object::Reference));
        }

        self.add_pages_to_tree(&mut merged, pages_id, kids)?;
        self.metadata_manager
            .set_metadata(&mut merged, &self.metadata)?;

        Ok(merged)
    }

    fn add_pages_to_tree(
        &self,
        merged: &mut Document,
        pages_id: ObjectId,
        kids: Vec<Object>,
    ) -> Result<()> {
        let Ok(Object::Dictionary(dict)) = merged.get_object_mut(pages_id) else {
            return Err(RepeatError::merge_failed(
                "Pages object is not a dictionary",
            ));
        };

        dict.set("Count", Object::Integer(kids.len() as i64));
        dict.set("Kids", Object::Array(kids));
        Ok(())
    }
}

/// Ids of a document's Catalog and the root of its page tree.
fn page_tree_roots(doc: &Document) -> lopdf::Result<(ObjectId, ObjectId)> {
    let catalog_id = doc.trailer.get(b"Root").and_then(Object::as_reference)?;
    let pages_id = doc
        .get_dictionary(catalog_id)?
        .get(b"Pages")
        .and_then(Object::as_reference)?;
    Ok((catalog_id, pages_id))
}
