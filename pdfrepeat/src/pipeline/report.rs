//! What the coordinator learns from each worker and from the whole run.

use serde::Serialize;
use std::path::PathBuf;

use crate::config::{ImageSize, PageSize, RemainderPolicy};
use crate::error::{RepeatError, Result};
use crate::layout::{PageRange, Partition, Placement};
use crate::merge::FinalDocument;
use crate::render::PartialDocument;

/// Outcome of one worker, collected at the join barrier.
#[derive(Debug)]
pub struct WorkerReport {
    /// Worker index.
    pub worker: usize,
    /// Pages the worker was asked to render.
    pub range: PageRange,
    /// Artifact path the worker owned.
    pub path: PathBuf,
    /// The partial it wrote, or why it stopped.
    pub outcome: Result<PartialDocument>,
}

impl WorkerReport {
    /// Whether the worker wrote its partial.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The failure, if the worker stopped early.
    pub fn error(&self) -> Option<&RepeatError> {
        self.outcome.as_ref().err()
    }

    /// Serializable view of the report.
    pub fn summary(&self) -> WorkerSummary {
        WorkerSummary {
            worker: self.worker,
            range: self.range,
            path: self.path.clone(),
            page_count: self.outcome.as_ref().ok().map(|p| p.page_count),
            error: self.error().map(ToString::to_string),
        }
    }
}

/// Serializable form of a [`WorkerReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerSummary {
    /// Worker index.
    pub worker: usize,
    /// Pages the worker was asked to render.
    pub range: PageRange,
    /// Artifact path.
    pub path: PathBuf,
    /// Pages written, absent when the worker failed.
    pub page_count: Option<usize>,
    /// Failure message, absent when the worker succeeded.
    pub error: Option<String>,
}

/// Everything decided before any worker starts.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    /// Source image.
    pub image: PathBuf,
    /// Nominal image size used for placement.
    pub image_size: ImageSize,
    /// Size of every page.
    pub page_size: PageSize,
    /// Where the image goes on every page.
    pub placement: Placement,
    /// Remainder handling in effect.
    pub remainder: RemainderPolicy,
    /// Page ranges in worker order.
    pub partition: Partition,
    /// Partial artifact paths in worker order.
    pub partial_paths: Vec<PathBuf>,
    /// Final document path.
    pub output: PathBuf,
}

impl Plan {
    /// Pages the final document should contain if every worker succeeds.
    pub fn expected_pages(&self) -> usize {
        self.partition.covered()
    }
}

/// Result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// The plan that was executed.
    pub plan: Plan,
    /// One entry per worker, in worker order. Empty for a dry run.
    pub workers: Vec<WorkerSummary>,
    /// The final document, absent for a dry run.
    pub final_document: Option<FinalDocument>,
    /// Whether partial artifacts were deleted after the merge.
    pub partials_removed: bool,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Requested pages that no worker was assigned.
    pub fn dropped_pages(&self) -> usize {
        self.plan.partition.dropped
    }

    /// Indices of workers that failed.
    pub fn failed_workers(&self) -> Vec<usize> {
        self.workers
            .iter()
            .filter(|w| w.error.is_some())
            .map(|w| w.worker)
            .collect()
    }

    /// Pages in the final document, zero for a dry run.
    pub fn final_pages(&self) -> usize {
        self.final_document.as_ref().map_or(0, |d| d.page_count)
    }

    /// Render the summary as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RepeatError::other(format!("Failed to serialize summary: {e}")))
    }
}
