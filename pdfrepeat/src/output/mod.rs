//! User-facing output for pdfrepeat runs.
//!
//! Diagnostics go through `tracing`; this module prints what a person
//! running the tool wants to read: the plan, per-worker results and the
//! final document.

pub mod formatter;

pub use formatter::{OutputFormatter, Verbosity};

use crate::pipeline::{Plan, RunSummary};

/// Display the plan: placement, remainder handling and one row per worker.
pub fn display_plan(formatter: &OutputFormatter, plan: &Plan) {
    formatter.info(&format!(
        "Repeating {} on {} page(s) across {} worker(s)",
        plan.image.display(),
        plan.expected_pages(),
        plan.partition.workers()
    ));
    formatter.detail("Page size", &plan.page_size.to_string());
    formatter.detail(
        "Image size",
        &format!("{} x {}", plan.image_size.width, plan.image_size.height),
    );
    formatter.detail(
        "Placement",
        &format!(
            "{:.3} x {:.3} at ({:.3}, {:.3}), scale {:.5}",
            plan.placement.width,
            plan.placement.height,
            plan.placement.x,
            plan.placement.y,
            plan.placement.scale
        ),
    );

    for (range, path) in plan.partition.ranges.iter().zip(&plan.partial_paths) {
        let span = range.to_string();
        let count = format!("{} page(s)", range.len());
        let path = path.display().to_string();
        formatter.table_row(&[span.as_str(), count.as_str(), path.as_str()]);
    }

    if plan.partition.dropped > 0 {
        formatter.warning(&format!(
            "Warning: {} of {} requested page(s) are not assigned to any worker and will be missing",
            plan.partition.dropped, plan.partition.requested
        ));
    }
}

/// Display the outcome of a run.
pub fn display_summary(formatter: &OutputFormatter, summary: &RunSummary) {
    for worker in &summary.workers {
        match (&worker.error, worker.page_count) {
            (Some(err), _) => {
                formatter.warning(&format!("Warning: worker {} failed: {err}", worker.worker))
            }
            (None, Some(pages)) => formatter.debug(&format!(
                "worker {} wrote {pages} page(s) to {}",
                worker.worker,
                worker.path.display()
            )),
            (None, None) => {}
        }
    }

    let failed = summary.failed_workers();
    if !failed.is_empty() {
        formatter.warning(&format!(
            "Warning: {} of {} worker(s) failed",
            failed.len(),
            summary.workers.len()
        ));
    }

    if summary.dry_run {
        formatter.success("Dry run completed successfully");
        formatter.info(&format!("  Output would be: {}", summary.plan.output.display()));
        return;
    }

    if let Some(doc) = &summary.final_document {
        let dropped = match summary.dropped_pages() {
            0 => String::new(),
            n => format!(", {n} dropped"),
        };
        formatter.success(&format!(
            "Final PDF created successfully: {} ({} page(s){dropped})",
            doc.path.display(),
            summary.final_pages()
        ));
    }

    if summary.partials_removed {
        formatter.debug("Partial documents removed");
    }
}
