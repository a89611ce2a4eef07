//! Drives one run: plan, launch workers, wait for all of them, merge.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::task;
use tracing::{debug, error, info, warn};

use super::report::{Plan, RunSummary, WorkerReport};
use crate::config::{Config, OverwriteMode, WorkerFailurePolicy};
use crate::error::{RepeatError, Result};
use crate::io::{PdfWriter, SourceImage, WriteOptions};
use crate::layout::{partition, place_image};
use crate::merge::Merger;
use crate::render::{BuildRequest, ImageEmbedder, PartialBuilder, XObjectEmbedder};

/// Runs the pipeline for one [`Config`].
pub struct Coordinator {
    config: Config,
    embedder: Option<Arc<dyn ImageEmbedder>>,
}

impl Coordinator {
    /// Create a coordinator that embeds the decoded image as an XObject.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            embedder: None,
        }
    }

    /// Replace the image embedder used by every worker.
    pub fn with_embedder(mut self, embedder: Arc<dyn ImageEmbedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Validate the configuration, decode the image and work out the
    /// placement and partition. Writes nothing.
    pub async fn plan(&self) -> Result<Plan> {
        Ok(self.prepare().await?.0)
    }

    /// Execute the whole pipeline.
    ///
    /// # Errors
    ///
    /// Usage and image errors are returned before any worker starts.
    /// Under [`WorkerFailurePolicy::Strict`] a failed worker aborts the run
    /// with [`RepeatError::WorkersFailed`]; otherwise failures are logged and
    /// the merge decides the outcome. Merge failures are fatal.
    pub async fn run(&self) -> Result<RunSummary> {
        let config = &self.config;
        let (plan, image) = self.prepare().await?;

        if config.dry_run {
            info!("dry run, nothing written");
            return Ok(RunSummary {
                plan,
                workers: Vec::new(),
                final_document: None,
                partials_removed: false,
                dry_run: true,
            });
        }

        let writer = PdfWriter::new();
        for path in &plan.partial_paths {
            writer.remove_if_exists(path).await?;
        }

        let reports = self.run_workers(&plan, image).await;

        let failed: Vec<usize> = reports
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| r.worker)
            .collect();

        for report in &reports {
            match report.error() {
                Some(err) if err.is_worker_local() => {
                    warn!(worker = report.worker, range = %report.range, "worker failed: {err}");
                }
                Some(err) => {
                    error!(worker = report.worker, range = %report.range, "worker aborted: {err}");
                }
                None => {}
            }
        }

        if !failed.is_empty() && config.failure_policy == WorkerFailurePolicy::Strict {
            return Err(RepeatError::WorkersFailed { failed });
        }

        let merger = Merger::with_metadata(config.metadata.clone());
        let final_writer = PdfWriter::with_options(WriteOptions::from(config.compression));
        let paths = plan.partial_paths.clone();
        let output = config.output.clone();

        info!(partials = paths.len(), output = %output.display(), "merging");
        let (final_document, _stats) =
            task::spawn_blocking(move || merger.merge_to_file(&paths, &output, &final_writer))
                .await
                .map_err(|e| RepeatError::merge_failed(format!("merge task failed: {e}")))??;

        let partials_removed = !config.keep_partials;
        if partials_removed {
            for path in &plan.partial_paths {
                writer.remove_if_exists(path).await?;
            }
            debug!("partials removed");
        }

        info!(
            path = %final_document.path.display(),
            pages = final_document.page_count,
            "final document written"
        );

        Ok(RunSummary {
            plan,
            workers: reports.iter().map(WorkerReport::summary).collect(),
            final_document: Some(final_document),
            partials_removed,
            dry_run: false,
        })
    }

    async fn prepare(&self) -> Result<(Plan, Arc<SourceImage>)> {
        let config = &self.config;
        config.validate()?;

        if !config.dry_run {
            self.check_output().await?;
        }

        let image_path = config.image.clone();
        let image = task::spawn_blocking(move || SourceImage::open(&image_path))
            .await
            .map_err(|e| RepeatError::other(format!("Image decode task failed: {e}")))??;
        let image = Arc::new(image);

        let image_size = config.image_size.unwrap_or_else(|| image.nominal_size());
        let placement = place_image(config.page_size, image_size);
        let partition = partition(config.repetitions, config.workers, config.remainder)?;

        if partition.dropped > 0 {
            warn!(
                requested = partition.requested,
                workers = partition.workers(),
                dropped = partition.dropped,
                "repetitions do not divide evenly across workers; trailing pages are dropped"
            );
        }

        debug!(
            scale = placement.scale,
            x = placement.x,
            y = placement.y,
            "placement computed"
        );

        let plan = Plan {
            image: config.image.clone(),
            image_size,
            page_size: config.page_size,
            placement,
            remainder: config.remainder,
            partition,
            partial_paths: config.partial_paths(),
            output: config.output.clone(),
        };

        Ok((plan, image))
    }

    async fn check_output(&self) -> Result<()> {
        let config = &self.config;
        let writer = PdfWriter::new();

        if config.overwrite_mode == OverwriteMode::NoClobber && writer.exists(&config.output).await
        {
            return Err(RepeatError::output_exists(config.output.clone()));
        }

        writer.can_write(&config.output).await?;
        writer.can_write(&config.partial_path(0)).await
    }

    /// Launch one blocking task per range and wait for every one of them.
    async fn run_workers(&self, plan: &Plan, image: Arc<SourceImage>) -> Vec<WorkerReport> {
        let embedder = self
            .embedder
            .clone()
            .unwrap_or_else(|| Arc::new(XObjectEmbedder::new(image)));
        let builder = PartialBuilder::new(embedder, PdfWriter::new());

        let requests: Vec<BuildRequest> = plan
            .partition
            .ranges
            .iter()
            .zip(&plan.partial_paths)
            .enumerate()
            .map(|(worker, (range, path))| BuildRequest {
                worker,
                range: *range,
                placement: plan.placement,
                page_size: plan.page_size,
                path: path.clone(),
            })
            .collect();

        info!(workers = requests.len(), "launching workers");

        let concurrency = requests.len().max(1);
        let tasks = requests.into_iter().map(|request| {
            let builder = builder.clone();
            async move {
                let handle = {
                    let request = request.clone();
                    task::spawn_blocking(move || builder.build(&request))
                };
                let outcome = handle.await.unwrap_or_else(|e| {
                    Err(RepeatError::other(format!(
                        "worker {} did not finish: {e}",
                        request.worker
                    )))
                });
                WorkerReport {
                    worker: request.worker,
                    range: request.range,
                    path: request.path,
                    outcome,
                }
            }
        });

        // Every range runs at once; the barrier is the end of the stream.
        let mut reports: Vec<WorkerReport> = stream::iter(tasks)
            .buffer_unordered(concurrency)
            .collect()
            .await;

        reports.sort_by_key(|report| report.worker);
        reports
    }
}

/// Run the pipeline for `config` with the default image embedder.
pub async fn run(config: Config) -> Result<RunSummary> {
    Coordinator::new(config).run().await
}
