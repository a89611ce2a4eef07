//! CLI argument parsing for pdfrepeat.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use pdfrepeat::config::{
    CompressionLevel, Config, DEFAULT_WORKERS, ImageSize, Metadata, OverwriteMode, PageSize,
    RemainderPolicy, WorkerFailurePolicy,
};
use pdfrepeat::error::{RepeatError, Result};

/// Build a multi-page PDF by repeating one image.
///
/// The pages are split into one contiguous range per worker. Every worker
/// writes its range to a partial document (partial_<N>.pdf) and the
/// partials are concatenated, in worker order, into OUTPUT.
#[derive(Parser, Debug)]
#[command(name = "pdfrepeat")]
#[command(version)]
#[command(about = "Build a multi-page PDF by repeating one image", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Image to repeat on every page (PNG, JPEG, ...)
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Number of pages to create
    ///
    /// Must be a non-negative integer. With the default remainder policy,
    /// pages that don't divide evenly across workers are dropped.
    #[arg(value_name = "REPETITIONS", allow_negative_numbers = true)]
    pub repetitions: String,

    /// Output PDF file path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Number of parallel workers (one partial document each)
    #[arg(short = 'j', long, value_name = "N", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Page size: a4, a3, a5, letter, legal, or WIDTHxHEIGHT in points
    #[arg(long, value_name = "SIZE", default_value = "a4")]
    pub page_size: String,

    /// Nominal image size as WIDTHxHEIGHT
    ///
    /// Defaults to the image's pixel dimensions. Only the aspect ratio
    /// affects the placement.
    #[arg(long, value_name = "SIZE")]
    pub image_size: Option<String>,

    /// What to do with pages that don't divide evenly across workers
    ///
    /// - drop: leave them out of the final document (default)
    /// - last: give them to the last worker
    /// - reject: refuse to run
    #[arg(long, value_name = "POLICY", default_value = "drop")]
    #[arg(value_parser = ["drop", "last", "reject"])]
    pub remainder: String,

    /// Abort before merging if any worker failed
    ///
    /// By default a failed worker is reported and the merge goes ahead.
    #[arg(long)]
    pub strict: bool,

    /// Delete partial documents after a successful merge
    #[arg(long)]
    pub clean: bool,

    /// Directory partial documents are written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub partial_dir: PathBuf,

    /// Compression level for the output PDF
    ///
    /// - none: No compression
    /// - standard: Compress streams (default)
    /// - maximum: Compress streams and prune unused objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Set title metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Set author metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub author: Option<String>,

    /// Overwrite an existing output file (default)
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Dry run - print the plan without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show placement and per-worker details
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print a JSON summary of the run on stdout (implies --quiet)
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns [`RepeatError::InvalidRepetitions`] if the repetition count is
    /// not a non-negative integer, and [`RepeatError::InvalidConfig`] for any
    /// other bad option or inconsistent combination.
    pub fn to_config(&self) -> Result<Config> {
        let repetitions: usize = self
            .repetitions
            .trim()
            .parse()
            .map_err(|_| RepeatError::invalid_repetitions(self.repetitions.as_str()))?;

        let page_size = PageSize::from_str(&self.page_size)?;
        let image_size = self
            .image_size
            .as_deref()
            .map(ImageSize::from_str)
            .transpose()?;
        let remainder = RemainderPolicy::from_str(&self.remainder)?;
        let compression = CompressionLevel::from_str(&self.compression)?;

        let failure_policy = if self.strict {
            WorkerFailurePolicy::Strict
        } else {
            WorkerFailurePolicy::Lenient
        };

        let overwrite_mode = if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Force
        };

        let config = Config {
            image: self.image.clone(),
            repetitions,
            output: self.output.clone(),
            workers: self.workers,
            page_size,
            image_size,
            remainder,
            failure_policy,
            keep_partials: !self.clean,
            partial_dir: self.partial_dir.clone(),
            compression,
            metadata: Metadata::new(self.title.clone(), self.author.clone()),
            overwrite_mode,
            dry_run: self.dry_run,
            // --json owns stdout; -v still raises the log level on stderr.
            verbose: self.verbose && !self.json,
            quiet: self.quiet || self.json,
        };

        config.validate().map_err(|e| {
            RepeatError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }
}
