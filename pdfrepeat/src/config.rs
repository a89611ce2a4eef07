//! Configuration module for pdfrepeat.
//!
//! This module holds the validated settings that drive a run of the
//! pipeline. It handles:
//! - Page and image dimensions
//! - Remainder and worker-failure policies
//! - Partial artifact naming and cleanup
//! - Output options (compression, metadata, overwrite behavior)

use anyhow::{Result, bail};
use serde::Serialize;

use crate::RepeatError;
use std::{
    fmt,
    path::{Component, Path, PathBuf},
    str::FromStr,
};

/// Default number of parallel workers.
pub const DEFAULT_WORKERS: usize = 4;

/// File name prefix of partial documents.
pub const PARTIAL_PREFIX: &str = "partial_";

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - preserves exact quality and structure.
    None,
    /// Balanced compression - good trade-off between size and processing time.
    #[default]
    Standard,
    /// Maximum compression - also prunes unreferenced objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = RepeatError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(RepeatError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// What to do with the pages left over when the repetition count is not a
/// multiple of the worker count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemainderPolicy {
    /// Leave the trailing `total % workers` pages unassigned. They are
    /// missing from the final document.
    #[default]
    Drop,
    /// Append the trailing pages to the last worker's range.
    Last,
    /// Refuse repetition counts that do not divide evenly.
    Reject,
}

impl FromStr for RemainderPolicy {
    type Err = RepeatError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "last" => Ok(Self::Last),
            "reject" => Ok(Self::Reject),
            _ => Err(RepeatError::invalid_config(format!(
                "Invalid remainder policy: {s}. Must be one of: drop, last, reject"
            ))),
        }
    }
}

/// How the coordinator reacts to workers that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerFailurePolicy {
    /// Log the failure and hand every partial path to the merger anyway.
    #[default]
    Lenient,
    /// Abort before merging if any worker failed.
    Strict,
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Always overwrite (default).
    #[default]
    Force,
    /// Never overwrite, error if the file exists.
    NoClobber,
}

/// Page dimensions in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    /// Page width in points.
    pub width: f64,
    /// Page height in points.
    pub height: f64,
}

impl PageSize {
    /// ISO A4, 210 x 297 mm.
    pub const A4: Self = Self::new(595.28, 841.89);
    /// ISO A3, 297 x 420 mm.
    pub const A3: Self = Self::new(841.89, 1190.55);
    /// ISO A5, 148 x 210 mm.
    pub const A5: Self = Self::new(419.53, 595.28);
    /// US Letter, 8.5 x 11 in.
    pub const LETTER: Self = Self::new(612.0, 792.0);
    /// US Legal, 8.5 x 14 in.
    pub const LEGAL: Self = Self::new(612.0, 1008.0);

    /// Create a page size from width and height in points.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} x {:.2} pt", self.width, self.height)
    }
}

impl FromStr for PageSize {
    type Err = RepeatError;

    /// Parse a named size (`a4`, `letter`, ...) or a custom `WxH` in points.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "a3" => Ok(Self::A3),
            "a5" => Ok(Self::A5),
            "letter" => Ok(Self::LETTER),
            "legal" => Ok(Self::LEGAL),
            other => {
                let (width, height) = parse_dimensions(other)
                    .map_err(|e| RepeatError::invalid_config(format!("Invalid page size: {e}")))?;
                Ok(Self::new(width, height))
            }
        }
    }
}

/// Nominal image dimensions fed to the placement calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageSize {
    /// Image width.
    pub width: f64,
    /// Image height.
    pub height: f64,
}

impl ImageSize {
    /// Create an image size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl FromStr for ImageSize {
    type Err = RepeatError;

    fn from_str(s: &str) -> crate::Result<Self> {
        let (width, height) = parse_dimensions(s.trim())
            .map_err(|e| RepeatError::invalid_config(format!("Invalid image size: {e}")))?;
        Ok(Self::new(width, height))
    }
}

/// Parse `WxH` into two positive, finite numbers.
fn parse_dimensions(s: &str) -> Result<(f64, f64)> {
    let Some((w, h)) = s.split_once(['x', 'X']) else {
        bail!("'{s}' is not of the form WIDTHxHEIGHT");
    };

    let parse = |part: &str| -> Result<f64> {
        let value: f64 = match part.trim().parse() {
            Ok(v) => v,
            Err(_) => bail!("'{part}' is not a number"),
        };
        if !value.is_finite() || value <= 0.0 {
            bail!("dimensions must be positive, got {part}");
        }
        Ok(value)
    };

    Ok((parse(w)?, parse(h)?))
}

/// PDF metadata to set on the final document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
}

impl Metadata {
    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none()
    }

    /// Create metadata from optional strings, trimming whitespace.
    pub fn new(title: Option<String>, author: Option<String>) -> Self {
        let to_string_opt = |opt: Option<String>| {
            opt.filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
        };

        Self {
            title: to_string_opt(title),
            author: to_string_opt(author),
        }
    }
}

/// Complete configuration for one run of the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Image repeated on every page.
    pub image: PathBuf,

    /// Number of pages requested.
    pub repetitions: usize,

    /// Final PDF path.
    pub output: PathBuf,

    /// Number of parallel workers (and partial documents).
    pub workers: usize,

    /// Size of every page.
    pub page_size: PageSize,

    /// Nominal image size; `None` uses the decoded image's pixel dimensions.
    pub image_size: Option<ImageSize>,

    /// Handling of pages that don't divide evenly across workers.
    pub remainder: RemainderPolicy,

    /// Reaction to failed workers.
    pub failure_policy: WorkerFailurePolicy,

    /// Leave partial documents on disk after a successful merge.
    pub keep_partials: bool,

    /// Directory the partial documents are written to.
    pub partial_dir: PathBuf,

    /// Compression level for the final document.
    pub compression: CompressionLevel,

    /// Metadata to set on the final document.
    pub metadata: Metadata,

    /// Output overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Dry run mode - print the plan without writing anything.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl Config {
    /// Create a configuration with default options for the three required
    /// values.
    pub fn new(image: impl Into<PathBuf>, repetitions: usize, output: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            repetitions,
            output: output.into(),
            workers: DEFAULT_WORKERS,
            page_size: PageSize::default(),
            image_size: None,
            remainder: RemainderPolicy::default(),
            failure_policy: WorkerFailurePolicy::default(),
            keep_partials: true,
            partial_dir: PathBuf::from("."),
            compression: CompressionLevel::default(),
            metadata: Metadata::default(),
            overwrite_mode: OverwriteMode::default(),
            dry_run: false,
            verbose: false,
            quiet: false,
        }
    }

    /// Validate the configuration.
    ///
    /// Checks for logical inconsistencies and invalid combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The worker count is zero
    /// - Page or image dimensions are not positive
    /// - Verbose and quiet modes are both enabled
    /// - The remainder policy is `Reject` and the pages don't divide evenly
    /// - The output collides with the image or a partial document
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            bail!("Number of workers must be at least 1");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if !is_positive(self.page_size.width) || !is_positive(self.page_size.height) {
            bail!("Page dimensions must be positive, got {}", self.page_size);
        }

        if let Some(size) = self.image_size
            && (!is_positive(size.width) || !is_positive(size.height))
        {
            bail!(
                "Image dimensions must be positive, got {}x{}",
                size.width,
                size.height
            );
        }

        if self.remainder == RemainderPolicy::Reject && self.repetitions % self.workers != 0 {
            bail!(
                "{} repetitions cannot be split evenly across {} workers",
                self.repetitions,
                self.workers
            );
        }

        if same_file(&self.output, &self.image) {
            bail!(
                "Output file cannot be the same as the input image: {}",
                self.output.display()
            );
        }

        if self.partial_paths().iter().any(|p| same_file(p, &self.output)) {
            bail!(
                "Output file collides with a partial document: {}",
                self.output.display()
            );
        }

        Ok(())
    }

    /// Path of the partial document written by `worker`.
    pub fn partial_path(&self, worker: usize) -> PathBuf {
        self.partial_dir
            .join(format!("{PARTIAL_PREFIX}{worker}.pdf"))
    }

    /// Paths of every partial document, in worker order.
    pub fn partial_paths(&self) -> Vec<PathBuf> {
        (0..self.workers).map(|w| self.partial_path(w)).collect()
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn same_file(a: &Path, b: &Path) -> bool {
    normalize(a) == normalize(b)
}

/// Absolute form of `path` with `.` segments removed and the parent
/// directory resolved through symlinks when it exists. The file itself need
/// not exist yet.
fn normalize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let lexical: PathBuf = absolute
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    if let (Some(parent), Some(name)) = (lexical.parent(), lexical.file_name())
        && let Ok(dir) = parent.canonicalize()
    {
        return dir.join(name);
    }
    lexical
}
