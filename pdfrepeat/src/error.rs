//! Error types for pdfrepeat.
//!
//! Every fallible operation in the crate returns [`RepeatError`]. The
//! variants follow the pipeline stages:
//!
//! - **Usage errors**: malformed arguments or configuration, raised before
//!   any work starts
//! - **Image errors**: the source image is missing or cannot be decoded
//! - **Worker errors**: a builder failed to embed the image or to write its
//!   partial document; these stay local to the worker and travel back to the
//!   coordinator inside a report
//! - **Merge errors**: the final document could not be assembled

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfrepeat operations.
pub type Result<T> = std::result::Result<T, RepeatError>;

/// Main error type for pdfrepeat operations.
#[derive(Debug, thiserror::Error)]
pub enum RepeatError {
    /// The repetition count is not a non-negative integer.
    #[error("Invalid number of repetitions: '{value}'")]
    InvalidRepetitions {
        /// The raw value supplied by the caller.
        value: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// The source image does not exist.
    #[error("Image not found: {}", .path.display())]
    ImageNotFound {
        /// Path to the missing image.
        path: PathBuf,
    },

    /// The source image exists but could not be decoded.
    #[error("Failed to decode image: {}\n  Reason: {reason}", .path.display())]
    ImageDecode {
        /// Path to the image.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// A worker could not place the image on one of its pages.
    #[error("Failed to add image to page {page} of {}\n  Reason: {reason}", .path.display())]
    EmbedFailed {
        /// Partial document the worker was building.
        path: PathBuf,
        /// Global index of the page that failed.
        page: usize,
        /// Details about the failure.
        reason: String,
    },

    /// A worker could not serialize its partial document.
    #[error("Failed to write partial PDF: {}\n  Reason: {source}", .path.display())]
    PartialWriteFailed {
        /// Path of the partial document.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// One or more workers failed and the strict policy refused to merge.
    #[error("{} worker(s) failed, refusing to merge: {}", .failed.len(), join_workers(.failed))]
    WorkersFailed {
        /// Indices of the failed workers, ascending.
        failed: Vec<usize>,
    },

    /// The merger was handed an empty list of partial documents.
    #[error("No partial documents to merge")]
    NoPartialsToMerge,

    /// A partial document could not be loaded for merging.
    #[error("Failed to load partial PDF: {}\n  Reason: {reason}", .path.display())]
    PartialLoadFailed {
        /// Path to the partial document.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Merge operation failed.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create the final output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write the final output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

fn join_workers(failed: &[usize]) -> String {
    failed
        .iter()
        .map(|w| format!("#{w}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<lopdf::Error> for RepeatError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for RepeatError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_config(err.to_string())
    }
}

impl RepeatError {
    /// Create an InvalidRepetitions error.
    pub fn invalid_repetitions(value: impl Into<String>) -> Self {
        Self::InvalidRepetitions {
            value: value.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an EmbedFailed error.
    pub fn embed_failed(path: PathBuf, page: usize, reason: impl Into<String>) -> Self {
        Self::EmbedFailed {
            path,
            page,
            reason: reason.into(),
        }
    }

    /// Create a PartialLoadFailed error.
    pub fn partial_load_failed(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::PartialLoadFailed {
            path,
            reason: reason.into(),
        }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether the error is local to a single worker.
    ///
    /// Worker-local errors abort the worker that raised them and nothing else.
    pub fn is_worker_local(&self) -> bool {
        matches!(
            self,
            Self::EmbedFailed { .. } | Self::PartialWriteFailed { .. }
        )
    }

    /// Whether the error happened while assembling the final document.
    pub fn is_merge_error(&self) -> bool {
        matches!(
            self,
            Self::NoPartialsToMerge | Self::PartialLoadFailed { .. } | Self::MergeFailed { .. }
        )
    }

    /// Get the process exit code for this error.
    ///
    /// Usage and merge failures exit with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidRepetitions { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::ImageNotFound { .. } => 2,
            Self::ImageDecode { .. } => 3,
            Self::EmbedFailed { .. } => 1,
            Self::PartialWriteFailed { .. } => 1,
            Self::WorkersFailed { .. } => 1,
            Self::NoPartialsToMerge => 1,
            Self::PartialLoadFailed { .. } => 1,
            Self::MergeFailed { .. } => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Io(_) => 5,
            Self::Other { .. } => 1,
        }
    }
}
