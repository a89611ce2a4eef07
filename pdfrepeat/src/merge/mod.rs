//! Merging partial documents into the final document.

pub mod merger;
pub mod metadata;

pub use merger::{FinalDocument, MergeResult, MergeStatistics, Merger};
pub use metadata::MetadataManager;
