//! Rendering partial documents.
//!
//! A worker owns one [`PartialBuilder`] run: it creates an empty document,
//! appends one page per index in its range, draws the shared image on each
//! page and writes the result to its own artifact.

pub mod builder;
pub mod page;
pub mod xobject;

pub use builder::{BuildRequest, PartialBuilder, PartialDocument};
pub use page::PageCanvas;
pub use xobject::{ImageEmbedder, XObjectEmbedder};
