//! Geometry and work splitting.
//!
//! Both calculations are pure and run once per pipeline invocation:
//! - Where the image sits on a page (centered, aspect-preserving fit)
//! - Which contiguous page range each worker renders

pub mod partition;
pub mod placement;

pub use partition::{PageRange, Partition, partition};
pub use placement::{Placement, place_image};
