//! pdfrepeat - Build a multi-page PDF by repeating one image.
//!
//! The requested pages are split into contiguous ranges, one per worker.
//! Every worker renders its range into an independent partial document on
//! tokio's blocking pool, the coordinator waits for all of them and then
//! concatenates the partials in worker order into the final document.
//!
//! - Aspect-preserving, centered image placement
//! - Configurable worker count, page size and remainder handling
//! - Typed per-worker results with lenient or strict failure handling
//! - Optional cleanup of partial documents
//!
//! # Examples
//!
//! ```no_run
//! use pdfrepeat::Config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new("tile.png", 8, "tiles.pdf");
//! let summary = pdfrepeat::run(config).await?;
//! println!("Created {} page document", summary.final_pages());
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```
//! use pdfrepeat::config::{ImageSize, PageSize, RemainderPolicy};
//! use pdfrepeat::layout::{partition, place_image};
//!
//! let placement = place_image(PageSize::A4, ImageSize::new(500.0, 500.0));
//! assert!((placement.y - 123.305).abs() < 1e-9);
//!
//! let plan = partition(10, 4, RemainderPolicy::Drop).unwrap();
//! assert_eq!(plan.covered(), 8);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod layout;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod utils;

pub use config::Config;
pub use error::{RepeatError, Result};
pub use pipeline::{Coordinator, RunSummary, run};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
