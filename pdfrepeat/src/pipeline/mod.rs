//! The parallel page-range pipeline.
//!
//! [`Coordinator::run`] validates the configuration, decodes the image once,
//! splits the requested pages into one contiguous range per worker, renders
//! every range on tokio's blocking pool, waits for all workers and then
//! merges the partial documents in worker order.

pub mod coordinator;
pub mod report;

pub use coordinator::{Coordinator, run};
pub use report::{Plan, RunSummary, WorkerReport, WorkerSummary};
