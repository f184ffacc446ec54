//! Progress module - per-video watch state over a saved path.

mod tracker;

pub use tracker::{ProgressRecord, ProgressSummary};
