//! Domain layer - pure business logic with no I/O dependencies.

pub mod curation;
pub mod dialogue;
pub mod foundation;
pub mod progress;
