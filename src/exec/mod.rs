//! Partitioning of the requested output, dispatch onto workers, and progress reporting.

pub mod dispatch;
pub mod progress;
pub mod split;
