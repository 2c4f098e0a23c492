//! Placement, demand propagation and per-partition compositing.

pub mod compositor;
pub mod demand;
pub mod filter;
pub mod placement;
